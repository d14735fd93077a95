use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Sub},
    str::FromStr,
};

use crate::EngineError;

/// Signed money amount represented as **integer cents**.
///
/// Use this type for **all** monetary values in the engine (transaction
/// amounts, totals, averages) to avoid floating-point drift. Stored amounts
/// are never negative; the sign only shows up in derived values such as a
/// net total.
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing from user input (rejects > 2 decimals):
///
/// ```rust
/// use engine::MoneyCents;
///
/// assert_eq!("10".parse::<MoneyCents>().unwrap().cents(), 1000);
/// assert_eq!("10.5".parse::<MoneyCents>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<MoneyCents>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Addition clamped to the `i64` range instead of overflowing.
    #[must_use]
    pub const fn saturating_add(self, rhs: MoneyCents) -> MoneyCents {
        MoneyCents(self.0.saturating_add(rhs.0))
    }

    /// Subtraction clamped to the `i64` range instead of overflowing.
    #[must_use]
    pub const fn saturating_sub(self, rhs: MoneyCents) -> MoneyCents {
        MoneyCents(self.0.saturating_sub(rhs.0))
    }

    /// Divides the amount by `divisor` and rounds the quotient to whole cents
    /// with round-half-to-even (banker's rounding).
    ///
    /// A non-positive divisor yields zero.
    #[must_use]
    pub fn div_round_half_even(self, divisor: i64) -> MoneyCents {
        if divisor <= 0 {
            return MoneyCents::ZERO;
        }
        let quotient = self.0.div_euclid(divisor);
        let remainder = self.0.rem_euclid(divisor);
        let twice = remainder * 2;
        let round_up = match twice.cmp(&divisor) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => quotient % 2 != 0,
        };
        MoneyCents(if round_up { quotient + 1 } else { quotient })
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{units}.{cents:02}")
    }
}

// Arithmetic saturates at the i64 bounds instead of panicking or wrapping.
impl Add for MoneyCents {
    type Output = MoneyCents;

    fn add(self, rhs: MoneyCents) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl AddAssign for MoneyCents {
    fn add_assign(&mut self, rhs: MoneyCents) {
        *self = self.saturating_add(rhs);
    }
}

impl Sub for MoneyCents {
    type Output = MoneyCents;

    fn sub(self, rhs: MoneyCents) -> Self::Output {
        self.saturating_sub(rhs)
    }
}

impl Sum for MoneyCents {
    fn sum<I: Iterator<Item = MoneyCents>>(iter: I) -> Self {
        iter.fold(MoneyCents::ZERO, |acc, value| acc + value)
    }
}

impl FromStr for MoneyCents {
    type Err = EngineError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` as decimal separator and an optional leading `+`/`-`.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - rejects empty/invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::InvalidAmount("empty amount".to_string());
        let invalid = || EngineError::InvalidAmount("invalid amount".to_string());
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (sign, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (-1i64, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (1i64, stripped)
        } else {
            (1i64, trimmed)
        };

        if rest.is_empty() {
            return Err(empty());
        }

        let mut parts = rest.split('.');
        let units_str = parts.next().ok_or_else(invalid)?;
        let cents_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let units: i64 = units_str.parse().map_err(|_| overflow())?;

        let cents: i64 = match cents_str {
            None => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    0 => return Err(invalid()),
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid())?,
                    _ => {
                        return Err(EngineError::InvalidAmount(
                            "amount can have at most 2 decimal places".to_string(),
                        ));
                    }
                }
            }
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or_else(overflow)?;

        let signed = if sign < 0 {
            total.checked_neg().ok_or_else(overflow)?
        } else {
            total
        };

        Ok(MoneyCents(signed))
    }
}
