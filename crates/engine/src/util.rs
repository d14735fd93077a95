//! Internal helpers for input validation and normalization.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every operation enforces the same invariants.

use chrono::NaiveDate;
use email_address::EmailAddress;

use crate::{EngineError, MoneyCents, ResultEngine};

pub(crate) const DESCRIPTION_MAX_LEN: usize = 500;
pub(crate) const CATEGORY_NAME_MAX_LEN: usize = 100;
pub(crate) const PASSWORD_MIN_LEN: usize = 8;
/// Largest storable amount, 99,999,999.99.
pub(crate) const MAX_AMOUNT: MoneyCents = MoneyCents::new(99_999_999_99);

fn required_text(value: &str, label: &str, max_len: usize) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} must not be empty"
        )));
    }
    if trimmed.chars().count() > max_len {
        return Err(EngineError::InvalidName(format!(
            "{label} must be at most {max_len} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim a transaction description and check its length.
pub(crate) fn validate_description(value: &str) -> ResultEngine<String> {
    required_text(value, "description", DESCRIPTION_MAX_LEN)
}

/// Trim a category name and check its length.
pub(crate) fn validate_category_name(value: &str) -> ResultEngine<String> {
    required_text(value, "category name", CATEGORY_NAME_MAX_LEN)
}

pub(crate) fn validate_amount(amount: MoneyCents) -> ResultEngine<()> {
    if amount.is_negative() {
        return Err(EngineError::InvalidAmount(
            "amount must be greater than or equal to 0".to_string(),
        ));
    }
    if amount > MAX_AMOUNT {
        return Err(EngineError::InvalidAmount(format!(
            "amount must be at most {MAX_AMOUNT}"
        )));
    }
    Ok(())
}

/// Normalize an email address (trimmed, lowercase) and check its syntax.
pub(crate) fn normalize_email(value: &str) -> ResultEngine<String> {
    let normalized = value.trim().to_lowercase();
    if !EmailAddress::is_valid(&normalized) {
        return Err(EngineError::InvalidEmail(format!(
            "'{}' is not a valid email address",
            value.trim()
        )));
    }
    Ok(normalized)
}

pub(crate) fn validate_password(value: &str) -> ResultEngine<()> {
    if value.chars().count() < PASSWORD_MIN_LEN {
        return Err(EngineError::InvalidPassword(format!(
            "password must be at least {PASSWORD_MIN_LEN} characters long"
        )));
    }
    Ok(())
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Reject ranges whose start comes after their end. Both bounds are inclusive.
pub(crate) fn validate_date_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (from, to)
        && from > to
    {
        return Err(EngineError::InvalidDate(
            "invalid range: from_date must be <= to_date".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_is_trimmed_and_bounded() {
        assert_eq!(validate_description("  Rent ").unwrap(), "Rent");
        assert!(validate_description("").is_err());
        assert!(validate_description(&"a".repeat(DESCRIPTION_MAX_LEN)).is_ok());
        assert!(validate_description(&"a".repeat(DESCRIPTION_MAX_LEN + 1)).is_err());
    }

    #[test]
    fn category_name_is_bounded() {
        assert!(validate_category_name(&"x".repeat(CATEGORY_NAME_MAX_LEN)).is_ok());
        assert!(validate_category_name(&"x".repeat(CATEGORY_NAME_MAX_LEN + 1)).is_err());
    }

    #[test]
    fn amount_is_bounded() {
        assert!(validate_amount(MoneyCents::ZERO).is_ok());
        assert!(validate_amount(MAX_AMOUNT).is_ok());
        assert!(matches!(
            validate_amount(MoneyCents::new(-1)),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(matches!(
            validate_amount(MAX_AMOUNT + MoneyCents::new(1)),
            Err(EngineError::InvalidAmount(_))
        ));
        let huge: MoneyCents = "92233720368547758.07".parse().unwrap();
        assert!(validate_amount(huge).is_err());
    }

    #[test]
    fn email_is_normalized() {
        assert_eq!(
            normalize_email(" Alice@Example.com ").unwrap(),
            "alice@example.com"
        );
        assert!(matches!(
            normalize_email("not-an-email"),
            Err(EngineError::InvalidEmail(_))
        ));
    }

    #[test]
    fn password_needs_eight_chars() {
        assert!(validate_password("1234567").is_err());
        assert!(validate_password("12345678").is_ok());
    }

    #[test]
    fn date_range_must_be_ordered() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
        assert!(validate_date_range(Some(day(1)), Some(day(1))).is_ok());
        assert!(validate_date_range(Some(day(2)), Some(day(1))).is_err());
        assert!(validate_date_range(None, Some(day(1))).is_ok());
    }
}
