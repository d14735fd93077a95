//! The module contains the error the engine can throw.
//!
//! Errors fall in a few families that callers map to distinct responses:
//!
//! - [`KeyNotFound`] when an item does not exist or is not visible to the caller.
//! - [`Forbidden`] when the caller can see an item but does not own it.
//! - validation errors ([`InvalidAmount`], [`InvalidName`], ...) for bad input.
//! - [`Database`] and [`UnresolvedCategory`] for failures the caller cannot fix.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Forbidden`]: EngineError::Forbidden
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidName`]: EngineError::InvalidName
//!  [`Database`]: EngineError::Database
//!  [`UnresolvedCategory`]: EngineError::UnresolvedCategory
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid email: {0}")]
    InvalidEmail(String),
    #[error("Invalid password: {0}")]
    InvalidPassword(String),
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    #[error("Invalid category: {0}")]
    InvalidCategory(String),
    #[error("Category in use: {0}")]
    CategoryInUse(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
    #[error("transaction {0} has no resolvable category")]
    UnresolvedCategory(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl From<bcrypt::BcryptError> for EngineError {
    fn from(value: bcrypt::BcryptError) -> Self {
        Self::PasswordHash(value.to_string())
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::InvalidDate(a), Self::InvalidDate(b)) => a == b,
            (Self::InvalidEmail(a), Self::InvalidEmail(b)) => a == b,
            (Self::InvalidPassword(a), Self::InvalidPassword(b)) => a == b,
            (Self::InvalidQuery(a), Self::InvalidQuery(b)) => a == b,
            (Self::InvalidCategory(a), Self::InvalidCategory(b)) => a == b,
            (Self::CategoryInUse(a), Self::CategoryInUse(b)) => a == b,
            (Self::InvalidCredentials, Self::InvalidCredentials) => true,
            (Self::PasswordHash(a), Self::PasswordHash(b)) => a == b,
            (Self::UnresolvedCategory(a), Self::UnresolvedCategory(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
