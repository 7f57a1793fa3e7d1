//! Error types for savings-types.

use thiserror::Error;

/// Errors that can occur when interpreting dataset values.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The value is not a recognised calendar date or date-time.
    #[error(
        "invalid date '{0}': expected RFC 3339 (e.g. 2024-01-15T10:30:00Z), \
         YYYY-MM-DD HH:MM[:SS] or YYYY-MM-DD"
    )]
    InvalidDate(String),
}

/// Result type alias using savings-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
