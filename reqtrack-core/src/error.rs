//! Error type for the parsing and boundary checks done outside the store.
//!
//! Store operations themselves never fail; a missing identity is a no-op.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A string could not be parsed into one of the model enums
    #[error("invalid {field}: '{value}'")]
    InvalidValue { field: &'static str, value: String },

    /// A calendar date was not in YYYY-MM-DD form
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid email address: '{0}'")]
    InvalidEmail(String),

    /// A gated route was requested without a signed-in user
    #[error("sign in required to open {0}")]
    NotSignedIn(String),

    #[error("unsupported export format: '{0}' (expected json, yaml or markdown)")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, Error>;
