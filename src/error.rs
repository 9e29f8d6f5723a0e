//! Fieldveil error types

use thiserror::Error;

/// Fieldveil error type
#[derive(Error, Debug)]
pub enum Error {
    /// A required parameter was missing or a precondition was violated.
    ///
    /// Every policy failure in the filter is this variant; the payload is
    /// the human-readable cause (for example "missing classification tag"
    /// or "missing wrapper"). Callers match on the variant, not the text.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A wrapper capability failed internally (cipher setup, encryption,
    /// decryption, or derivation). The payload never contains plaintext.
    #[error("crypto error: {0}")]
    Crypto(String),
}

impl Error {
    /// Returns true if this is an invalid-parameter failure.
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Error::InvalidParameter(_))
    }
}

/// Result type alias for fieldveil operations
pub type Result<T> = std::result::Result<T, Error>;
