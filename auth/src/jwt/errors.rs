use thiserror::Error;

/// Error type for token encoding and decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    /// The token could not be authenticated with the configured secret and
    /// algorithm. Nothing inside it should be trusted.
    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token has expired")]
    Expired,

    /// The token authenticated but a claim is missing or of the wrong type.
    #[error("Token has a missing or invalid claim: {0}")]
    MalformedToken(String),

    #[error("Token lifetime of {0} minutes is out of range")]
    InvalidLifetime(i64),
}
