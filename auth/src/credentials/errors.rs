use thiserror::Error;

use crate::jwt::TokenError;
use crate::jwt::TokenType;
use crate::password::PasswordError;
use crate::store::StoreError;

/// Why an authentication or token verification attempt did not succeed.
///
/// Every variant except the infrastructure ones (`StoreUnavailable`,
/// `PasswordHashing`, `TokenIssuance`) should be answered with
/// "unauthorized" by the caller; see [`CredentialFailure::is_unauthorized`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialFailure {
    /// Unknown identifier or wrong password. The two are deliberately
    /// indistinguishable.
    #[error("Could not validate credentials")]
    InvalidCredentials,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Token has a missing or invalid claim: {0}")]
    MalformedToken(String),

    #[error("Expected {expected} token")]
    WrongTokenType {
        expected: TokenType,
        found: Option<TokenType>,
    },

    #[error("User no longer exists")]
    UserNotFound,

    #[error("User has not confirmed their email")]
    AccountNotConfirmed,

    #[error("Credential store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Password error: {0}")]
    PasswordHashing(#[from] PasswordError),

    #[error("Token issuance failed: {0}")]
    TokenIssuance(TokenError),
}

impl CredentialFailure {
    /// Whether the failure is about the presented credentials rather than
    /// the infrastructure behind them.
    pub fn is_unauthorized(&self) -> bool {
        !matches!(
            self,
            CredentialFailure::StoreUnavailable(_)
                | CredentialFailure::PasswordHashing(_)
                | CredentialFailure::TokenIssuance(_)
        )
    }
}

impl From<TokenError> for CredentialFailure {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::InvalidSignature => CredentialFailure::InvalidSignature,
            TokenError::Expired => CredentialFailure::Expired,
            TokenError::MalformedToken(claim) => CredentialFailure::MalformedToken(claim),
            TokenError::EncodingFailed(_) | TokenError::InvalidLifetime(_) => {
                CredentialFailure::TokenIssuance(err)
            }
        }
    }
}

impl From<StoreError> for CredentialFailure {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(reason) => CredentialFailure::StoreUnavailable(reason),
            StoreError::NotFound(_) => CredentialFailure::UserNotFound,
        }
    }
}
