use std::sync::Arc;

use chrono::Duration;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::TokenCodec;
use crate::jwt::TokenError;
use crate::jwt::TokenType;

pub const DEFAULT_ACCESS_TTL_MINUTES: i64 = 30;
pub const DEFAULT_CONFIRMATION_TTL_MINUTES: i64 = 1440;

/// Lifetime of each token type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub confirmation: Duration,
}

impl TokenLifetimes {
    /// Lifetimes from minute counts. Zero and negative values are accepted
    /// and yield tokens that are already expired.
    ///
    /// # Errors
    /// * `InvalidLifetime` - A value cannot be added to the current time
    pub fn from_minutes(
        access_minutes: i64,
        confirmation_minutes: i64,
    ) -> Result<Self, TokenError> {
        Ok(Self {
            access: lifetime(access_minutes)?,
            confirmation: lifetime(confirmation_minutes)?,
        })
    }

    fn for_type(&self, token_type: TokenType) -> Duration {
        match token_type {
            TokenType::Access => self.access,
            TokenType::Confirmation => self.confirmation,
        }
    }
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            access: Duration::minutes(DEFAULT_ACCESS_TTL_MINUTES),
            confirmation: Duration::minutes(DEFAULT_CONFIRMATION_TTL_MINUTES),
        }
    }
}

fn lifetime(minutes: i64) -> Result<Duration, TokenError> {
    Duration::try_minutes(minutes)
        .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
        .ok_or(TokenError::InvalidLifetime(minutes))
}

/// Builds typed tokens with type-specific lifetimes.
///
/// Issued tokens are not recorded anywhere; the only way to invalidate one
/// before it expires is rotating the signing secret.
pub struct CredentialIssuer {
    codec: Arc<TokenCodec>,
    lifetimes: TokenLifetimes,
}

impl CredentialIssuer {
    pub fn new(codec: Arc<TokenCodec>, lifetimes: TokenLifetimes) -> Self {
        Self { codec, lifetimes }
    }

    /// Issue a short-lived access token for `subject`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed or the expiry is out of range
    pub fn issue_access_token(&self, subject: &str) -> Result<String, TokenError> {
        self.issue(subject, TokenType::Access)
    }

    /// Issue an email confirmation token for `subject`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed or the expiry is out of range
    pub fn issue_confirmation_token(&self, subject: &str) -> Result<String, TokenError> {
        self.issue(subject, TokenType::Confirmation)
    }

    fn issue(&self, subject: &str, token_type: TokenType) -> Result<String, TokenError> {
        let ttl = self.lifetimes.for_type(token_type);
        tracing::debug!(
            subject,
            token_type = %token_type,
            ttl_minutes = ttl.num_minutes(),
            "Issuing token"
        );

        self.codec
            .encode(&Claims::issue(subject, token_type, ttl)?)
    }
}
