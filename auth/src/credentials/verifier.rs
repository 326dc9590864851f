use std::sync::Arc;

use super::errors::CredentialFailure;
use crate::jwt::TokenCodec;
use crate::jwt::TokenType;

/// Checks that a token is authentic, current and of the expected type.
pub struct CredentialVerifier {
    codec: Arc<TokenCodec>,
}

impl CredentialVerifier {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    /// Verify `token` and return the subject it vouches for.
    ///
    /// Checks run in a fixed order: signature, expiry, subject, type. A
    /// confirmation token is therefore never accepted where an access token
    /// is expected, and vice versa.
    ///
    /// # Errors
    /// * `InvalidSignature` - Token could not be authenticated
    /// * `Expired` - Token is past its expiry
    /// * `MalformedToken` - Token has no subject
    /// * `WrongTokenType` - Token type is missing or differs from `expected`
    pub fn verify(&self, token: &str, expected: TokenType) -> Result<String, CredentialFailure> {
        let claims = self.codec.decode(token)?;

        let subject = claims
            .sub
            .filter(|sub| !sub.is_empty())
            .ok_or_else(|| CredentialFailure::MalformedToken("sub".to_string()))?;

        if claims.typ != Some(expected) {
            tracing::warn!(
                subject = %subject,
                expected = %expected,
                found = ?claims.typ,
                "Token presented with the wrong type"
            );
            return Err(CredentialFailure::WrongTokenType {
                expected,
                found: claims.typ,
            });
        }

        Ok(subject)
    }
}
