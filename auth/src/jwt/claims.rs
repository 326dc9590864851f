use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::TokenError;

/// Discriminator restricting what an otherwise valid token may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Short-lived bearer credential for API calls.
    Access,
    /// Long-lived token redeemed once to confirm an email address.
    Confirmation,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Confirmation => "confirmation",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "access" => Ok(TokenType::Access),
            "confirmation" => Ok(TokenType::Confirmation),
            other => Err(format!("unknown token type: {}", other)),
        }
    }
}

/// Claim set carried by every token.
///
/// The structure is closed: subject, type, expiry and issue time. `sub` and
/// `typ` stay optional here because their absence is a verification failure
/// reported by the credential verifier, not a decoding failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claims {
    /// Subject (account identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Token type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typ: Option<TokenType>,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl Claims {
    /// Create claims for a typed token expiring `ttl` from now.
    ///
    /// A zero or negative `ttl` produces claims that are already expired.
    ///
    /// # Errors
    /// * `EncodingFailed` - The expiry falls outside the representable range
    pub fn issue(
        subject: impl ToString,
        token_type: TokenType,
        ttl: Duration,
    ) -> Result<Self, TokenError> {
        let now = Utc::now();
        let exp = now.checked_add_signed(ttl).ok_or_else(|| {
            TokenError::EncodingFailed(format!(
                "expiry {}s from now is out of range",
                ttl.num_seconds()
            ))
        })?;

        Ok(Self {
            sub: Some(subject.to_string()),
            typ: Some(token_type),
            exp: exp.timestamp(),
            iat: Some(now.timestamp()),
        })
    }

    /// Check if the token is expired. A token is still valid during the
    /// second equal to its expiry.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}

/// Claims as they appear on the wire, before the claim set is validated.
#[derive(Debug, Deserialize)]
pub(crate) struct RawClaims {
    sub: Option<String>,
    typ: Option<String>,
    exp: Option<i64>,
    iat: Option<i64>,
}

impl TryFrom<RawClaims> for Claims {
    type Error = TokenError;

    fn try_from(raw: RawClaims) -> Result<Self, Self::Error> {
        let exp = raw
            .exp
            .ok_or_else(|| TokenError::MalformedToken("exp".to_string()))?;

        Ok(Self {
            sub: raw.sub,
            // Unknown types are kept out of the closed enum and surface as a
            // type mismatch during verification.
            typ: raw.typ.and_then(|t| t.parse().ok()),
            exp,
            iat: raw.iat,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_sets_all_claims() {
        let claims = Claims::issue("a@x.com", TokenType::Access, Duration::minutes(30)).unwrap();

        assert_eq!(claims.sub, Some("a@x.com".to_string()));
        assert_eq!(claims.typ, Some(TokenType::Access));

        let iat = claims.iat.unwrap();
        assert_eq!(claims.exp - iat, 30 * 60);
    }

    #[test]
    fn test_negative_ttl_is_already_expired() {
        let claims = Claims::issue("a@x.com", TokenType::Access, Duration::minutes(-1)).unwrap();

        assert!(claims.is_expired(Utc::now().timestamp()));
    }

    #[test]
    fn test_issue_with_unrepresentable_expiry() {
        let ttl = Duration::try_minutes(1_000_000_000_000).unwrap();

        assert!(matches!(
            Claims::issue("a@x.com", TokenType::Access, ttl),
            Err(TokenError::EncodingFailed(_))
        ));
        assert!(matches!(
            Claims::issue("a@x.com", TokenType::Access, -ttl),
            Err(TokenError::EncodingFailed(_))
        ));
    }

    #[test]
    fn test_is_expired() {
        let claims = Claims {
            sub: None,
            typ: None,
            exp: 1000,
            iat: None,
        };

        assert!(!claims.is_expired(999));
        assert!(!claims.is_expired(1000));
        assert!(claims.is_expired(1001));
    }

    #[test]
    fn test_token_type_wire_names() {
        assert_eq!(
            serde_json::to_value(TokenType::Confirmation).unwrap(),
            serde_json::json!("confirmation")
        );
        assert_eq!("access".parse::<TokenType>(), Ok(TokenType::Access));
        assert!("refresh".parse::<TokenType>().is_err());
    }

    #[test]
    fn test_raw_claims_without_expiry_are_malformed() {
        let raw: RawClaims = serde_json::from_value(serde_json::json!({
            "sub": "a@x.com",
            "typ": "access"
        }))
        .unwrap();

        assert_eq!(
            Claims::try_from(raw),
            Err(TokenError::MalformedToken("exp".to_string()))
        );
    }

    #[test]
    fn test_raw_claims_with_unknown_type() {
        let raw: RawClaims = serde_json::from_value(serde_json::json!({
            "sub": "a@x.com",
            "typ": "refresh",
            "exp": 2000
        }))
        .unwrap();

        let claims = Claims::try_from(raw).unwrap();
        assert_eq!(claims.typ, None);
        assert_eq!(claims.exp, 2000);
    }
}
