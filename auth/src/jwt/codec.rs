use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::decode_header;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::algorithm::SigningAlgorithm;
use super::claims::Claims;
use super::claims::RawClaims;
use super::errors::TokenError;

/// Signs claim sets into compact JWT strings and authenticates them back.
///
/// The codec knows nothing about what the claims mean; typed verification
/// lives in the credential verifier. The secret is injected at construction
/// and never changes afterwards, so a single codec can be shared across
/// threads.
///
/// # Security Notes
/// - The secret should be at least 256 bits (32 bytes) for HS256
/// - Rotating the secret invalidates every outstanding token
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl TokenCodec {
    pub fn new(secret: &[u8], algorithm: SigningAlgorithm) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: algorithm.into(),
        }
    }

    /// Encode claims into a signed token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Claims could not be serialised or signed
    pub fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Authenticate a token and return its claim set.
    ///
    /// The signature is checked before any claim is looked at. Expiry is
    /// checked afterwards so a forged token never reports `Expired`.
    ///
    /// # Errors
    /// * `InvalidSignature` - Signature, algorithm or structure did not verify
    /// * `MalformedToken` - Authenticated token with a missing `exp` claim or
    ///   a claim of the wrong type
    /// * `Expired` - Authenticated token past its expiry
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is enforced below, after the signature has been verified.
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        // A header that does not parse is rejected before the signature is
        // checked, so it must not be mistaken for a bad claim below.
        decode_header(token).map_err(|e| {
            tracing::debug!(error = ?e.kind(), "Token header failed to parse");
            TokenError::InvalidSignature
        })?;

        let token_data = decode::<RawClaims>(token, &self.decoding_key, &validation).map_err(
            |e| match e.kind() {
                ErrorKind::Json(err) => {
                    tracing::debug!(error = %err, "Token claims failed to deserialize");
                    TokenError::MalformedToken(err.to_string())
                }
                kind => {
                    tracing::debug!(error = ?kind, "Token failed verification");
                    TokenError::InvalidSignature
                }
            },
        )?;

        let claims = Claims::try_from(token_data.claims)?;

        if claims.is_expired(Utc::now().timestamp()) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::jwt::claims::TokenType;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    fn claims() -> Claims {
        Claims::issue("a@x.com", TokenType::Access, Duration::minutes(30)).unwrap()
    }

    fn signed(secret: &[u8], payload: serde_json::Value) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    #[test]
    fn test_encode_and_decode() {
        let codec = TokenCodec::new(SECRET, SigningAlgorithm::Hs256);
        let claims = claims();

        let token = codec.encode(&claims).expect("Failed to encode token");
        assert_eq!(token.split('.').count(), 3);

        let decoded = codec.decode(&token).expect("Failed to decode token");
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let codec = TokenCodec::new(SECRET, SigningAlgorithm::Hs256);
        let claims = claims();

        assert_eq!(codec.encode(&claims), codec.encode(&claims));
    }

    #[test]
    fn test_decode_garbage() {
        let codec = TokenCodec::new(SECRET, SigningAlgorithm::Hs256);

        assert_eq!(
            codec.decode("invalid.token.here"),
            Err(TokenError::InvalidSignature)
        );
        assert_eq!(codec.decode(""), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let issuing = TokenCodec::new(
            b"secret1_at_least_32_bytes_long_key!",
            SigningAlgorithm::Hs256,
        );
        let verifying = TokenCodec::new(
            b"secret2_at_least_32_bytes_long_key!",
            SigningAlgorithm::Hs256,
        );

        let token = issuing.encode(&claims()).expect("Failed to encode token");

        assert_eq!(verifying.decode(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_decode_with_other_algorithm() {
        let issuing = TokenCodec::new(SECRET, SigningAlgorithm::Hs512);
        let verifying = TokenCodec::new(SECRET, SigningAlgorithm::Hs256);

        let token = issuing.encode(&claims()).expect("Failed to encode token");

        assert_eq!(verifying.decode(&token), Err(TokenError::InvalidSignature));
        assert!(issuing.decode(&token).is_ok());
    }

    #[test]
    fn test_tampered_payload_fails_signature() {
        let codec = TokenCodec::new(SECRET, SigningAlgorithm::Hs256);
        let token = codec.encode(&claims()).expect("Failed to encode token");

        let payload_start = token.find('.').unwrap() + 1;
        let index = payload_start + 5;
        let original = token.as_bytes()[index];
        let replacement = if original == b'A' { 'B' } else { 'A' };

        let mut tampered = token.clone();
        tampered.replace_range(index..index + 1, &replacement.to_string());

        assert_ne!(tampered, token);
        assert_eq!(codec.decode(&tampered), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_tampered_signature_fails() {
        let codec = TokenCodec::new(SECRET, SigningAlgorithm::Hs256);
        let token = codec.encode(&claims()).expect("Failed to encode token");

        let index = token.rfind('.').unwrap() + 1;
        let original = token.as_bytes()[index];
        let replacement = if original == b'A' { 'B' } else { 'A' };

        let mut tampered = token.clone();
        tampered.replace_range(index..index + 1, &replacement.to_string());

        assert_eq!(codec.decode(&tampered), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_expired_token_with_valid_signature() {
        let codec = TokenCodec::new(SECRET, SigningAlgorithm::Hs256);
        let claims = Claims::issue("a@x.com", TokenType::Access, Duration::minutes(-1)).unwrap();

        let token = codec.encode(&claims).expect("Failed to encode token");

        assert_eq!(codec.decode(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_forged_expired_token_reports_signature() {
        let issuing = TokenCodec::new(
            b"secret1_at_least_32_bytes_long_key!",
            SigningAlgorithm::Hs256,
        );
        let verifying = TokenCodec::new(SECRET, SigningAlgorithm::Hs256);
        let claims = Claims::issue("a@x.com", TokenType::Access, Duration::minutes(-1)).unwrap();

        let token = issuing.encode(&claims).expect("Failed to encode token");

        assert_eq!(verifying.decode(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_missing_expiry_is_malformed() {
        let codec = TokenCodec::new(SECRET, SigningAlgorithm::Hs256);
        let token = signed(SECRET, serde_json::json!({ "sub": "a@x.com", "typ": "access" }));

        assert_eq!(
            codec.decode(&token),
            Err(TokenError::MalformedToken("exp".to_string()))
        );
    }

    #[test]
    fn test_ill_typed_claims_are_malformed() {
        let codec = TokenCodec::new(SECRET, SigningAlgorithm::Hs256);

        let text_expiry = signed(
            SECRET,
            serde_json::json!({ "sub": "a@x.com", "typ": "access", "exp": "tomorrow" }),
        );
        let numeric_subject = signed(
            SECRET,
            serde_json::json!({ "sub": 123, "typ": "access", "exp": 4_102_444_800_i64 }),
        );

        assert!(matches!(
            codec.decode(&text_expiry),
            Err(TokenError::MalformedToken(_))
        ));
        assert!(matches!(
            codec.decode(&numeric_subject),
            Err(TokenError::MalformedToken(_))
        ));
    }

    #[test]
    fn test_ill_typed_claims_with_wrong_secret_report_signature() {
        let codec = TokenCodec::new(SECRET, SigningAlgorithm::Hs256);
        let token = signed(
            b"secret1_at_least_32_bytes_long_key!",
            serde_json::json!({ "sub": 123, "typ": "access", "exp": "tomorrow" }),
        );

        assert_eq!(codec.decode(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_unparseable_header_reports_signature() {
        let codec = TokenCodec::new(SECRET, SigningAlgorithm::Hs256);
        let token = claims_token_with_header(&codec, "bm90LWpzb24");

        assert_eq!(codec.decode(&token), Err(TokenError::InvalidSignature));
    }

    fn claims_token_with_header(codec: &TokenCodec, header: &str) -> String {
        let token = codec.encode(&claims()).unwrap();
        let rest = &token[token.find('.').unwrap()..];
        format!("{}{}", header, rest)
    }
}
