//! Credential issuance and verification
//!
//! Provides the authentication core of the social API:
//! - Password hashing (Argon2id)
//! - Signed, typed, time-bounded tokens (`access` and `confirmation`)
//! - Authentication against an account store (password or token)
//!
//! The account store is a trait ([`CredentialStore`]) so the service owning
//! the user table decides how lookups and confirmation updates happen.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("other_password", &hash));
//! ```
//!
//! ## Typed Tokens
//! ```
//! use std::sync::Arc;
//!
//! use auth::{CredentialFailure, CredentialIssuer, CredentialVerifier};
//! use auth::{SigningAlgorithm, TokenCodec, TokenLifetimes, TokenType};
//!
//! let codec = Arc::new(TokenCodec::new(
//!     b"secret_key_at_least_32_bytes_long!",
//!     SigningAlgorithm::Hs256,
//! ));
//! let issuer = CredentialIssuer::new(Arc::clone(&codec), TokenLifetimes::default());
//! let verifier = CredentialVerifier::new(codec);
//!
//! let token = issuer.issue_confirmation_token("alice@example.com").unwrap();
//! assert_eq!(
//!     verifier.verify(&token, TokenType::Confirmation).unwrap(),
//!     "alice@example.com"
//! );
//! assert!(matches!(
//!     verifier.verify(&token, TokenType::Access),
//!     Err(CredentialFailure::WrongTokenType { .. })
//! ));
//! ```

pub mod authenticator;
pub mod credentials;
pub mod jwt;
pub mod password;
pub mod store;

// Re-export commonly used items
pub use authenticator::AuthenticationPolicy;
pub use authenticator::Authenticator;
pub use authenticator::AuthenticatorSettings;
pub use credentials::CredentialFailure;
pub use credentials::CredentialIssuer;
pub use credentials::CredentialVerifier;
pub use credentials::TokenLifetimes;
pub use jwt::Claims;
pub use jwt::SigningAlgorithm;
pub use jwt::TokenCodec;
pub use jwt::TokenError;
pub use jwt::TokenType;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use store::Account;
pub use store::CredentialStore;
pub use store::StoreError;
