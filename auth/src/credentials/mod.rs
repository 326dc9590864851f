pub mod errors;
pub mod issuer;
pub mod verifier;

pub use errors::CredentialFailure;
pub use issuer::CredentialIssuer;
pub use issuer::TokenLifetimes;
pub use verifier::CredentialVerifier;
