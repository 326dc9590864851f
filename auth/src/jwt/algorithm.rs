use jsonwebtoken::Algorithm;
use serde::Deserialize;
use serde::Serialize;

/// HMAC signing algorithms supported with a shared secret.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SigningAlgorithm {
    #[default]
    #[serde(rename = "HS256")]
    Hs256,

    #[serde(rename = "HS384")]
    Hs384,

    #[serde(rename = "HS512")]
    Hs512,
}

impl From<SigningAlgorithm> for Algorithm {
    fn from(algorithm: SigningAlgorithm) -> Self {
        match algorithm {
            SigningAlgorithm::Hs256 => Algorithm::HS256,
            SigningAlgorithm::Hs384 => Algorithm::HS384,
            SigningAlgorithm::Hs512 => Algorithm::HS512,
        }
    }
}
