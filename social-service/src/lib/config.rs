use std::env;

use auth::AuthenticationPolicy;
use auth::AuthenticatorSettings;
use auth::SigningAlgorithm;
use auth::TokenError;
use auth::TokenLifetimes;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    /// Base URL used to build confirmation links, e.g. `http://localhost:8080`
    pub public_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub secret: String,
    #[serde(default)]
    pub algorithm: SigningAlgorithm,
    #[serde(default = "default_access_ttl_minutes")]
    pub access_ttl_minutes: i64,
    #[serde(default = "default_confirmation_ttl_minutes")]
    pub confirmation_ttl_minutes: i64,
    #[serde(default = "default_require_confirmed_login")]
    pub require_confirmed_login: bool,
}

fn default_access_ttl_minutes() -> i64 {
    auth::credentials::issuer::DEFAULT_ACCESS_TTL_MINUTES
}

fn default_confirmation_ttl_minutes() -> i64 {
    auth::credentials::issuer::DEFAULT_CONFIRMATION_TTL_MINUTES
}

fn default_require_confirmed_login() -> bool {
    true
}

impl AuthConfig {
    /// Authenticator settings described by this section.
    ///
    /// # Errors
    /// * `InvalidLifetime` - A TTL cannot be added to the current time
    pub fn settings(&self) -> Result<AuthenticatorSettings, TokenError> {
        Ok(AuthenticatorSettings {
            algorithm: self.algorithm,
            lifetimes: TokenLifetimes::from_minutes(
                self.access_ttl_minutes,
                self.confirmation_ttl_minutes,
            )?,
            policy: AuthenticationPolicy {
                require_confirmed_login: self.require_confirmed_login,
            },
        })
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, AUTH__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: AUTH__SECRET=... overrides auth.secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "auth.secret must be set (AUTH__SECRET)".to_string(),
            ));
        }

        self.auth
            .settings()
            .map_err(|e| ConfigError::Message(format!("auth TTL settings: {}", e)))?;

        if self.auth.secret.len() < 32 {
            tracing::warn!(
                secret_length = self.auth.secret.len(),
                "auth.secret is shorter than 32 bytes"
            );
        }

        Ok(())
    }
}
