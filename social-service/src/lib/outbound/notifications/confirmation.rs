use async_trait::async_trait;

use crate::config::Config;
use crate::domain::user::models::User;
use crate::user::errors::ConfirmationError;
use crate::user::ports::ConfirmationSender;

/// Confirmation sender that writes the confirmation link to the log.
///
/// Stands in for a mail gateway: operators (or a log shipper) pick the link
/// up from the `confirmation_url` field.
pub struct LogConfirmationSender {
    public_url: String,
}

impl LogConfirmationSender {
    pub fn new(public_url: impl Into<String>) -> Self {
        Self {
            public_url: public_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.server.public_url.clone())
    }

    /// Link the user follows to redeem `token`.
    pub fn confirmation_url(&self, token: &str) -> String {
        format!("{}/confirm/{}", self.public_url.trim_end_matches('/'), token)
    }
}

#[async_trait]
impl ConfirmationSender for LogConfirmationSender {
    async fn send_confirmation(&self, user: &User, token: &str) -> Result<(), ConfirmationError> {
        if token.is_empty() {
            return Err(ConfirmationError::DeliveryFailed(
                "empty confirmation token".to_string(),
            ));
        }

        tracing::info!(
            user_id = %user.id,
            email = %user.email,
            confirmation_url = %self.confirmation_url(token),
            "Confirmation link issued"
        );

        Ok(())
    }
}
