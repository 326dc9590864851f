use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::AuthenticatorSettings;
use auth::TokenType;
use chrono::Utc;

use crate::domain::user::models::LoginOutcome;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::Registration;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::store::RepositoryCredentialStore;
use crate::user::errors::UserError;
use crate::user::ports::ConfirmationSender;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
/// Credential checks are delegated to an [`Authenticator`] reading the same
/// repository.
pub struct UserService<UR, CS>
where
    UR: UserRepository,
    CS: ConfirmationSender,
{
    repository: Arc<UR>,
    confirmation_sender: Arc<CS>,
    authenticator: Authenticator<RepositoryCredentialStore<UR>>,
}

impl<UR, CS> UserService<UR, CS>
where
    UR: UserRepository,
    CS: ConfirmationSender,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `confirmation_sender` - Confirmation token delivery implementation
    /// * `secret` - Token signing secret
    /// * `settings` - Token lifetimes, algorithm and login policy
    pub fn new(
        repository: Arc<UR>,
        confirmation_sender: Arc<CS>,
        secret: &[u8],
        settings: AuthenticatorSettings,
    ) -> Self {
        let store = Arc::new(RepositoryCredentialStore::new(Arc::clone(&repository)));

        Self {
            repository,
            confirmation_sender,
            authenticator: Authenticator::with_settings(secret, store, settings),
        }
    }
}

#[async_trait]
impl<UR, CS> UserServicePort for UserService<UR, CS>
where
    UR: UserRepository,
    CS: ConfirmationSender,
{
    async fn register_user(
        &self,
        command: RegisterUserCommand,
    ) -> Result<Registration, UserError> {
        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(UserError::EmailAlreadyExists(command.email.to_string()));
        }

        let password_hash = self.authenticator.hash_password(&command.password)?;

        let user = User {
            id: UserId::new(),
            email: command.email,
            password_hash,
            confirmed: false,
            created_at: Utc::now(),
        };

        let created_user = self.repository.create(user).await?;
        let confirmation_token = self
            .authenticator
            .issue_confirmation_token(created_user.email.as_str())?;

        tracing::info!(user_id = %created_user.id, "User registered");

        // Registration stands even if delivery fails; the user can ask again.
        if let Err(e) = self
            .confirmation_sender
            .send_confirmation(&created_user, &confirmation_token)
            .await
        {
            tracing::error!(
                "Failed to send confirmation for user {}: {}",
                created_user.id,
                e
            );
        }

        Ok(Registration {
            user: created_user,
            confirmation_token,
        })
    }

    async fn confirm_user(&self, token: &str) -> Result<User, UserError> {
        Ok(self.authenticator.confirm_user(token).await?)
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, UserError> {
        let user = self
            .authenticator
            .authenticate_with_password(email, password)
            .await?;
        let access_token = self.authenticator.issue_access_token(user.email.as_str())?;

        Ok(LoginOutcome { user, access_token })
    }

    async fn current_user(&self, access_token: &str) -> Result<User, UserError> {
        Ok(self
            .authenticator
            .authenticate_with_token(access_token, TokenType::Access)
            .await?)
    }
}
