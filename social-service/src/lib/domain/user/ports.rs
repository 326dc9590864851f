use async_trait::async_trait;

use crate::domain::user::models::LoginOutcome;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::Registration;
use crate::domain::user::models::User;
use crate::user::errors::ConfirmationError;
use crate::user::errors::UserError;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new, unconfirmed user.
    ///
    /// # Arguments
    /// * `command` - Validated command containing email and password
    ///
    /// # Returns
    /// Created user and the confirmation token to send them
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Password` - Password hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn register_user(&self, command: RegisterUserCommand)
        -> Result<Registration, UserError>;

    /// Redeem a confirmation token.
    ///
    /// # Returns
    /// Confirmed user entity
    ///
    /// # Errors
    /// * `Credential` - Token rejected or user gone
    async fn confirm_user(&self, token: &str) -> Result<User, UserError>;

    /// Verify an email/password pair and issue an access token.
    ///
    /// # Returns
    /// Authenticated user with a fresh access token
    ///
    /// # Errors
    /// * `Credential` - Credentials rejected or store unavailable
    async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, UserError>;

    /// Resolve the user behind an access token.
    ///
    /// # Errors
    /// * `Credential` - Token rejected or user gone
    async fn current_user(&self, access_token: &str) -> Result<User, UserError>;
}

/// Persistence operations for user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Mark the user with this email as confirmed.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn set_confirmed(&self, email: &str) -> Result<(), UserError>;
}

/// Delivery of confirmation tokens to newly registered users.
#[async_trait]
pub trait ConfirmationSender: Send + Sync + 'static {
    /// Send the confirmation token to the user.
    ///
    /// # Arguments
    /// * `user` - Newly registered user
    /// * `token` - Confirmation token to deliver
    ///
    /// # Errors
    /// * `DeliveryFailed` - The token could not be delivered
    async fn send_confirmation(&self, user: &User, token: &str) -> Result<(), ConfirmationError>;
}
