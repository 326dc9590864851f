use async_trait::async_trait;
use thiserror::Error;

/// Account record as seen by the authenticator.
///
/// The record is owned by the persistence layer; the authenticator only
/// reads these fields and flips the confirmation flag.
pub trait Account: Clone + Send + Sync + 'static {
    /// Unique, stable identifier (the account email).
    fn identifier(&self) -> &str;

    /// PHC string produced by the password hasher.
    fn password_hash(&self) -> &str;

    fn is_confirmed(&self) -> bool;

    /// Reflect a successful confirmation on the in-memory record.
    fn mark_confirmed(&mut self);
}

/// Error type for credential store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("No account with identifier: {0}")]
    NotFound(String),
}

/// Lookup and update contract the authenticator needs from persistence.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    type Account: Account;

    /// Retrieve an account by identifier.
    ///
    /// # Returns
    /// Optional account (None if no account uses the identifier)
    ///
    /// # Errors
    /// * `Unavailable` - The store could not be reached or failed
    async fn find_user_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<Self::Account>, StoreError>;

    /// Set the confirmation flag of an account.
    ///
    /// # Errors
    /// * `NotFound` - No account uses the identifier
    /// * `Unavailable` - The store could not be reached or failed
    async fn set_user_confirmed(&self, identifier: &str) -> Result<(), StoreError>;
}
