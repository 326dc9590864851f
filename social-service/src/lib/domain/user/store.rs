use std::sync::Arc;

use async_trait::async_trait;
use auth::CredentialStore;
use auth::StoreError;

use crate::domain::user::models::User;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Exposes a [`UserRepository`] to the authenticator as its credential store.
pub struct RepositoryCredentialStore<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
}

impl<UR> RepositoryCredentialStore<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>) -> Self {
        Self { repository }
    }
}

impl From<UserError> for StoreError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(email) => StoreError::NotFound(email),
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

#[async_trait]
impl<UR> CredentialStore for RepositoryCredentialStore<UR>
where
    UR: UserRepository,
{
    type Account = User;

    async fn find_user_by_identifier(&self, identifier: &str) -> Result<Option<User>, StoreError> {
        Ok(self.repository.find_by_email(identifier).await?)
    }

    async fn set_user_confirmed(&self, identifier: &str) -> Result<(), StoreError> {
        Ok(self.repository.set_confirmed(identifier).await?)
    }
}
