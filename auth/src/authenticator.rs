use std::sync::Arc;

use crate::credentials::CredentialFailure;
use crate::credentials::CredentialIssuer;
use crate::credentials::CredentialVerifier;
use crate::credentials::TokenLifetimes;
use crate::jwt::SigningAlgorithm;
use crate::jwt::TokenCodec;
use crate::jwt::TokenType;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::store::Account;
use crate::store::CredentialStore;

/// Rules applied on top of credential checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthenticationPolicy {
    /// Reject password logins from accounts that have not redeemed their
    /// confirmation token yet.
    pub require_confirmed_login: bool,
}

/// Construction parameters for [`Authenticator`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthenticatorSettings {
    pub algorithm: SigningAlgorithm,
    pub lifetimes: TokenLifetimes,
    pub policy: AuthenticationPolicy,
}

/// Authentication coordinator.
///
/// Combines password verification, token issuance and token verification
/// with account lookups through a [`CredentialStore`]. Holds no mutable
/// state; share it behind an `Arc`.
pub struct Authenticator<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
    password_hasher: PasswordHasher,
    issuer: CredentialIssuer,
    verifier: CredentialVerifier,
    policy: AuthenticationPolicy,
}

impl<S> Authenticator<S>
where
    S: CredentialStore,
{
    /// Create an authenticator with default lifetimes, HS256 and a policy
    /// that accepts unconfirmed password logins.
    ///
    /// # Arguments
    /// * `secret` - Shared signing secret
    /// * `store` - Account lookup implementation
    pub fn new(secret: &[u8], store: Arc<S>) -> Self {
        Self::with_settings(secret, store, AuthenticatorSettings::default())
    }

    pub fn with_settings(secret: &[u8], store: Arc<S>, settings: AuthenticatorSettings) -> Self {
        let codec = Arc::new(TokenCodec::new(secret, settings.algorithm));

        Self {
            store,
            password_hasher: PasswordHasher::new(),
            issuer: CredentialIssuer::new(Arc::clone(&codec), settings.lifetimes),
            verifier: CredentialVerifier::new(codec),
            policy: settings.policy,
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `HashingFailed` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// # Errors
    /// * `TokenIssuance` - Token encoding failed
    pub fn issue_access_token(&self, subject: &str) -> Result<String, CredentialFailure> {
        Ok(self.issuer.issue_access_token(subject)?)
    }

    /// # Errors
    /// * `TokenIssuance` - Token encoding failed
    pub fn issue_confirmation_token(&self, subject: &str) -> Result<String, CredentialFailure> {
        Ok(self.issuer.issue_confirmation_token(subject)?)
    }

    /// Authenticate an account by identifier and password.
    ///
    /// An unknown identifier and a wrong password produce the same failure.
    ///
    /// # Returns
    /// The authenticated account
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown identifier or wrong password
    /// * `AccountNotConfirmed` - Password matched but the policy requires a
    ///   confirmed account
    /// * `StoreUnavailable` - Account lookup failed
    pub async fn authenticate_with_password(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<S::Account, CredentialFailure> {
        tracing::debug!(identifier, "Authenticating with password");

        let account = self
            .store
            .find_user_by_identifier(identifier)
            .await
            .map_err(|e| {
                tracing::error!(identifier, error = %e, "Account lookup failed");
                CredentialFailure::from(e)
            })?;

        let Some(account) = account else {
            tracing::warn!(identifier, "Password login for unknown identifier");
            return Err(CredentialFailure::InvalidCredentials);
        };

        if !self
            .password_hasher
            .verify(password, account.password_hash())
        {
            tracing::warn!(identifier, "Password login with wrong password");
            return Err(CredentialFailure::InvalidCredentials);
        }

        if self.policy.require_confirmed_login && !account.is_confirmed() {
            tracing::warn!(identifier, "Password login before email confirmation");
            return Err(CredentialFailure::AccountNotConfirmed);
        }

        Ok(account)
    }

    /// Authenticate the account a token vouches for.
    ///
    /// # Returns
    /// The account named by the token subject
    ///
    /// # Errors
    /// * `InvalidSignature`, `Expired`, `MalformedToken`, `WrongTokenType` -
    ///   Token verification failed
    /// * `UserNotFound` - Subject no longer exists
    /// * `StoreUnavailable` - Account lookup failed
    pub async fn authenticate_with_token(
        &self,
        token: &str,
        expected: TokenType,
    ) -> Result<S::Account, CredentialFailure> {
        let subject = self.verifier.verify(token, expected).map_err(|e| {
            tracing::warn!(token_type = %expected, error = %e, "Token rejected");
            e
        })?;

        self.store
            .find_user_by_identifier(&subject)
            .await
            .map_err(|e| {
                tracing::error!(subject = %subject, error = %e, "Account lookup failed");
                CredentialFailure::from(e)
            })?
            .ok_or_else(|| {
                tracing::warn!(subject = %subject, "Token subject no longer exists");
                CredentialFailure::UserNotFound
            })
    }

    /// Redeem a confirmation token and mark the account confirmed.
    ///
    /// Confirming an account that is already confirmed succeeds without
    /// touching the store.
    ///
    /// # Returns
    /// The confirmed account
    ///
    /// # Errors
    /// Same as [`Authenticator::authenticate_with_token`], plus
    /// `StoreUnavailable` when the update fails.
    pub async fn confirm_user(&self, token: &str) -> Result<S::Account, CredentialFailure> {
        let mut account = self
            .authenticate_with_token(token, TokenType::Confirmation)
            .await?;

        if account.is_confirmed() {
            tracing::debug!(identifier = account.identifier(), "Account already confirmed");
            return Ok(account);
        }

        self.store
            .set_user_confirmed(account.identifier())
            .await
            .map_err(|e| {
                tracing::error!(
                    identifier = account.identifier(),
                    error = %e,
                    "Failed to mark account confirmed"
                );
                CredentialFailure::from(e)
            })?;

        account.mark_confirmed();
        tracing::info!(identifier = account.identifier(), "Account confirmed");

        Ok(account)
    }
}
