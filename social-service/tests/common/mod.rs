#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::AuthenticatorSettings;
use auth::CredentialIssuer;
use auth::TokenCodec;
use auth::TokenLifetimes;
use social_service::domain::user::models::User;
use social_service::domain::user::service::UserService;
use social_service::inbound::http::router::create_router;
use social_service::user::errors::ConfirmationError;
use social_service::user::errors::UserError;
use social_service::user::ports::ConfirmationSender;
use social_service::user::ports::UserRepository;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server over an in-memory repository
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub repository: Arc<InMemoryUserRepository>,
    pub outbox: Arc<RecordingConfirmationSender>,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn with the service defaults (confirmation required before login)
    pub async fn spawn() -> Self {
        Self::spawn_with(AuthenticatorSettings {
            policy: auth::AuthenticationPolicy {
                require_confirmed_login: true,
            },
            ..AuthenticatorSettings::default()
        })
        .await
    }

    /// Spawn the application in a background task and return TestApp
    pub async fn spawn_with(settings: AuthenticatorSettings) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryUserRepository::default());
        let outbox = Arc::new(RecordingConfirmationSender::default());

        let user_service = Arc::new(UserService::new(
            Arc::clone(&repository),
            Arc::clone(&outbox),
            TEST_SECRET,
            settings,
        ));

        let router = create_router(user_service);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            repository,
            outbox,
            api_client: reqwest::Client::builder()
                .build()
                .expect("Failed to create reqwest client"),
        }
    }

    /// Issuer sharing the server's secret, with the given lifetimes in minutes
    pub fn issuer(&self, access_minutes: i64, confirmation_minutes: i64) -> CredentialIssuer {
        CredentialIssuer::new(
            Arc::new(TokenCodec::new(TEST_SECRET, Default::default())),
            TokenLifetimes::from_minutes(access_minutes, confirmation_minutes)
                .expect("Lifetimes out of range"),
        )
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    pub async fn register(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/register")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/token")
            .form(&[("username", email), ("password", password)])
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn confirm(&self, token: &str) -> reqwest::Response {
        self.get(&format!("/confirm/{}", token))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register, confirm and log in; returns the access token
    pub async fn confirmed_user_token(&self, email: &str, password: &str) -> String {
        self.register(email, password).await;
        let token = self
            .outbox
            .token_for(email)
            .expect("No confirmation token sent");
        self.confirm(&token).await;

        let body: serde_json::Value = self
            .login(email, password)
            .await
            .json()
            .await
            .expect("Failed to parse response");

        body["data"]["access_token"]
            .as_str()
            .expect("Missing access token")
            .to_string()
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn get(&self, email: &str) -> Option<User> {
        self.users.lock().unwrap().get(email).cloned()
    }

    pub fn remove(&self, email: &str) {
        self.users.lock().unwrap().remove(email);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        let email = user.email.as_str().to_string();

        if users.contains_key(&email) {
            return Err(UserError::EmailAlreadyExists(email));
        }

        users.insert(email, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self.users.lock().unwrap().get(email).cloned())
    }

    async fn set_confirmed(&self, email: &str) -> Result<(), UserError> {
        match self.users.lock().unwrap().get_mut(email) {
            Some(user) => {
                user.confirmed = true;
                Ok(())
            }
            None => Err(UserError::NotFound(email.to_string())),
        }
    }
}

/// Keeps every confirmation token it is asked to deliver
#[derive(Default)]
pub struct RecordingConfirmationSender {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingConfirmationSender {
    pub fn token_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, token)| token.clone())
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl ConfirmationSender for RecordingConfirmationSender {
    async fn send_confirmation(&self, user: &User, token: &str) -> Result<(), ConfirmationError> {
        self.sent
            .lock()
            .unwrap()
            .push((user.email.as_str().to_string(), token.to_string()));
        Ok(())
    }
}
