use axum::extract::State;
use axum::http::StatusCode;
use axum::Form;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

/// OAuth2 password grant: form-encoded `username` (the email) and `password`.
pub async fn login<US: UserServicePort>(
    State(state): State<AppState<US>>,
    Form(form): Form<LoginForm>,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    state
        .user_service
        .login(&form.username, &form.password)
        .await
        .map_err(ApiError::from)
        .map(|outcome| {
            ApiSuccess::new(
                StatusCode::OK,
                TokenResponseData {
                    access_token: outcome.access_token,
                    token_type: "bearer".to_string(),
                },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenResponseData {
    pub access_token: String,
    pub token_type: String,
}
