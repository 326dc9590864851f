use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

/// Redeem the confirmation token carried in the link sent at registration.
pub async fn confirm_user<US: UserServicePort>(
    State(state): State<AppState<US>>,
    Path(token): Path<String>,
) -> Result<ApiSuccess<ConfirmUserResponseData>, ApiError> {
    let user = state
        .user_service
        .confirm_user(&token)
        .await
        .map_err(ApiError::from)?;

    tracing::info!(user_id = %user.id, "User confirmed");

    Ok(ApiSuccess::new(
        StatusCode::OK,
        ConfirmUserResponseData {
            detail: "User confirmed".to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmUserResponseData {
    pub detail: String,
}
