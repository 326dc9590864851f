use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::confirm_user::confirm_user;
use super::handlers::get_current_user::get_current_user;
use super::handlers::login::login;
use super::handlers::register::register;
use super::middleware::authenticate as auth_middleware;
use crate::domain::user::ports::UserServicePort;

pub struct AppState<US>
where
    US: UserServicePort,
{
    pub user_service: Arc<US>,
}

impl<US> Clone for AppState<US>
where
    US: UserServicePort,
{
    fn clone(&self) -> Self {
        Self {
            user_service: Arc::clone(&self.user_service),
        }
    }
}

pub fn create_router<US>(user_service: Arc<US>) -> Router
where
    US: UserServicePort,
{
    let state = AppState { user_service };

    let public_routes = Router::new()
        .route("/register", post(register::<US>))
        .route("/confirm/:token", get(confirm_user::<US>))
        .route("/token", post(login::<US>));

    let protected_routes = Router::new()
        .route("/users/me", get(get_current_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<US>,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            // The path may carry a confirmation token; log the route shape only.
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                path = %redacted_path(request.uri().path()),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

fn redacted_path(path: &str) -> &str {
    if path.starts_with("/confirm/") {
        "/confirm/:token"
    } else {
        path
    }
}
