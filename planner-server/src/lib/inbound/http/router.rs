use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::health::health;
use super::handlers::login::login;
use super::handlers::register::register;
use crate::domain::user::service::AuthService;
use crate::outbound::hashing::Argon2PasswordHasher;
use crate::outbound::repositories::user::SqliteCredentialStore;

pub type PlannerAuthService = AuthService<SqliteCredentialStore, Argon2PasswordHasher>;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<PlannerAuthService>,
}

pub fn create_router(auth_service: Arc<PlannerAuthService>) -> Router {
    let state = AppState { auth_service };

    // No headers in the span, they may carry credentials
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
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
        .route("/health", get(health))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .layer(trace_layer)
        .with_state(state)
}
