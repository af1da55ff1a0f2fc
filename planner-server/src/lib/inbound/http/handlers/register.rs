use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::CredentialsRequestBody;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

/// Create an account. Success carries no body.
pub async fn register(State(state): State<AppState>, body: Bytes) -> Result<StatusCode, ApiError> {
    let request = CredentialsRequestBody::parse(&body)?;

    state
        .auth_service
        .register(&request.username, &request.password)
        .await?;

    Ok(StatusCode::OK)
}
