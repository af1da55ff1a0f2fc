use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::CredentialsRequestBody;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

/// Check a credential pair. No token or session is issued.
pub async fn login(State(state): State<AppState>, body: Bytes) -> Result<StatusCode, ApiError> {
    let request = CredentialsRequestBody::parse(&body)?;

    state
        .auth_service
        .login(&request.username, &request.password)
        .await?;

    Ok(StatusCode::OK)
}
