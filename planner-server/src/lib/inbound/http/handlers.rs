use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use crate::user::errors::AuthError;

pub mod health;
pub mod login;
pub mod register;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    ServiceUnavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidInput(msg) => ApiError::BadRequest(msg),
            AuthError::DuplicateUsername(_) => {
                ApiError::BadRequest("Username already exists".to_string())
            }
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid credentials".to_string())
            }
            // Driver and hashing details stay in the logs
            AuthError::StoreUnavailable(_) => {
                ApiError::ServiceUnavailable("Service temporarily unavailable".to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// Body shared by register and login. Not `Debug`: carries the plaintext password.
#[derive(Deserialize)]
pub struct CredentialsRequestBody {
    pub username: String,
    pub password: String,
}

impl CredentialsRequestBody {
    /// Parse a raw body as JSON, ignoring `Content-Type`.
    ///
    /// Only a JSON object is accepted; arrays and scalars are rejected even
    /// when their elements would line up with the fields.
    ///
    /// # Errors
    /// * `BadRequest` - Invalid JSON, not an object, missing field or wrong field type
    pub fn parse(body: &[u8]) -> Result<Self, ApiError> {
        let value: serde_json::Value = serde_json::from_slice(body).map_err(malformed)?;

        if !value.is_object() {
            tracing::warn!("Rejected credentials body that is not a JSON object");
            return Err(ApiError::BadRequest("Invalid request format".to_string()));
        }

        serde_json::from_value(value).map_err(malformed)
    }
}

fn malformed(err: serde_json::Error) -> ApiError {
    tracing::warn!(error = %err, "Rejected malformed credentials body");
    ApiError::BadRequest("Invalid request format".to_string())
}
