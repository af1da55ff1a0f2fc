use axum::Json;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponseBody {
    pub status: &'static str,
}

pub async fn health() -> Json<HealthResponseBody> {
    tracing::info!("Health check received");
    Json(HealthResponseBody { status: "healthy" })
}
