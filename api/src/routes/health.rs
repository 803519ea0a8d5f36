use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use serde::Serialize;
use tracing::warn;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub storage: &'static str,
    pub timestamp: i64,
}

/// GET /health
/// Response: 200 OK when both stores answer, 503 otherwise
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let posts = state.posts.recent_posts(1, None).await;
    let users = state.users.user_by_id(0).await;

    let (code, status, storage) = match posts.err().or(users.err()) {
        None => (StatusCode::OK, "healthy", "up"),
        Some(err) => {
            warn!("Health check failed: {}", err);
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "down")
        }
    };

    (
        code,
        Json(HealthReport {
            status,
            storage,
            timestamp: Utc::now().timestamp(),
        }),
    )
}
