use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::app::AppState;

/// GET / - service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "ClarityWeb",
        "version": version,
        "endpoints": {
            "pages": "/login, /register (public), /simplify, /dashboard[/*] (session)",
            "user": "/api/user/onboarding-status, /api/user/reset-onboarding, /api/user/complete-onboarding (session)",
            "extract": "/api/extract (session)",
            "health": "/health (public)"
        }
    }))
}

/// GET /login, /register, /simplify - page shells; markup is served by the frontend
pub async fn page(uri: axum::http::Uri) -> Json<Value> {
    Json(json!({ "page": uri.path().trim_start_matches('/') }))
}

/// GET /health - liveness plus document store reachability
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.accounts.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}
