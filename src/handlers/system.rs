use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - service banner
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "invoice-link-api",
            "version": version,
            "description": "Public invoice and document review lookups by token",
            "endpoints": {
                "invoices": "/public/invoices/:token, /public/invoices/lookup (public)",
                "reviews": "/public/reviews/:token, /public/reviews/lookup (public)",
                "health": "/health (public)",
            }
        }
    }))
}

/// GET /health - backend connectivity
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "backend": state.backend_name()
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "record store unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "backend": state.backend_name()
                    }
                })),
            )
        }
    }
}
