use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Serialize;
use std::time::Instant;

use super::AppState;

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum ComponentStatus {
    Healthy,
    Unhealthy,
}

#[derive(Serialize)]
struct ReadinessResponse {
    ready: bool,
    database: ComponentStatus,
    message: String,
    latency_ms: u64,
    timestamp: String,
}

/// GET /health
pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "blog-service",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /health/ready
pub async fn readiness(state: web::Data<AppState>) -> HttpResponse {
    let start = Instant::now();
    let result = state.repo.ping().await;
    let latency_ms = start.elapsed().as_millis() as u64;

    let response = match result {
        Ok(()) => ReadinessResponse {
            ready: true,
            database: ComponentStatus::Healthy,
            message: "Database connection successful".to_string(),
            latency_ms,
            timestamp: Utc::now().to_rfc3339(),
        },
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            ReadinessResponse {
                ready: false,
                database: ComponentStatus::Unhealthy,
                message: format!("Database connection failed: {}", e),
                latency_ms,
                timestamp: Utc::now().to_rfc3339(),
            }
        }
    };

    if response.ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
