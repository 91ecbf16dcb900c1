//! Health check endpoints.
//!
//! Used by load balancers and orchestrators to verify service health.

use atelier_core::BookingService;
use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

/// Liveness: the process is up. Does not touch the database.
///
/// ```text
/// GET /health
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// Readiness report.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Readiness {
    /// `ready` or `unavailable`
    pub status: &'static str,
    /// Whether the workshop store answered
    pub store: bool,
}

/// Readiness: the workshop store answers a ping.
///
/// 200 when ready, 503 otherwise.
///
/// ```text
/// GET /ready
/// ```
pub async fn readiness(State(service): State<BookingService>) -> (StatusCode, Json<Readiness>) {
    match service.health().await {
        Ok(()) => (
            StatusCode::OK,
            Json(Readiness {
                status: "ready",
                store: true,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(Readiness {
                    status: "unavailable",
                    store: false,
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_testing::fixtures;

    #[tokio::test]
    async fn test_simple_health_check() {
        let (status, body) = health_check().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_readiness_follows_store() {
        let (service, store) = fixtures::service();

        let (status, Json(report)) = readiness(State(service.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert!(report.store);

        store.set_unavailable(true);
        let (status, Json(report)) = readiness(State(service)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(report.status, "unavailable");
    }
}
