//! Router configuration for the booking server.

use super::state::AppState;
use crate::api::{registrations, workshops};
use atelier_web::correlation_id_layer;
use atelier_web::handlers::{health_check, readiness};
use axum::{
    Router,
    http::HeaderValue,
    routing::{delete, get, post, put},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// Public routes need no credentials; every route under `/api/workshops/admin`,
/// and the mutating workshop routes, require an admin bearer token (enforced by
/// the `AdminPrincipal` extractor in each handler).
///
/// `cors_origins` lists allowed origins; empty allows any.
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    let workshop_routes = Router::new()
        // Public catalog and guest registration
        .route(
            "/",
            get(workshops::list_public).post(workshops::create_workshop),
        )
        .route(
            "/:id",
            get(workshops::get_workshop)
                .put(workshops::update_workshop)
                .delete(workshops::delete_workshop),
        )
        .route("/:id/register", post(registrations::register))
        .route(
            "/registrations/:registration_number",
            get(registrations::find_registration),
        )
        .route(
            "/registrations/:registration_number/cancel",
            put(registrations::cancel_registration),
        )
        // Administration
        .route("/:id/publish", put(workshops::publish_workshop))
        .route("/:id/complete", put(workshops::complete_workshop))
        .route("/:id/cancel", put(workshops::cancel_workshop))
        .route("/:id/force", delete(workshops::force_delete_workshop))
        .route("/:id/registrations", get(registrations::list_for_workshop))
        .route("/admin/workshops", get(workshops::list_admin))
        .route("/admin/registrations", get(registrations::list_all))
        .route(
            "/admin/registrations/:registration_number/attendance",
            put(registrations::mark_attendance),
        )
        .route(
            "/admin/registrations/:registration_number/payment",
            put(registrations::record_payment),
        );

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness))
        .nest("/api/workshops", workshop_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .layer(correlation_id_layer())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(%origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}
