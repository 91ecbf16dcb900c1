//! Application state for the booking HTTP server.

use atelier_core::BookingService;
use atelier_web::PrincipalResolver;
use axum::extract::FromRef;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloned per request; both fields are cheap handles.
#[derive(Clone)]
pub struct AppState {
    /// Booking workflows over the configured store
    pub service: BookingService,
    /// Resolves admin bearer tokens
    pub resolver: Arc<dyn PrincipalResolver>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(service: BookingService, resolver: Arc<dyn PrincipalResolver>) -> Self {
        Self { service, resolver }
    }
}

// Lets handlers take `State<BookingService>` directly
impl FromRef<AppState> for BookingService {
    fn from_ref(state: &AppState) -> Self {
        state.service.clone()
    }
}

// Lets `AdminPrincipal` find the resolver
impl FromRef<AppState> for Arc<dyn PrincipalResolver> {
    fn from_ref(state: &AppState) -> Self {
        state.resolver.clone()
    }
}
