//! Axum integration for the Atelier booking service.
//!
//! The workflows in `atelier-core` are the functional core; this crate is the
//! thin shell that turns HTTP into workflow calls and workflow results into HTTP.
//!
//! # Request Flow
//!
//! 1. **Correlation middleware** tags the request and opens its span
//! 2. **Extractors** parse path, query and validated JSON, and resolve the caller
//! 3. The handler calls a [`BookingService`](atelier_core::BookingService) workflow
//! 4. Errors become [`AppError`], rendered as `{code, message, fields?}`
//!
//! # Example
//!
//! ```ignore
//! async fn register(
//!     State(service): State<BookingService>,
//!     Path(id): Path<WorkshopId>,
//!     ValidatedJson(body): ValidatedJson<RegisterBody>,
//! ) -> Result<(StatusCode, Json<RegistrationConfirmation>), AppError> {
//!     let confirmation = service.register(id, body.into_request()?).await?;
//!     Ok((StatusCode::CREATED, Json(confirmation)))
//! }
//! ```

#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;

pub use error::AppError;
pub use extractors::{
    AdminPrincipal, BearerToken, CorrelationId, Principal, PrincipalResolver, Role, ValidatedJson,
};
pub use middleware::{CORRELATION_ID_HEADER, correlation_id_layer};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
