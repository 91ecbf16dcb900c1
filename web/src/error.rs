//! Error types for web handlers.
//!
//! [`AppError`] bridges workflow errors and HTTP responses. It implements Axum's
//! `IntoResponse`, rendering `{code, message, fields?}` as JSON.

use atelier_core::{BookingError, FieldError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

/// Application error type for web handlers.
///
/// # Examples
///
/// ```ignore
/// async fn handler(State(service): State<BookingService>) -> Result<Json<Workshop>, AppError> {
///     let workshop = service.get_workshop(id, false).await?;
///     Ok(Json(workshop))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Machine-readable error code
    code: &'static str,
    /// Error message (user-facing)
    message: String,
    /// Per-field problems for validation failures
    fields: Vec<FieldError>,
    /// Internal error (logged, never exposed to the client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            fields: Vec::new(),
            source: None,
        }
    }

    /// Attach the underlying error for logging.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Attach per-field problems.
    #[must_use]
    pub fn with_fields(mut self, fields: Vec<FieldError>) -> Self {
        self.fields = fields;
        self
    }

    /// HTTP status this error renders as
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable code
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    /// Per-field problems, empty unless this is a validation failure
    #[must_use]
    pub fn fields(&self) -> &[FieldError] {
        &self.fields
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    /// Create a 400 validation error listing every offending field.
    #[must_use]
    pub fn validation(fields: Vec<FieldError>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", "Validation failed").with_fields(fields)
    }

    /// Create a 401 Unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    /// Create a 403 Forbidden error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "FORBIDDEN", message)
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, code, message)
    }

    /// Create a 409 Conflict error.
    #[must_use]
    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, code, message)
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_SERVER_ERROR", message)
    }

    /// Create a 503 Service Unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE", message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldError>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            match &self.source {
                Some(source) => tracing::error!(
                    status = %self.status,
                    code = self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                ),
                None => tracing::error!(
                    status = %self.status,
                    code = self.code,
                    message = %self.message,
                    "Internal server error"
                ),
            }
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
            fields: self.fields,
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        let message = err.to_string();
        match err {
            BookingError::Validation(fields) => Self::validation(fields),
            BookingError::WorkshopNotFound(_) => Self::not_found("WORKSHOP_NOT_FOUND", message),
            BookingError::RegistrationNotFound => {
                Self::not_found("REGISTRATION_NOT_FOUND", message)
            }
            BookingError::NotAvailableForRegistration => {
                Self::new(StatusCode::BAD_REQUEST, "WORKSHOP_NOT_AVAILABLE", message)
            }
            BookingError::DatePassed => {
                Self::new(StatusCode::BAD_REQUEST, "WORKSHOP_DATE_PASSED", message)
            }
            BookingError::FullyBooked { .. } => {
                Self::new(StatusCode::BAD_REQUEST, "WORKSHOP_FULLY_BOOKED", message)
            }
            BookingError::AlreadyRegistered => {
                Self::new(StatusCode::BAD_REQUEST, "ALREADY_REGISTERED", message)
            }
            BookingError::AlreadyCancelled => {
                Self::new(StatusCode::BAD_REQUEST, "ALREADY_CANCELLED", message)
            }
            BookingError::InvalidTransition { .. } => Self::conflict("INVALID_TRANSITION", message),
            BookingError::WorkshopLocked(_) => Self::conflict("WORKSHOP_LOCKED", message),
            BookingError::HasActiveRegistrations(_) => {
                Self::conflict("HAS_ACTIVE_REGISTRATIONS", message)
            }
            BookingError::CapacityBelowReserved { .. } => {
                Self::conflict("CAPACITY_BELOW_RESERVED", message)
            }
            BookingError::Storage(source) => {
                Self::internal("An internal error occurred").with_source(anyhow::Error::new(source))
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, problems)| {
                let field = camel_case(&field);
                problems.iter().map(move |problem| {
                    let message = problem
                        .message
                        .as_ref()
                        .map_or_else(|| format!("failed `{}` check", problem.code), ToString::to_string);
                    FieldError::new(field.clone(), message)
                })
            })
            .collect();
        // HashMap order is random; keep responses stable.
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        Self::validation(fields)
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("An internal error occurred").with_source(err)
    }
}

/// `number_of_seats` to `numberOfSeats`, matching the JSON field names
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use atelier_core::{StoreError, WorkshopId, WorkshopStatus};
    use http_body_util::BodyExt;
    use validator::Validate;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[BAD_REQUEST] Invalid input");
    }

    #[test]
    fn test_precondition_failures_are_bad_requests() {
        for err in [
            BookingError::NotAvailableForRegistration,
            BookingError::DatePassed,
            BookingError::FullyBooked { requested: 2, available: 1 },
            BookingError::AlreadyRegistered,
            BookingError::AlreadyCancelled,
        ] {
            assert_eq!(AppError::from(err).status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_conflicts() {
        let transition = AppError::from(BookingError::InvalidTransition {
            entity: "workshop",
            from: "completed".into(),
            to: "published".into(),
        });
        assert_eq!(transition.status(), StatusCode::CONFLICT);
        assert_eq!(transition.code(), "INVALID_TRANSITION");

        let blocked = AppError::from(BookingError::HasActiveRegistrations(3));
        assert_eq!(blocked.status(), StatusCode::CONFLICT);

        let locked = AppError::from(BookingError::WorkshopLocked(WorkshopStatus::Cancelled));
        assert_eq!(locked.code(), "WORKSHOP_LOCKED");
    }

    #[test]
    fn test_not_found() {
        let err = AppError::from(BookingError::WorkshopNotFound(WorkshopId::new()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "WORKSHOP_NOT_FOUND");
        assert_eq!(
            AppError::from(BookingError::RegistrationNotFound).code(),
            "REGISTRATION_NOT_FOUND"
        );
    }

    #[tokio::test]
    async fn test_storage_errors_hide_details() {
        let err = AppError::from(BookingError::Storage(StoreError::Database(
            "connection refused on 10.0.0.3".into(),
        )));
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "An internal error occurred");
        assert!(!body.to_string().contains("10.0.0.3"));
    }

    #[tokio::test]
    async fn test_validation_body_lists_fields() {
        let err = AppError::from(BookingError::Validation(vec![
            FieldError::new("phone", "must be between 7 and 20 characters"),
            FieldError::new("numberOfSeats", "must be between 1 and 5"),
        ]));
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["fields"].as_array().unwrap().len(), 2);
        assert_eq!(body["fields"][1]["field"], "numberOfSeats");
    }

    #[tokio::test]
    async fn test_fields_omitted_when_empty() {
        let (_, body) = body_json(AppError::from(BookingError::AlreadyCancelled)).await;
        assert!(body.get("fields").is_none());
        assert_eq!(body["code"], "ALREADY_CANCELLED");
    }

    #[derive(Validate)]
    struct Probe {
        #[validate(range(min = 1, max = 5, message = "must be between 1 and 5"))]
        number_of_seats: u32,
        #[validate(email)]
        email: String,
    }

    #[test]
    fn test_validator_errors_use_wire_names() {
        let probe = Probe {
            number_of_seats: 9,
            email: "nope".into(),
        };
        let err = AppError::from(probe.validate().unwrap_err());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let names: Vec<_> = err.fields().iter().map(|f| f.field.as_str()).collect();
        assert_eq!(names, ["email", "numberOfSeats"]);
        assert_eq!(err.fields()[1].message, "must be between 1 and 5");
    }
}
