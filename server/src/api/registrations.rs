//! Registration endpoints.
//!
//! Public (guest) flow, keyed by registration number plus the participant's email:
//! - POST /api/workshops/:id/register
//! - GET /api/workshops/registrations/:registration_number?email=
//! - PUT /api/workshops/registrations/:registration_number/cancel
//!
//! Administration:
//! - GET /api/workshops/:id/registrations
//! - GET /api/workshops/admin/registrations
//! - PUT /api/workshops/admin/registrations/:registration_number/attendance
//! - PUT /api/workshops/admin/registrations/:registration_number/payment

use super::{PageQuery, invalid, registration_number};
use crate::metrics;
use atelier_core::{
    Booking, BookingError, BookingFilter, BookingService, BookingStatus, CancellationReceipt,
    Email, Page, Participant, PaymentStatus, RegistrationConfirmation, RegistrationRequest,
    WorkshopId,
};
use atelier_web::{AdminPrincipal, AppError, ValidatedJson};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Request Types
// ============================================================================

/// Guest registration for a workshop.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Participant's full name
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Contact email; identifies the participant for cancellation
    #[validate(email)]
    pub email: String,
    /// Contact phone
    #[validate(length(min = 7, max = 20))]
    pub phone: String,
    /// Age, if given
    #[validate(range(min = 1, max = 120))]
    pub age: Option<u8>,
    /// Dietary needs, accessibility, etc.
    #[validate(length(max = 500))]
    pub special_requirements: Option<String>,
    /// Seats to reserve
    #[validate(range(min = 1, max = 5, message = "must be between 1 and 5"))]
    pub number_of_seats: u32,
}

impl RegisterRequest {
    fn into_request(self) -> Result<RegistrationRequest, BookingError> {
        let participant = Participant {
            name: self.name.trim().to_string(),
            email: Email::parse(&self.email)?,
            phone: self.phone.trim().to_string(),
            age: self.age,
            special_requirements: self
                .special_requirements
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        };
        RegistrationRequest::new(participant, self.number_of_seats)
    }
}

/// Email query parameter for guest lookups.
#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    /// The participant's email
    pub email: String,
}

/// Guest cancellation.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    /// The participant's email
    #[validate(email)]
    pub email: String,
    /// Optional reason
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

/// Filters for a workshop's registrations.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkshopRegistrationsQuery {
    /// Only this status
    pub status: Option<BookingStatus>,
    /// Page index
    pub page: Option<u32>,
    /// Items per page
    pub page_size: Option<u32>,
}

/// Filters for the global registration listing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationsQuery {
    /// Only this workshop
    pub workshop_id: Option<WorkshopId>,
    /// Only this status
    pub status: Option<BookingStatus>,
    /// Only this participant
    pub email: Option<String>,
    /// Page index
    pub page: Option<u32>,
    /// Items per page
    pub page_size: Option<u32>,
}

/// Attendance to record.
#[derive(Debug, Deserialize, Validate)]
pub struct AttendanceRequest {
    /// `attended` or `no-show`
    pub status: BookingStatus,
}

/// Payment status to record.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// New payment status
    pub status: PaymentStatus,
    /// Gateway reference
    #[validate(length(min = 1, max = 100))]
    pub payment_reference: Option<String>,
}

fn email(raw: &str) -> Result<Email, AppError> {
    Email::parse(raw).map_err(invalid)
}

// ============================================================================
// Public Handlers
// ============================================================================

/// Register for a workshop.
///
/// # Errors
///
/// 400 on invalid input or when the workshop is closed, past, full, or already
/// booked by this email; 404 if the workshop does not exist.
pub async fn register(
    State(service): State<BookingService>,
    Path(id): Path<WorkshopId>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegistrationConfirmation>), AppError> {
    let result = match request.into_request() {
        Ok(request) => service.register(id, request).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(confirmation) => {
            metrics::record_registration_confirmed(confirmation.number_of_seats.get());
            Ok((StatusCode::CREATED, Json(confirmation)))
        }
        Err(e) => {
            metrics::record_registration_failed(&e);
            Err(e.into())
        }
    }
}

/// Look up a registration as its participant.
///
/// # Errors
///
/// 404 if the registration does not exist or the email does not match.
pub async fn find_registration(
    State(service): State<BookingService>,
    Path(number): Path<String>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Booking>, AppError> {
    let number = registration_number(&number)?;
    let booking = service.find_registration(number, &email(&query.email)?).await?;
    Ok(Json(booking))
}

/// Cancel a registration as its participant and release its seats.
///
/// # Errors
///
/// 404 if the registration does not exist or the email does not match; 400 if it
/// is already cancelled; 409 once attendance was recorded.
pub async fn cancel_registration(
    State(service): State<BookingService>,
    Path(number): Path<String>,
    ValidatedJson(request): ValidatedJson<CancelRequest>,
) -> Result<Json<CancellationReceipt>, AppError> {
    let number = registration_number(&number)?;
    let receipt = service
        .cancel_registration(number, &email(&request.email)?, request.reason)
        .await?;
    metrics::record_seats_released(receipt.seats_released.get());
    Ok(Json(receipt))
}

// ============================================================================
// Admin Handlers
// ============================================================================

/// List one workshop's registrations, newest first.
///
/// # Errors
///
/// 404 if the workshop does not exist.
pub async fn list_for_workshop(
    _admin: AdminPrincipal,
    State(service): State<BookingService>,
    Path(id): Path<WorkshopId>,
    Query(query): Query<WorkshopRegistrationsQuery>,
) -> Result<Json<Page<Booking>>, AppError> {
    let page = PageQuery {
        page: query.page,
        page_size: query.page_size,
    };
    let bookings = service
        .list_workshop_registrations(id, query.status, page.request())
        .await?;
    Ok(Json(bookings))
}

/// List registrations across workshops, newest first.
///
/// # Errors
///
/// 400 if the email filter is malformed.
pub async fn list_all(
    _admin: AdminPrincipal,
    State(service): State<BookingService>,
    Query(query): Query<RegistrationsQuery>,
) -> Result<Json<Page<Booking>>, AppError> {
    let filter = BookingFilter {
        workshop_id: query.workshop_id,
        status: query.status,
        email: query.email.as_deref().map(email).transpose()?,
    };
    let page = PageQuery {
        page: query.page,
        page_size: query.page_size,
    };
    Ok(Json(service.list_registrations(filter, page.request()).await?))
}

/// Record attendance for a confirmed registration.
///
/// # Errors
///
/// 400 for a status other than `attended`/`no-show`; 409 unless the registration
/// is confirmed.
pub async fn mark_attendance(
    admin: AdminPrincipal,
    State(service): State<BookingService>,
    Path(number): Path<String>,
    ValidatedJson(request): ValidatedJson<AttendanceRequest>,
) -> Result<Json<Booking>, AppError> {
    let number = registration_number(&number)?;
    let booking = service.mark_attendance(number, request.status).await?;
    tracing::info!(
        admin = %admin.subject,
        registration_number = %booking.registration_number,
        status = %booking.status,
        "Attendance recorded"
    );
    Ok(Json(booking))
}

/// Record a payment status change.
///
/// # Errors
///
/// 409 for a refund of a registration that was never paid.
pub async fn record_payment(
    admin: AdminPrincipal,
    State(service): State<BookingService>,
    Path(number): Path<String>,
    ValidatedJson(request): ValidatedJson<PaymentRequest>,
) -> Result<Json<Booking>, AppError> {
    let number = registration_number(&number)?;
    let booking = service
        .record_payment(number, request.status, request.payment_reference)
        .await?;
    tracing::info!(
        admin = %admin.subject,
        registration_number = %booking.registration_number,
        payment_status = %booking.payment_status,
        "Payment status recorded"
    );
    Ok(Json(booking))
}
