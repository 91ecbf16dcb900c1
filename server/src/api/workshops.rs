//! Workshop catalog endpoints.
//!
//! - GET /api/workshops - Upcoming published workshops
//! - GET /api/workshops/:id - Workshop details (drafts and cancelled only for admins)
//! - POST /api/workshops - Create a workshop (admin)
//! - PUT /api/workshops/:id - Update details (admin)
//! - PUT /api/workshops/:id/{publish,complete,cancel} - Lifecycle (admin)
//! - DELETE /api/workshops/:id - Delete, blocked by active registrations (admin)
//! - DELETE /api/workshops/:id/force - Delete with all registrations (admin)
//! - GET /api/workshops/admin/workshops?status= - Admin listing

use super::invalid;
use crate::metrics;
use atelier_core::{
    BookingService, Money, Schedule, Workshop, WorkshopChanges, WorkshopDraft, WorkshopId,
    WorkshopStatus,
};
use atelier_web::{AdminPrincipal, AppError, ValidatedJson};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to create a workshop.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkshopRequest {
    /// Title shown to customers
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Longer description
    #[validate(length(max = 5000))]
    #[serde(default)]
    pub description: String,
    /// Who runs the session
    #[validate(length(max = 200))]
    pub instructor: Option<String>,
    /// Where it takes place
    #[validate(length(max = 200))]
    pub location: Option<String>,
    /// Session date
    pub date: NaiveDate,
    /// Start time
    pub start_time: NaiveTime,
    /// End time
    pub end_time: NaiveTime,
    /// Seat capacity
    #[validate(range(min = 1, max = 500))]
    pub max_participants: u32,
    /// Price per seat in minor units
    #[validate(range(min = 0))]
    pub price: i64,
    /// `draft` (default) or `published`
    pub status: Option<WorkshopStatus>,
}

impl CreateWorkshopRequest {
    fn into_draft(self) -> Result<WorkshopDraft, AppError> {
        Ok(WorkshopDraft {
            title: self.title,
            description: self.description,
            instructor: self.instructor,
            location: self.location,
            schedule: Schedule {
                date: self.date,
                start_time: self.start_time,
                end_time: self.end_time,
            },
            max_participants: self.max_participants,
            price: Money::from_minor(self.price).map_err(invalid)?,
            status: self.status.unwrap_or(WorkshopStatus::Draft),
        })
    }
}

/// Partial update of a workshop. Omitted fields keep their value.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkshopRequest {
    /// New title
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    /// New description
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    /// New instructor
    #[validate(length(max = 200))]
    pub instructor: Option<String>,
    /// New location
    #[validate(length(max = 200))]
    pub location: Option<String>,
    /// New date
    pub date: Option<NaiveDate>,
    /// New start time
    pub start_time: Option<NaiveTime>,
    /// New end time
    pub end_time: Option<NaiveTime>,
    /// New capacity
    #[validate(range(min = 1, max = 500))]
    pub max_participants: Option<u32>,
    /// New price per seat in minor units
    #[validate(range(min = 0))]
    pub price: Option<i64>,
}

impl UpdateWorkshopRequest {
    fn into_changes(self) -> Result<WorkshopChanges, AppError> {
        Ok(WorkshopChanges {
            title: self.title,
            description: self.description,
            instructor: self.instructor,
            location: self.location,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            max_participants: self.max_participants,
            price: self.price.map(Money::from_minor).transpose().map_err(invalid)?,
        })
    }
}

/// A workshop with its derived availability.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkshopView {
    /// Stored fields
    #[serde(flatten)]
    pub workshop: Workshop,
    /// Seats still free
    pub available_seats: u32,
    /// Whether no seat is left
    pub is_fully_booked: bool,
    /// Whether the session date has passed
    pub is_past: bool,
}

impl WorkshopView {
    fn new(workshop: Workshop, today: NaiveDate) -> Self {
        Self {
            available_seats: workshop.available_seats(),
            is_fully_booked: workshop.is_fully_booked(),
            is_past: workshop.is_past(today),
            workshop,
        }
    }
}

fn view(service: &BookingService, workshop: Workshop) -> WorkshopView {
    WorkshopView::new(workshop, service.environment().clock.today())
}

fn views(service: &BookingService, workshops: Vec<Workshop>) -> Vec<WorkshopView> {
    let today = service.environment().clock.today();
    workshops
        .into_iter()
        .map(|workshop| WorkshopView::new(workshop, today))
        .collect()
}

/// Query parameters for the admin listing.
#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    /// Filter by status
    pub status: Option<WorkshopStatus>,
}

/// Response after cancelling a workshop.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkshopCancelledResponse {
    /// The cancelled workshop
    pub workshop: WorkshopView,
    /// Registrations cancelled with it
    pub registrations_cancelled: u64,
}

/// Response after a forced deletion.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForceDeleteResponse {
    /// The deleted workshop
    pub workshop_id: WorkshopId,
    /// Registrations deleted with it
    pub registrations_deleted: u64,
}

// ============================================================================
// Public Handlers
// ============================================================================

/// List upcoming published workshops.
///
/// # Errors
///
/// 500 on storage failure.
pub async fn list_public(
    State(service): State<BookingService>,
) -> Result<Json<Vec<WorkshopView>>, AppError> {
    let workshops = service.list_upcoming().await?;
    Ok(Json(views(&service, workshops)))
}

/// Get one workshop. Admins also see drafts and cancelled workshops.
///
/// # Errors
///
/// 404 if the workshop does not exist or is hidden from the caller.
pub async fn get_workshop(
    admin: Option<AdminPrincipal>,
    State(service): State<BookingService>,
    Path(id): Path<WorkshopId>,
) -> Result<Json<WorkshopView>, AppError> {
    let workshop = service.get_workshop(id, admin.is_some()).await?;
    Ok(Json(view(&service, workshop)))
}

// ============================================================================
// Admin Handlers
// ============================================================================

/// Create a workshop.
///
/// # Errors
///
/// 400 on invalid fields, 401/403 without an admin token.
pub async fn create_workshop(
    admin: AdminPrincipal,
    State(service): State<BookingService>,
    ValidatedJson(request): ValidatedJson<CreateWorkshopRequest>,
) -> Result<(StatusCode, Json<WorkshopView>), AppError> {
    let workshop = service.create_workshop(request.into_draft()?).await?;
    tracing::info!(admin = %admin.subject, workshop_id = %workshop.id, "Workshop created via API");
    Ok((StatusCode::CREATED, Json(view(&service, workshop))))
}

/// Update a workshop's details.
///
/// # Errors
///
/// 409 if the workshop is cancelled or completed, or the new capacity is below the
/// seats already reserved.
pub async fn update_workshop(
    admin: AdminPrincipal,
    State(service): State<BookingService>,
    Path(id): Path<WorkshopId>,
    ValidatedJson(request): ValidatedJson<UpdateWorkshopRequest>,
) -> Result<Json<WorkshopView>, AppError> {
    let workshop = service.update_workshop(id, request.into_changes()?).await?;
    tracing::info!(admin = %admin.subject, workshop_id = %id, "Workshop updated");
    Ok(Json(view(&service, workshop)))
}

/// Publish a draft workshop.
///
/// # Errors
///
/// 409 unless the workshop is a draft; 400 if its date has passed.
pub async fn publish_workshop(
    admin: AdminPrincipal,
    State(service): State<BookingService>,
    Path(id): Path<WorkshopId>,
) -> Result<Json<WorkshopView>, AppError> {
    let workshop = service.publish_workshop(id).await?;
    tracing::info!(admin = %admin.subject, workshop_id = %id, "Workshop published");
    Ok(Json(view(&service, workshop)))
}

/// Mark a published workshop as completed.
///
/// # Errors
///
/// 409 unless the workshop is published.
pub async fn complete_workshop(
    admin: AdminPrincipal,
    State(service): State<BookingService>,
    Path(id): Path<WorkshopId>,
) -> Result<Json<WorkshopView>, AppError> {
    let workshop = service.complete_workshop(id).await?;
    tracing::info!(admin = %admin.subject, workshop_id = %id, "Workshop completed");
    Ok(Json(view(&service, workshop)))
}

/// Cancel a workshop and, atomically, every registration still open on it.
///
/// # Errors
///
/// 409 if the workshop is already cancelled or completed.
pub async fn cancel_workshop(
    admin: AdminPrincipal,
    State(service): State<BookingService>,
    Path(id): Path<WorkshopId>,
) -> Result<Json<WorkshopCancelledResponse>, AppError> {
    let outcome = service.cancel_workshop(id).await?;
    metrics::record_workshop_cancelled(outcome.bookings_cancelled);
    tracing::info!(
        admin = %admin.subject,
        workshop_id = %id,
        registrations_cancelled = outcome.bookings_cancelled,
        "Workshop cancelled"
    );
    Ok(Json(WorkshopCancelledResponse {
        workshop: view(&service, outcome.workshop),
        registrations_cancelled: outcome.bookings_cancelled,
    }))
}

/// Delete a workshop that has no active registrations.
///
/// # Errors
///
/// 409 while registrations still hold seats.
pub async fn delete_workshop(
    admin: AdminPrincipal,
    State(service): State<BookingService>,
    Path(id): Path<WorkshopId>,
) -> Result<StatusCode, AppError> {
    service.delete_workshop(id).await?;
    metrics::record_workshop_deleted("guarded");
    tracing::info!(admin = %admin.subject, workshop_id = %id, "Workshop deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a workshop and all of its registrations, whatever their status.
///
/// # Errors
///
/// 404 if the workshop does not exist.
pub async fn force_delete_workshop(
    admin: AdminPrincipal,
    State(service): State<BookingService>,
    Path(id): Path<WorkshopId>,
) -> Result<Json<ForceDeleteResponse>, AppError> {
    let removed = service.force_delete_workshop(id).await?;
    metrics::record_workshop_deleted("force");
    tracing::warn!(
        admin = %admin.subject,
        workshop_id = %id,
        registrations_deleted = removed,
        "Workshop force-deleted"
    );
    Ok(Json(ForceDeleteResponse {
        workshop_id: id,
        registrations_deleted: removed,
    }))
}

/// List workshops in any status.
///
/// # Errors
///
/// 401/403 without an admin token.
pub async fn list_admin(
    _admin: AdminPrincipal,
    State(service): State<BookingService>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Vec<WorkshopView>>, AppError> {
    let workshops = service.list_workshops(query.status).await?;
    Ok(Json(views(&service, workshops)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_fields_stay_unchanged() {
        let request = UpdateWorkshopRequest {
            max_participants: Some(12),
            end_time: NaiveTime::from_hms_opt(13, 0, 0),
            ..Default::default()
        };
        let changes = request.into_changes().ok();
        assert_eq!(changes.as_ref().and_then(|c| c.max_participants), Some(12));
        assert_eq!(changes.as_ref().and_then(|c| c.end_time), NaiveTime::from_hms_opt(13, 0, 0));
        assert!(changes.is_some_and(|c| c.date.is_none() && c.start_time.is_none()));
    }

    #[test]
    fn negative_price_is_rejected() {
        let request = UpdateWorkshopRequest {
            price: Some(-1),
            ..Default::default()
        };
        assert!(request.into_changes().is_err());
    }
}
