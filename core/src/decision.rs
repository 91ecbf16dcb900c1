//! Pure booking decisions.
//!
//! Each function checks a request against a snapshot of current state and either
//! rejects it or returns a *plan*: a value describing exactly which writes to make.
//! Nothing here performs I/O. A [`WorkshopStore`](crate::store::WorkshopStore)
//! applies plans atomically and re-checks their guards at write time, because the
//! snapshot a decision saw may be stale by the time the plan is committed.

use crate::error::{BookingError, FieldError};
use crate::types::{
    Booking, BookingId, BookingStatus, Email, Participant, PaymentStatus, RegistrationNumber,
    SeatCount, Workshop, WorkshopChanges, WorkshopDraft, WorkshopId, WorkshopStatus,
};
use chrono::{DateTime, NaiveDate, Utc};

/// Longest workshop title
pub const MAX_TITLE_LEN: usize = 200;
/// Longest workshop description
pub const MAX_DESCRIPTION_LEN: usize = 5_000;
/// Longest instructor or location text
pub const MAX_DETAIL_LEN: usize = 200;
/// Largest workshop capacity
pub const MAX_CAPACITY: u32 = 500;
/// Longest cancellation reason
pub const MAX_REASON_LEN: usize = 500;
/// Longest payment reference
pub const MAX_PAYMENT_REFERENCE_LEN: usize = 100;

// ============================================================================
// Plans
// ============================================================================

/// A validated registration request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistrationRequest {
    /// Who is registering
    pub participant: Participant,
    /// Seats requested
    pub seats: SeatCount,
}

impl RegistrationRequest {
    /// Validate participant details and the requested seat count together.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] listing every invalid field.
    pub fn new(participant: Participant, seats: u32) -> Result<Self, BookingError> {
        let mut errors = participant.validate();
        let seats = SeatCount::new(seats).map_err(|e| errors.push(e)).ok();

        match seats {
            Some(seats) if errors.is_empty() => Ok(Self { participant, seats }),
            _ => Err(BookingError::Validation(errors)),
        }
    }
}

/// Writes for a successful registration: insert `booking` and reserve its seats.
///
/// The store must only commit if the workshop is still published and
/// `current + seats <= max` holds at write time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistrationPlan {
    /// The booking to insert
    pub booking: Booking,
}

impl RegistrationPlan {
    /// Workshop whose seats are reserved
    #[must_use]
    pub const fn workshop_id(&self) -> WorkshopId {
        self.booking.workshop_id
    }

    /// Seats to reserve
    #[must_use]
    pub const fn seats(&self) -> SeatCount {
        self.booking.number_of_seats
    }

    /// Same plan under a different registration number.
    #[must_use]
    pub fn with_registration_number(mut self, number: RegistrationNumber) -> Self {
        self.booking.registration_number = number;
        self
    }
}

/// Writes for a booking cancellation: mark the booking cancelled and release its seats.
///
/// The store must only commit if the booking is still `confirmed`; the seat counter
/// is decremented by `release_seats`, floored at zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CancellationPlan {
    /// Booking to cancel
    pub booking_id: BookingId,
    /// Its workshop
    pub workshop_id: WorkshopId,
    /// Its registration number
    pub registration_number: RegistrationNumber,
    /// Seats to give back
    pub release_seats: SeatCount,
    /// Cancellation timestamp
    pub cancelled_at: DateTime<Utc>,
    /// Optional reason given by the participant
    pub reason: Option<String>,
}

/// A guarded workshop status change.
///
/// The store applies it only if the workshop's status is still `from`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusTransition {
    /// Workshop to change
    pub workshop_id: WorkshopId,
    /// Status the decision saw
    pub from: WorkshopStatus,
    /// Target status
    pub to: WorkshopStatus,
    /// When the change happens
    pub at: DateTime<Utc>,
}

/// Writes for editing a workshop's details.
///
/// `workshop` holds the merged details; the store writes everything except the
/// seat counter and status, and rejects the update if the new capacity is below
/// the seats reserved at write time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkshopUpdate {
    /// Workshop with the changes applied
    pub workshop: Workshop,
}

/// A guarded booking status change (attendance marking).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookingTransition {
    /// Booking to change
    pub registration_number: RegistrationNumber,
    /// Status the decision saw
    pub from: BookingStatus,
    /// Target status
    pub to: BookingStatus,
    /// When the change happens
    pub at: DateTime<Utc>,
}

/// A recorded payment outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentChange {
    /// Booking to change
    pub registration_number: RegistrationNumber,
    /// New payment status
    pub status: PaymentStatus,
    /// Gateway reference; `None` keeps the existing one
    pub reference: Option<String>,
    /// When the change happens
    pub at: DateTime<Utc>,
}

// ============================================================================
// Registration and cancellation
// ============================================================================

/// Decide whether `request` can be booked into `workshop`.
///
/// Checks run in order and the first failure is reported:
/// published, not past, enough seats for the *whole* request.
///
/// # Errors
///
/// - [`BookingError::NotAvailableForRegistration`] unless the workshop is published
/// - [`BookingError::DatePassed`] if the workshop date is before `today`
/// - [`BookingError::FullyBooked`] if `current + seats > max`
pub fn decide_registration(
    workshop: &Workshop,
    request: RegistrationRequest,
    registration_number: RegistrationNumber,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<RegistrationPlan, BookingError> {
    if workshop.status != WorkshopStatus::Published {
        return Err(BookingError::NotAvailableForRegistration);
    }
    if workshop.is_past(today) {
        return Err(BookingError::DatePassed);
    }
    if !workshop.can_seat(request.seats) {
        return Err(BookingError::FullyBooked {
            requested: request.seats.get(),
            available: workshop.available_seats(),
        });
    }

    let total_amount = workshop
        .price
        .times(request.seats)
        .ok_or_else(|| BookingError::invalid("numberOfSeats", "total amount is too large"))?;

    Ok(RegistrationPlan {
        booking: Booking {
            id: BookingId::new(),
            workshop_id: workshop.id,
            registration_number,
            participant: request.participant,
            number_of_seats: request.seats,
            total_amount,
            status: BookingStatus::Confirmed,
            payment_status: PaymentStatus::initial_for(total_amount),
            payment_reference: None,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
            cancelled_at: None,
        },
    })
}

/// Check that `email` owns `booking`.
///
/// A mismatch is reported exactly like a missing booking.
///
/// # Errors
///
/// Returns [`BookingError::RegistrationNotFound`] on mismatch.
pub fn authorize_guest(booking: &Booking, email: &Email) -> Result<(), BookingError> {
    if booking.belongs_to(email) {
        Ok(())
    } else {
        Err(BookingError::RegistrationNotFound)
    }
}

/// Decide whether the participant identified by `email` may cancel `booking`.
///
/// # Errors
///
/// - [`BookingError::RegistrationNotFound`] if `email` does not own the booking
/// - [`BookingError::AlreadyCancelled`] if it is cancelled
/// - [`BookingError::InvalidTransition`] if it was attended or marked no-show
/// - [`BookingError::Validation`] if the reason is too long
pub fn decide_cancellation(
    booking: &Booking,
    email: &Email,
    reason: Option<String>,
    now: DateTime<Utc>,
) -> Result<CancellationPlan, BookingError> {
    authorize_guest(booking, email)?;

    match booking.status {
        BookingStatus::Cancelled => return Err(BookingError::AlreadyCancelled),
        status if !status.can_transition_to(BookingStatus::Cancelled) => {
            return Err(BookingError::InvalidTransition {
                entity: "registration",
                from: status.to_string(),
                to: BookingStatus::Cancelled.to_string(),
            });
        }
        _ => {}
    }

    let reason = reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());
    if reason
        .as_ref()
        .is_some_and(|r| r.chars().count() > MAX_REASON_LEN)
    {
        return Err(BookingError::invalid(
            "reason",
            format!("must be at most {MAX_REASON_LEN} characters"),
        ));
    }

    Ok(CancellationPlan {
        booking_id: booking.id,
        workshop_id: booking.workshop_id,
        registration_number: booking.registration_number.clone(),
        release_seats: booking.number_of_seats,
        cancelled_at: now,
        reason,
    })
}

// ============================================================================
// Workshop lifecycle
// ============================================================================

fn transition(
    workshop: &Workshop,
    to: WorkshopStatus,
    now: DateTime<Utc>,
) -> Result<StatusTransition, BookingError> {
    if !workshop.status.can_transition_to(to) {
        return Err(BookingError::InvalidTransition {
            entity: "workshop",
            from: workshop.status.to_string(),
            to: to.to_string(),
        });
    }
    Ok(StatusTransition {
        workshop_id: workshop.id,
        from: workshop.status,
        to,
        at: now,
    })
}

/// `draft → published`, only for workshops that have not already taken place.
///
/// # Errors
///
/// [`BookingError::InvalidTransition`] or [`BookingError::DatePassed`].
pub fn decide_publication(
    workshop: &Workshop,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<StatusTransition, BookingError> {
    let plan = transition(workshop, WorkshopStatus::Published, now)?;
    if workshop.is_past(today) {
        return Err(BookingError::DatePassed);
    }
    Ok(plan)
}

/// `published → completed`.
///
/// # Errors
///
/// [`BookingError::InvalidTransition`] from any other status.
pub fn decide_completion(
    workshop: &Workshop,
    now: DateTime<Utc>,
) -> Result<StatusTransition, BookingError> {
    transition(workshop, WorkshopStatus::Completed, now)
}

/// `draft | published → cancelled`; the store cascades to the bookings.
///
/// # Errors
///
/// [`BookingError::InvalidTransition`] for cancelled or completed workshops.
pub fn decide_workshop_cancellation(
    workshop: &Workshop,
    now: DateTime<Utc>,
) -> Result<StatusTransition, BookingError> {
    transition(workshop, WorkshopStatus::Cancelled, now)
}

// ============================================================================
// Workshop details
// ============================================================================

fn check_text(
    errors: &mut Vec<FieldError>,
    field: &str,
    value: &str,
    required: bool,
    max: usize,
) {
    let len = value.trim().chars().count();
    if required && len == 0 {
        errors.push(FieldError::new(field, "must not be empty"));
    } else if len > max {
        errors.push(FieldError::new(field, format!("must be at most {max} characters")));
    }
}

fn check_capacity(errors: &mut Vec<FieldError>, capacity: u32) {
    if capacity == 0 || capacity > MAX_CAPACITY {
        errors.push(FieldError::new(
            "maxParticipants",
            format!("must be between 1 and {MAX_CAPACITY}"),
        ));
    }
}

fn check_details(errors: &mut Vec<FieldError>, workshop: &Workshop) {
    check_text(errors, "title", &workshop.title, true, MAX_TITLE_LEN);
    check_text(errors, "description", &workshop.description, false, MAX_DESCRIPTION_LEN);
    if let Some(instructor) = &workshop.instructor {
        check_text(errors, "instructor", instructor, false, MAX_DETAIL_LEN);
    }
    if let Some(location) = &workshop.location {
        check_text(errors, "location", location, false, MAX_DETAIL_LEN);
    }
    if let Err(e) = workshop.schedule.validate() {
        errors.push(e);
    }
    check_capacity(errors, workshop.max_participants);
}

/// Build a new workshop from `draft`.
///
/// New workshops start with no reserved seats, as a draft or already published.
///
/// # Errors
///
/// [`BookingError::Validation`] listing every invalid field.
pub fn new_workshop(draft: WorkshopDraft, now: DateTime<Utc>) -> Result<Workshop, BookingError> {
    let workshop = Workshop {
        id: WorkshopId::new(),
        title: draft.title.trim().to_string(),
        description: draft.description.trim().to_string(),
        instructor: draft.instructor.map(|s| s.trim().to_string()),
        location: draft.location.map(|s| s.trim().to_string()),
        schedule: draft.schedule,
        max_participants: draft.max_participants,
        current_participants: 0,
        price: draft.price,
        status: draft.status,
        created_at: now,
        updated_at: now,
    };

    let mut errors = Vec::new();
    check_details(&mut errors, &workshop);
    if !matches!(draft.status, WorkshopStatus::Draft | WorkshopStatus::Published) {
        errors.push(FieldError::new("status", "new workshops must be draft or published"));
    }

    if errors.is_empty() {
        Ok(workshop)
    } else {
        Err(BookingError::Validation(errors))
    }
}

/// Merge `changes` into `workshop`.
///
/// # Errors
///
/// - [`BookingError::WorkshopLocked`] for cancelled or completed workshops
/// - [`BookingError::Validation`] for invalid fields
/// - [`BookingError::CapacityBelowReserved`] if the new capacity cannot hold the
///   seats already reserved
pub fn decide_update(
    workshop: &Workshop,
    changes: WorkshopChanges,
    now: DateTime<Utc>,
) -> Result<WorkshopUpdate, BookingError> {
    if matches!(workshop.status, WorkshopStatus::Cancelled | WorkshopStatus::Completed) {
        return Err(BookingError::WorkshopLocked(workshop.status));
    }

    let mut updated = workshop.clone();
    if let Some(title) = changes.title {
        updated.title = title.trim().to_string();
    }
    if let Some(description) = changes.description {
        updated.description = description.trim().to_string();
    }
    if let Some(instructor) = changes.instructor {
        updated.instructor = Some(instructor.trim().to_string()).filter(|s| !s.is_empty());
    }
    if let Some(location) = changes.location {
        updated.location = Some(location.trim().to_string()).filter(|s| !s.is_empty());
    }
    // Partial schedule edits merge onto this snapshot
    if let Some(date) = changes.date {
        updated.schedule.date = date;
    }
    if let Some(start_time) = changes.start_time {
        updated.schedule.start_time = start_time;
    }
    if let Some(end_time) = changes.end_time {
        updated.schedule.end_time = end_time;
    }
    if let Some(max) = changes.max_participants {
        updated.max_participants = max;
    }
    if let Some(price) = changes.price {
        updated.price = price;
    }
    updated.updated_at = now;

    let mut errors = Vec::new();
    check_details(&mut errors, &updated);
    if !errors.is_empty() {
        return Err(BookingError::Validation(errors));
    }

    if updated.max_participants < workshop.current_participants {
        return Err(BookingError::CapacityBelowReserved {
            requested: updated.max_participants,
            reserved: workshop.current_participants,
        });
    }

    Ok(WorkshopUpdate { workshop: updated })
}

// ============================================================================
// Administrative booking changes
// ============================================================================

/// `confirmed → attended | no-show`.
///
/// # Errors
///
/// - [`BookingError::Validation`] if `status` is not an attendance outcome
/// - [`BookingError::InvalidTransition`] if the booking is no longer confirmed
pub fn decide_attendance(
    booking: &Booking,
    status: BookingStatus,
    now: DateTime<Utc>,
) -> Result<BookingTransition, BookingError> {
    if !matches!(status, BookingStatus::Attended | BookingStatus::NoShow) {
        return Err(BookingError::invalid("status", "must be attended or no-show"));
    }
    if !booking.status.can_transition_to(status) {
        return Err(BookingError::InvalidTransition {
            entity: "registration",
            from: booking.status.to_string(),
            to: status.to_string(),
        });
    }
    Ok(BookingTransition {
        registration_number: booking.registration_number.clone(),
        from: booking.status,
        to: status,
        at: now,
    })
}

/// Record a payment outcome on `booking`.
///
/// Refunds are only recorded for bookings that were paid.
///
/// # Errors
///
/// - [`BookingError::Validation`] for an oversized reference
/// - [`BookingError::InvalidTransition`] when refunding an unpaid booking
pub fn decide_payment(
    booking: &Booking,
    status: PaymentStatus,
    reference: Option<String>,
    now: DateTime<Utc>,
) -> Result<PaymentChange, BookingError> {
    let reference = reference
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());
    if reference
        .as_ref()
        .is_some_and(|r| r.chars().count() > MAX_PAYMENT_REFERENCE_LEN)
    {
        return Err(BookingError::invalid(
            "paymentReference",
            format!("must be at most {MAX_PAYMENT_REFERENCE_LEN} characters"),
        ));
    }
    if status == PaymentStatus::Refunded && booking.payment_status != PaymentStatus::Paid {
        return Err(BookingError::InvalidTransition {
            entity: "payment",
            from: booking.payment_status.to_string(),
            to: status.to_string(),
        });
    }
    Ok(PaymentChange {
        registration_number: booking.registration_number.clone(),
        status,
        reference,
        at: now,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Money, Schedule};
    use chrono::{NaiveTime, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn today() -> NaiveDate {
        now().date_naive()
    }

    fn workshop(max: u32, current: u32) -> Workshop {
        Workshop {
            id: WorkshopId::new(),
            title: "Latte Art Basics".to_string(),
            description: "Pour hearts and rosettas".to_string(),
            instructor: Some("Mira".to_string()),
            location: None,
            schedule: Schedule::new(
                NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
                NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            )
            .unwrap(),
            max_participants: max,
            current_participants: current,
            price: Money::from_minor(2_500).unwrap(),
            status: WorkshopStatus::Published,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn participant(email: &str) -> Participant {
        Participant {
            name: "Ada".to_string(),
            email: Email::parse(email).unwrap(),
            phone: "+44 20 7946 0000".to_string(),
            age: Some(36),
            special_requirements: None,
        }
    }

    fn request(seats: u32) -> RegistrationRequest {
        RegistrationRequest::new(participant("ada@example.com"), seats).unwrap()
    }

    fn number() -> RegistrationNumber {
        RegistrationNumber::new(2026, 12_345).unwrap()
    }

    fn booking(status: BookingStatus) -> Booking {
        let mut booking = decide_registration(&workshop(10, 0), request(2), number(), today(), now())
            .unwrap()
            .booking;
        booking.status = status;
        booking
    }

    #[test]
    fn registration_plan_reserves_requested_seats_and_prices_them() {
        let plan = decide_registration(&workshop(10, 3), request(3), number(), today(), now()).unwrap();
        assert_eq!(plan.seats().get(), 3);
        assert_eq!(plan.booking.total_amount, Money::from_minor(7_500).unwrap());
        assert_eq!(plan.booking.status, BookingStatus::Confirmed);
        assert_eq!(plan.booking.payment_status, PaymentStatus::Pending);
    }

    #[test]
    fn free_workshops_are_paid_up_front() {
        let mut free = workshop(10, 0);
        free.price = Money::ZERO;
        let plan = decide_registration(&free, request(1), number(), today(), now()).unwrap();
        assert_eq!(plan.booking.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn multi_seat_request_crossing_capacity_is_rejected() {
        // 4 + 2 > 5 even though 4 < 5
        let result = decide_registration(&workshop(5, 4), request(2), number(), today(), now());
        assert!(matches!(
            result,
            Err(BookingError::FullyBooked { requested: 2, available: 1 })
        ));
    }

    #[test]
    fn request_filling_capacity_exactly_is_accepted() {
        assert!(decide_registration(&workshop(5, 4), request(1), number(), today(), now()).is_ok());
    }

    #[test]
    fn unpublished_workshops_reject_regardless_of_capacity() {
        for status in [WorkshopStatus::Draft, WorkshopStatus::Cancelled, WorkshopStatus::Completed] {
            let mut w = workshop(10, 0);
            w.status = status;
            assert!(matches!(
                decide_registration(&w, request(1), number(), today(), now()),
                Err(BookingError::NotAvailableForRegistration)
            ));
        }
    }

    #[test]
    fn status_is_checked_before_date_and_capacity() {
        let mut w = workshop(1, 1);
        w.status = WorkshopStatus::Draft;
        w.schedule.date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert!(matches!(
            decide_registration(&w, request(1), number(), today(), now()),
            Err(BookingError::NotAvailableForRegistration)
        ));
    }

    #[test]
    fn past_workshops_reject_but_today_is_open() {
        let mut w = workshop(10, 0);
        w.schedule.date = today().pred_opt().unwrap();
        assert!(matches!(
            decide_registration(&w, request(1), number(), today(), now()),
            Err(BookingError::DatePassed)
        ));

        w.schedule.date = today();
        assert!(decide_registration(&w, request(1), number(), today(), now()).is_ok());
    }

    #[test]
    fn registration_request_collects_participant_and_seat_errors() {
        let mut p = participant("ada@example.com");
        p.phone = "1".to_string();
        let Err(BookingError::Validation(errors)) = RegistrationRequest::new(p, 9) else {
            panic!("expected validation failure");
        };
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["phone", "numberOfSeats"]);
    }

    #[test]
    fn cancellation_releases_booked_seats() {
        let b = booking(BookingStatus::Confirmed);
        let plan = decide_cancellation(&b, &Email::parse("ADA@example.com").unwrap(), Some(" sick ".into()), now())
            .unwrap();
        assert_eq!(plan.release_seats.get(), 2);
        assert_eq!(plan.reason.as_deref(), Some("sick"));
        assert_eq!(plan.cancelled_at, now());
    }

    #[test]
    fn cancellation_with_wrong_email_looks_like_not_found() {
        let b = booking(BookingStatus::Confirmed);
        assert!(matches!(
            decide_cancellation(&b, &Email::parse("eve@example.com").unwrap(), None, now()),
            Err(BookingError::RegistrationNotFound)
        ));
    }

    #[test]
    fn cancelling_twice_is_rejected() {
        let b = booking(BookingStatus::Cancelled);
        assert!(matches!(
            decide_cancellation(&b, &b.participant.email, None, now()),
            Err(BookingError::AlreadyCancelled)
        ));
    }

    #[test]
    fn attended_bookings_cannot_be_cancelled() {
        let b = booking(BookingStatus::Attended);
        assert!(matches!(
            decide_cancellation(&b, &b.participant.email, None, now()),
            Err(BookingError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn publication_requires_draft_and_future_date() {
        let mut w = workshop(10, 0);
        w.status = WorkshopStatus::Draft;
        let plan = decide_publication(&w, today(), now()).unwrap();
        assert_eq!((plan.from, plan.to), (WorkshopStatus::Draft, WorkshopStatus::Published));

        w.schedule.date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert!(matches!(decide_publication(&w, today(), now()), Err(BookingError::DatePassed)));

        let published = workshop(10, 0);
        assert!(matches!(
            decide_publication(&published, today(), now()),
            Err(BookingError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn cancellation_and_completion_follow_the_lifecycle() {
        let mut w = workshop(10, 0);
        assert!(decide_workshop_cancellation(&w, now()).is_ok());
        assert!(decide_completion(&w, now()).is_ok());

        w.status = WorkshopStatus::Completed;
        assert!(decide_workshop_cancellation(&w, now()).is_err());

        w.status = WorkshopStatus::Draft;
        assert!(decide_workshop_cancellation(&w, now()).is_ok());
        assert!(decide_completion(&w, now()).is_err());
    }

    #[test]
    fn update_cannot_shrink_below_reserved_seats() {
        let w = workshop(10, 6);
        let changes = WorkshopChanges {
            max_participants: Some(5),
            ..WorkshopChanges::default()
        };
        assert!(matches!(
            decide_update(&w, changes, now()),
            Err(BookingError::CapacityBelowReserved { requested: 5, reserved: 6 })
        ));

        let changes = WorkshopChanges {
            max_participants: Some(6),
            title: Some("  Advanced Latte Art ".to_string()),
            ..WorkshopChanges::default()
        };
        let update = decide_update(&w, changes, now()).unwrap();
        assert_eq!(update.workshop.max_participants, 6);
        assert_eq!(update.workshop.title, "Advanced Latte Art");
        assert_eq!(update.workshop.current_participants, 6);
    }

    #[test]
    fn partial_schedule_change_keeps_the_other_parts() {
        let w = workshop(10, 0);
        let later = NaiveTime::from_hms_opt(13, 0, 0).unwrap();
        let changes = WorkshopChanges {
            end_time: Some(later),
            ..WorkshopChanges::default()
        };

        let update = decide_update(&w, changes, now()).unwrap();
        assert_eq!(update.workshop.schedule.date, w.schedule.date);
        assert_eq!(update.workshop.schedule.start_time, w.schedule.start_time);
        assert_eq!(update.workshop.schedule.end_time, later);

        let inverted = WorkshopChanges {
            start_time: Some(NaiveTime::from_hms_opt(14, 0, 0).unwrap()),
            ..WorkshopChanges::default()
        };
        assert!(matches!(
            decide_update(&w, inverted, now()),
            Err(BookingError::Validation(_))
        ));
    }

    #[test]
    fn finished_workshops_are_locked() {
        let mut w = workshop(10, 0);
        w.status = WorkshopStatus::Cancelled;
        assert!(matches!(
            decide_update(&w, WorkshopChanges::default(), now()),
            Err(BookingError::WorkshopLocked(WorkshopStatus::Cancelled))
        ));
    }

    #[test]
    fn new_workshop_validates_every_field() {
        let w = workshop(10, 0);
        let draft = WorkshopDraft {
            title: " ".to_string(),
            description: String::new(),
            instructor: None,
            location: None,
            schedule: w.schedule,
            max_participants: 0,
            price: Money::ZERO,
            status: WorkshopStatus::Completed,
        };
        let Err(BookingError::Validation(errors)) = new_workshop(draft, now()) else {
            panic!("expected validation failure");
        };
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["title", "maxParticipants", "status"]);
    }

    #[test]
    fn attendance_only_from_confirmed() {
        let b = booking(BookingStatus::Confirmed);
        let plan = decide_attendance(&b, BookingStatus::NoShow, now()).unwrap();
        assert_eq!(plan.to, BookingStatus::NoShow);

        assert!(matches!(
            decide_attendance(&b, BookingStatus::Cancelled, now()),
            Err(BookingError::Validation(_))
        ));

        let cancelled = booking(BookingStatus::Cancelled);
        assert!(matches!(
            decide_attendance(&cancelled, BookingStatus::Attended, now()),
            Err(BookingError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn refunds_require_a_paid_booking() {
        let b = booking(BookingStatus::Confirmed);
        assert!(decide_payment(&b, PaymentStatus::Refunded, None, now()).is_err());

        let mut paid = b.clone();
        paid.payment_status = PaymentStatus::Paid;
        let change = decide_payment(&paid, PaymentStatus::Refunded, Some("rf_123".into()), now()).unwrap();
        assert_eq!(change.reference.as_deref(), Some("rf_123"));
    }
}
