//! Error types for workshop booking.
//!
//! Two layers:
//!
//! - [`StoreError`]: what a [`crate::store::WorkshopStore`] reports, including the
//!   outcome of its write-time guards (capacity, uniqueness, status)
//! - [`BookingError`]: what a workflow reports to its caller, phrased in domain terms

use crate::types::{BookingStatus, RegistrationNumber, WorkshopId, WorkshopStatus};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A problem with one input field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field name as it appears on the wire
    pub field: String,
    /// Human-readable explanation
    pub message: String,
}

impl FieldError {
    /// Create a field error
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for FieldError {}

/// Errors reported by a workshop store.
///
/// Guard variants mean the write was rejected and nothing was changed.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No workshop with this id
    #[error("Workshop not found: {0}")]
    WorkshopNotFound(WorkshopId),

    /// No booking with this registration number
    #[error("Registration not found: {0}")]
    BookingNotFound(RegistrationNumber),

    /// The workshop is not accepting registrations
    #[error("Workshop is {status}, not published")]
    WorkshopNotOpen {
        /// Status found at write time
        status: WorkshopStatus,
    },

    /// The capacity guard rejected the reservation
    #[error("Capacity exceeded: {requested} seats requested, {available} available")]
    CapacityExceeded {
        /// Seats the plan tried to reserve
        requested: u32,
        /// Seats free at write time
        available: u32,
    },

    /// An active booking already exists for this (workshop, email) pair
    #[error("Participant already holds an active booking for this workshop")]
    DuplicateParticipant,

    /// The registration number is already taken
    #[error("Registration number already in use: {0}")]
    DuplicateRegistrationNumber(RegistrationNumber),

    /// The booking is no longer in a status that allows the change
    #[error("Booking is {actual}, cannot become {attempted}")]
    BookingStatusConflict {
        /// Status found at write time
        actual: BookingStatus,
        /// Status the plan tried to set
        attempted: BookingStatus,
    },

    /// The workshop is no longer in a status that allows the change
    #[error("Workshop is {actual}, cannot become {attempted}")]
    WorkshopStatusConflict {
        /// Status found at write time
        actual: WorkshopStatus,
        /// Status the plan tried to set
        attempted: WorkshopStatus,
    },

    /// The workshop is not editable in its current status
    #[error("Workshop is {0} and can no longer be edited")]
    WorkshopLocked(WorkshopStatus),

    /// Deletion blocked by bookings that still hold seats
    #[error("Workshop has {0} active bookings")]
    ActiveBookings(u64),

    /// New capacity would fall below the seats already reserved
    #[error("Capacity {requested} is below the {reserved} seats already reserved")]
    CapacityBelowReserved {
        /// Requested capacity
        requested: u32,
        /// Seats reserved at write time
        reserved: u32,
    },

    /// Database or connection failure
    #[error("Database error: {0}")]
    Database(String),
}

/// Errors returned by booking workflows.
#[derive(Error, Debug)]
pub enum BookingError {
    /// One or more input fields are invalid
    #[error("Validation failed: {}", join_fields(.0))]
    Validation(Vec<FieldError>),

    /// No workshop with this id
    #[error("Workshop with id {0} not found")]
    WorkshopNotFound(WorkshopId),

    /// Unknown registration number, or the email does not match it
    #[error("Registration not found")]
    RegistrationNotFound,

    /// The workshop is not published
    #[error("Workshop is not available for registration")]
    NotAvailableForRegistration,

    /// The workshop date lies in the past
    #[error("Workshop date has passed")]
    DatePassed,

    /// Not enough seats left for the request
    #[error("Workshop is fully booked: {requested} seats requested, {available} available")]
    FullyBooked {
        /// Seats requested
        requested: u32,
        /// Seats still free
        available: u32,
    },

    /// The participant already holds an active booking for this workshop
    #[error("You have already registered for this workshop")]
    AlreadyRegistered,

    /// The booking was cancelled before
    #[error("Registration is already cancelled")]
    AlreadyCancelled,

    /// The lifecycle does not allow the requested change
    #[error("Cannot change {entity} from {from} to {to}")]
    InvalidTransition {
        /// `workshop` or `registration`
        entity: &'static str,
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },

    /// Cancelled or completed workshops are read-only
    #[error("Workshop is {0} and can no longer be edited")]
    WorkshopLocked(WorkshopStatus),

    /// Deletion blocked by active bookings
    #[error("Workshop has {0} active registrations; cancel them before deleting")]
    HasActiveRegistrations(u64),

    /// Capacity cannot drop below reserved seats
    #[error("Capacity {requested} is below the {reserved} seats already reserved")]
    CapacityBelowReserved {
        /// Requested capacity
        requested: u32,
        /// Seats already reserved
        reserved: u32,
    },

    /// Unexpected storage failure
    #[error("Storage error: {0}")]
    Storage(#[source] StoreError),
}

impl BookingError {
    /// Shorthand for a single-field validation error
    #[must_use]
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }
}

impl From<FieldError> for BookingError {
    fn from(error: FieldError) -> Self {
        Self::Validation(vec![error])
    }
}

impl From<StoreError> for BookingError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::WorkshopNotFound(id) => Self::WorkshopNotFound(id),
            StoreError::BookingNotFound(_) => Self::RegistrationNotFound,
            StoreError::WorkshopNotOpen { .. } => Self::NotAvailableForRegistration,
            StoreError::CapacityExceeded {
                requested,
                available,
            } => Self::FullyBooked {
                requested,
                available,
            },
            StoreError::DuplicateParticipant => Self::AlreadyRegistered,
            StoreError::BookingStatusConflict {
                actual: BookingStatus::Cancelled,
                attempted: BookingStatus::Cancelled,
            } => Self::AlreadyCancelled,
            StoreError::BookingStatusConflict { actual, attempted } => Self::InvalidTransition {
                entity: "registration",
                from: actual.to_string(),
                to: attempted.to_string(),
            },
            StoreError::WorkshopStatusConflict { actual, attempted } => Self::InvalidTransition {
                entity: "workshop",
                from: actual.to_string(),
                to: attempted.to_string(),
            },
            StoreError::WorkshopLocked(status) => Self::WorkshopLocked(status),
            StoreError::ActiveBookings(count) => Self::HasActiveRegistrations(count),
            StoreError::CapacityBelowReserved {
                requested,
                reserved,
            } => Self::CapacityBelowReserved {
                requested,
                reserved,
            },
            other @ (StoreError::DuplicateRegistrationNumber(_) | StoreError::Database(_)) => {
                Self::Storage(other)
            }
        }
    }
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
