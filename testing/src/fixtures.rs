//! Fixtures for workshops, participants and services.
//!
//! Dates are relative to [`test_clock`](crate::test_clock) (2026-03-01), so
//! "upcoming" fixtures stay upcoming no matter when the tests run.

#![allow(clippy::unwrap_used)] // Fixture literals are valid by construction
#![allow(clippy::missing_panics_doc)]

use crate::mocks::{SequentialRegistrationNumbers, test_clock};
use crate::store::InMemoryWorkshopStore;
use atelier_core::{
    BookingEnvironment, BookingService, Clock, Email, Money, Participant, RegistrationRequest,
    Schedule, WorkshopDraft, WorkshopStatus,
};
use chrono::{Days, NaiveDate, NaiveTime};
use std::sync::Arc;

/// Today according to the test clock
#[must_use]
pub fn today() -> NaiveDate {
    test_clock().today()
}

/// 10:00–12:00 on `date`
#[must_use]
pub fn morning_of(date: NaiveDate) -> Schedule {
    Schedule::new(
        date,
        NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
    )
    .unwrap()
}

/// A morning two weeks after the test clock's today
#[must_use]
pub fn upcoming_schedule() -> Schedule {
    morning_of(today().checked_add_days(Days::new(14)).unwrap())
}

/// A morning a week before the test clock's today
#[must_use]
pub fn past_schedule() -> Schedule {
    morning_of(today().checked_sub_days(Days::new(7)).unwrap())
}

/// An upcoming latte-art workshop draft at 25.00 per seat
#[must_use]
pub fn draft(capacity: u32) -> WorkshopDraft {
    WorkshopDraft {
        title: "Latte Art Basics".to_string(),
        description: "Steam milk and pour your first rosetta".to_string(),
        instructor: Some("Mira Okafor".to_string()),
        location: Some("Back room".to_string()),
        schedule: upcoming_schedule(),
        max_participants: capacity,
        price: Money::from_minor(2_500).unwrap(),
        status: WorkshopStatus::Draft,
    }
}

/// Same as [`draft`], already published
#[must_use]
pub fn published_draft(capacity: u32) -> WorkshopDraft {
    WorkshopDraft {
        status: WorkshopStatus::Published,
        ..draft(capacity)
    }
}

/// A valid participant with the given email
#[must_use]
pub fn participant(email: &str) -> Participant {
    let local = email.split('@').next().unwrap_or("guest");
    Participant {
        name: format!("Guest {local}"),
        email: Email::parse(email).unwrap(),
        phone: "+1 555 010 2030".to_string(),
        age: Some(30),
        special_requirements: None,
    }
}

/// A valid registration request for `seats` seats
#[must_use]
pub fn registration(email: &str, seats: u32) -> RegistrationRequest {
    RegistrationRequest::new(participant(email), seats).unwrap()
}

/// Parsed email
#[must_use]
pub fn email(address: &str) -> Email {
    Email::parse(address).unwrap()
}

/// Environment over `store` with the test clock and sequential registration numbers
#[must_use]
pub fn environment(store: &InMemoryWorkshopStore) -> BookingEnvironment {
    BookingEnvironment::new(Arc::new(store.clone()))
        .with_clock(Arc::new(test_clock()))
        .with_registration_numbers(Arc::new(SequentialRegistrationNumbers::new()))
}

/// A booking service over a fresh in-memory store
#[must_use]
pub fn service() -> (BookingService, InMemoryWorkshopStore) {
    let store = InMemoryWorkshopStore::new();
    (BookingService::new(environment(&store)), store)
}
