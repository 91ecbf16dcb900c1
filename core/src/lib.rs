//! # Atelier Core
//!
//! Workshop booking and seat inventory for the Atelier café platform.
//!
//! The crate follows a "functional core, imperative shell" split:
//!
//! - **Types** ([`types`]): workshops, bookings, and the value objects they are built from
//! - **Decisions** ([`decision`]): pure functions that validate a request against a
//!   snapshot and return a *plan* describing the exact writes to perform
//! - **Store** ([`store`]): the persistence seam; a store applies a plan atomically
//! - **Service** ([`service`]): the workflows that load, decide and commit
//! - **Environment** ([`environment`]): injected clock and registration-number source
//!
//! ## Seat accounting
//!
//! `Workshop::current_participants` mirrors the sum of seats held by active bookings.
//! It only changes through two plans:
//!
//! ```text
//! RegistrationPlan  ──► current += seats   (only if current + seats <= max)
//! CancellationPlan  ──► current -= seats   (floored at 0)
//! ```
//!
//! Both the capacity guard and the booking write happen in one atomic unit inside the
//! store, so concurrent registrations for the last seats cannot oversell a workshop.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod decision;
pub mod environment;
pub mod error;
pub mod service;
pub mod store;
pub mod types;

pub use decision::{
    BookingTransition, CancellationPlan, PaymentChange, RegistrationPlan, RegistrationRequest,
    StatusTransition, WorkshopUpdate,
};
pub use environment::{Clock, RandomRegistrationNumbers, RegistrationNumberGenerator, SystemClock};
pub use error::{BookingError, FieldError, StoreError};
pub use service::{
    BookingEnvironment, BookingService, CancellationReceipt, RegistrationConfirmation,
    MAX_REGISTRATION_NUMBER_ATTEMPTS,
};
pub use store::{
    BookingFilter, CancellationOutcome, Page, PageRequest, StoreFuture, WorkshopCancellation,
    WorkshopFilter, WorkshopStore,
};
pub use types::*;
