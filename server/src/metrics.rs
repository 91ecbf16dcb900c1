//! Business metrics for workshop booking.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `atelier_registrations_total{outcome}` - Registration attempts by outcome
//! - `atelier_seats_reserved_total` - Seats reserved by confirmed registrations
//! - `atelier_seats_released_total` - Seats released by participant cancellations
//! - `atelier_workshops_cancelled_total` - Workshops cancelled (with cascade)
//! - `atelier_workshops_deleted_total{mode}` - Workshops deleted, `guarded` or `force`

use atelier_core::BookingError;
use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Register metric descriptions. Call once at startup, after installing the exporter.
pub fn register_business_metrics() {
    describe_counter!(
        "atelier_registrations_total",
        "Registration attempts by outcome (confirmed, fully_booked, duplicate, closed, invalid, error)"
    );
    describe_counter!(
        "atelier_seats_reserved_total",
        "Seats reserved by confirmed registrations"
    );
    describe_counter!(
        "atelier_seats_released_total",
        "Seats released by participant cancellations"
    );
    describe_counter!(
        "atelier_workshops_cancelled_total",
        "Workshops cancelled together with their bookings"
    );
    describe_counter!(
        "atelier_workshops_deleted_total",
        "Workshops deleted, by mode (guarded, force)"
    );

    tracing::info!("Business metrics registered");
}

/// Install the Prometheus recorder and serve `/metrics` on `addr`.
///
/// Must run inside a Tokio runtime.
///
/// # Errors
///
/// Returns the exporter's error if the listener or recorder cannot be installed.
pub fn install_exporter(addr: SocketAddr) -> Result<(), metrics_exporter_prometheus::BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(%addr, "Metrics exporter listening");
    Ok(())
}

/// Label for a failed registration
#[must_use]
pub const fn registration_outcome(error: &BookingError) -> &'static str {
    match error {
        BookingError::FullyBooked { .. } => "fully_booked",
        BookingError::AlreadyRegistered => "duplicate",
        BookingError::NotAvailableForRegistration
        | BookingError::DatePassed
        | BookingError::WorkshopNotFound(_) => "closed",
        BookingError::Validation(_) => "invalid",
        _ => "error",
    }
}

/// Record a confirmed registration.
pub fn record_registration_confirmed(seats: u32) {
    metrics::counter!("atelier_registrations_total", "outcome" => "confirmed").increment(1);
    metrics::counter!("atelier_seats_reserved_total").increment(u64::from(seats));
}

/// Record a rejected or failed registration.
pub fn record_registration_failed(error: &BookingError) {
    let outcome = registration_outcome(error);
    metrics::counter!("atelier_registrations_total", "outcome" => outcome).increment(1);
    tracing::debug!(outcome, "Recorded registration failure metric");
}

/// Record a participant cancellation.
pub fn record_seats_released(seats: u32) {
    metrics::counter!("atelier_seats_released_total").increment(u64::from(seats));
}

/// Record a workshop cancellation.
pub fn record_workshop_cancelled(bookings_cancelled: u64) {
    metrics::counter!("atelier_workshops_cancelled_total").increment(1);
    tracing::debug!(bookings_cancelled, "Recorded workshop cancellation metric");
}

/// Record a workshop deletion; `mode` is `guarded` or `force`.
pub fn record_workshop_deleted(mode: &'static str) {
    metrics::counter!("atelier_workshops_deleted_total", "mode" => mode).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_labels() {
        assert_eq!(
            registration_outcome(&BookingError::FullyBooked {
                requested: 2,
                available: 1
            }),
            "fully_booked"
        );
        assert_eq!(registration_outcome(&BookingError::AlreadyRegistered), "duplicate");
        assert_eq!(registration_outcome(&BookingError::DatePassed), "closed");
        assert_eq!(registration_outcome(&BookingError::Validation(vec![])), "invalid");
        assert_eq!(registration_outcome(&BookingError::AlreadyCancelled), "error");
    }

    #[test]
    fn recording_without_a_recorder_is_a_no_op() {
        register_business_metrics();
        record_registration_confirmed(2);
        record_registration_failed(&BookingError::AlreadyRegistered);
        record_seats_released(2);
        record_workshop_cancelled(4);
        record_workshop_deleted("force");
    }
}
