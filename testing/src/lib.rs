//! # Atelier Testing
//!
//! Test doubles and fixtures for the booking workflows.
//!
//! This crate provides:
//! - Deterministic implementations of the environment traits ([`mocks`])
//! - [`InMemoryWorkshopStore`], an atomic in-memory [`WorkshopStore`] with failure injection
//! - Fixtures for workshops, participants and a ready-made [`BookingService`] ([`fixtures`])
//!
//! ## Example
//!
//! ```
//! use atelier_testing::fixtures;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let (service, store) = fixtures::service();
//! let workshop = service
//!     .create_workshop(fixtures::published_draft(2))
//!     .await
//!     .unwrap();
//!
//! service
//!     .register(workshop.id, fixtures::registration("ada@example.com", 2))
//!     .await
//!     .unwrap();
//!
//! assert_eq!(store.workshop(workshop.id).unwrap().current_participants, 2);
//! # }
//! ```
//!
//! [`WorkshopStore`]: atelier_core::WorkshopStore
//! [`BookingService`]: atelier_core::BookingService

pub mod fixtures;
mod store;

pub use store::InMemoryWorkshopStore;

/// Deterministic implementations of the environment traits.
pub mod mocks {
    use atelier_core::{Clock, RegistrationNumber, RegistrationNumberGenerator};
    use chrono::{DateTime, Utc};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use atelier_testing::mocks::FixedClock;
    /// use atelier_core::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2026-03-01 09:00:00 UTC)
    ///
    /// # Panics
    ///
    /// Never in practice: the timestamp is a valid literal.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2026-03-01T09:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Registration numbers `WS-<year>-10000`, `-10001`, ...
    #[derive(Debug)]
    pub struct SequentialRegistrationNumbers {
        next: AtomicU32,
    }

    impl SequentialRegistrationNumbers {
        /// Start at the smallest serial
        #[must_use]
        pub const fn new() -> Self {
            Self::starting_at(RegistrationNumber::MIN_SERIAL)
        }

        /// Start at `serial`
        #[must_use]
        pub const fn starting_at(serial: u32) -> Self {
            Self {
                next: AtomicU32::new(serial),
            }
        }
    }

    impl Default for SequentialRegistrationNumbers {
        fn default() -> Self {
            Self::new()
        }
    }

    impl RegistrationNumberGenerator for SequentialRegistrationNumbers {
        fn next(&self, year: i32) -> RegistrationNumber {
            let serial = self.next.fetch_add(1, Ordering::SeqCst);
            RegistrationNumber::clamped(year, serial)
        }
    }

    /// Hands out a scripted list of serials, then continues sequentially.
    ///
    /// Useful for forcing registration number collisions.
    #[derive(Debug)]
    pub struct ScriptedRegistrationNumbers {
        script: Mutex<VecDeque<u32>>,
        fallback: SequentialRegistrationNumbers,
    }

    impl ScriptedRegistrationNumbers {
        /// Yield `serials` in order, then `fallback_start`, `fallback_start + 1`, ...
        #[must_use]
        pub fn new(serials: impl IntoIterator<Item = u32>, fallback_start: u32) -> Self {
            Self {
                script: Mutex::new(serials.into_iter().collect()),
                fallback: SequentialRegistrationNumbers::starting_at(fallback_start),
            }
        }
    }

    impl RegistrationNumberGenerator for ScriptedRegistrationNumbers {
        fn next(&self, year: i32) -> RegistrationNumber {
            let scripted = self
                .script
                .lock()
                .ok()
                .and_then(|mut script| script.pop_front());
            match scripted {
                Some(serial) => RegistrationNumber::clamped(year, serial),
                None => self.fallback.next(year),
            }
        }
    }
}

/// Install a test-friendly tracing subscriber (idempotent).
///
/// Honors `RUST_LOG`; output goes through the test harness capture.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{FixedClock, ScriptedRegistrationNumbers, SequentialRegistrationNumbers, test_clock};

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::{Clock, RegistrationNumberGenerator};

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.today().to_string(), "2026-03-01");
    }

    #[test]
    fn sequential_numbers_count_up() {
        let numbers = SequentialRegistrationNumbers::new();
        assert_eq!(numbers.next(2026).as_str(), "WS-2026-10000");
        assert_eq!(numbers.next(2026).as_str(), "WS-2026-10001");
    }

    #[test]
    fn scripted_numbers_fall_back_to_sequence() {
        let numbers = ScriptedRegistrationNumbers::new([20_000, 20_000], 30_000);
        assert_eq!(numbers.next(2026).as_str(), "WS-2026-20000");
        assert_eq!(numbers.next(2026).as_str(), "WS-2026-20000");
        assert_eq!(numbers.next(2026).as_str(), "WS-2026-30000");
    }
}
