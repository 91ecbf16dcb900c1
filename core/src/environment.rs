//! Injected dependencies for booking workflows.
//!
//! Workflows never read the wall clock or a random source directly. Tests swap in
//! a fixed clock and a predictable number sequence.

use crate::types::RegistrationNumber;
use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;

/// Clock trait - abstracts time operations for testability
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;

    /// Today's date in UTC.
    ///
    /// Workshops dated today are still open for registration.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Production clock backed by [`Utc::now`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Source of candidate registration numbers.
///
/// Candidates are not guaranteed unique; the store rejects collisions and the
/// registration workflow asks for another candidate.
pub trait RegistrationNumberGenerator: Send + Sync {
    /// Produce a candidate for a booking made in `year`
    fn next(&self, year: i32) -> RegistrationNumber;
}

/// `WS-<year>-<random 5 digits>`
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomRegistrationNumbers;

impl RegistrationNumberGenerator for RandomRegistrationNumbers {
    fn next(&self, year: i32) -> RegistrationNumber {
        let serial = rand::thread_rng()
            .gen_range(RegistrationNumber::MIN_SERIAL..=RegistrationNumber::MAX_SERIAL);
        RegistrationNumber::clamped(year, serial)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn random_numbers_match_the_format() {
        let generator = RandomRegistrationNumbers;
        for _ in 0..200 {
            let number = generator.next(2026);
            assert!(number.as_str().starts_with("WS-2026-"));
            assert_eq!(number.as_str().len(), "WS-2026-00000".len());
            assert_eq!(RegistrationNumber::parse(number.as_str()).unwrap(), number);
        }
    }

    #[test]
    fn system_clock_today_is_utc_date() {
        let clock = SystemClock;
        let before = Utc::now().date_naive();
        let today = clock.today();
        assert!(today >= before);
    }
}
