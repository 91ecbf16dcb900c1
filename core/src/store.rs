//! Persistence seam for workshops and bookings.
//!
//! A [`WorkshopStore`] applies the plans produced by [`crate::decision`]. Every
//! method that writes more than one row must do so atomically, and every plan carries
//! a guard the store re-checks at write time:
//!
//! | Method                  | Guard checked at write time                         |
//! |-------------------------|-----------------------------------------------------|
//! | `commit_registration`   | workshop published, `current + seats <= max`, no active booking for the email |
//! | `commit_cancellation`   | booking still `confirmed`                           |
//! | `cancel_workshop`       | workshop status unchanged since the decision        |
//! | `transition_workshop`   | workshop status unchanged since the decision        |
//! | `update_workshop`       | workshop editable, new capacity `>= current`        |
//! | `delete_workshop`       | no non-cancelled booking references the workshop    |
//! | `record_attendance`     | booking status unchanged since the decision         |
//!
//! A failed guard returns the matching [`StoreError`] and leaves state untouched.
//!
//! The trait returns explicit `Pin<Box<dyn Future>>` values so it stays
//! dyn-compatible and can sit behind `Arc<dyn WorkshopStore>`.

use crate::decision::{
    BookingTransition, CancellationPlan, PaymentChange, RegistrationPlan, StatusTransition,
    WorkshopUpdate,
};
use crate::error::StoreError;
use crate::types::{Booking, BookingStatus, Email, RegistrationNumber, Workshop, WorkshopId, WorkshopStatus};
use chrono::NaiveDate;
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by [`WorkshopStore`] methods
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Filter for workshop listings
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkshopFilter {
    /// Only workshops in this status
    pub status: Option<WorkshopStatus>,
    /// Only workshops dated on or after this day
    pub from_date: Option<NaiveDate>,
}

impl WorkshopFilter {
    /// Published workshops that have not yet taken place
    #[must_use]
    pub const fn upcoming(today: NaiveDate) -> Self {
        Self {
            status: Some(WorkshopStatus::Published),
            from_date: Some(today),
        }
    }

    /// Whether `workshop` passes the filter
    #[must_use]
    pub fn matches(&self, workshop: &Workshop) -> bool {
        self.status.is_none_or(|s| workshop.status == s)
            && self.from_date.is_none_or(|d| workshop.schedule.date >= d)
    }
}

/// Filter for booking listings
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BookingFilter {
    /// Only bookings for this workshop
    pub workshop_id: Option<WorkshopId>,
    /// Only bookings in this status
    pub status: Option<BookingStatus>,
    /// Only bookings by this participant
    pub email: Option<Email>,
}

impl BookingFilter {
    /// Whether `booking` passes the filter
    #[must_use]
    pub fn matches(&self, booking: &Booking) -> bool {
        self.workshop_id.is_none_or(|id| booking.workshop_id == id)
            && self.status.is_none_or(|s| booking.status == s)
            && self.email.as_ref().is_none_or(|e| booking.belongs_to(e))
    }
}

/// Zero-indexed page request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    /// Page index, starting at 0
    pub page: u32,
    /// Items per page, `1..=MAX_PAGE_SIZE`
    pub page_size: u32,
}

impl PageRequest {
    /// Page size when none is given
    pub const DEFAULT_PAGE_SIZE: u32 = 20;
    /// Largest allowed page size
    pub const MAX_PAGE_SIZE: u32 = 100;

    /// Build a page request, clamping the size into `1..=100`
    #[must_use]
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(0),
            page_size: page_size
                .unwrap_or(Self::DEFAULT_PAGE_SIZE)
                .clamp(1, Self::MAX_PAGE_SIZE),
        }
    }

    /// Number of items to skip
    #[must_use]
    pub fn offset(self) -> u64 {
        u64::from(self.page) * u64::from(self.page_size)
    }

    /// Number of items to return
    #[must_use]
    pub fn limit(self) -> u64 {
        u64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Items across all pages
    pub total: u64,
    /// Page index
    pub page: u32,
    /// Requested page size
    pub page_size: u32,
}

impl<T> Page<T> {
    /// Number of pages needed for `total` items
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.page_size.max(1)))
    }

    /// Transform the items, keeping the paging data
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// State after a committed cancellation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CancellationOutcome {
    /// The cancelled booking
    pub booking: Booking,
    /// The workshop with its seats released
    pub workshop: Workshop,
}

/// State after a committed workshop cancellation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkshopCancellation {
    /// The cancelled workshop (seat counter unchanged)
    pub workshop: Workshop,
    /// Bookings moved to `cancelled` by the cascade
    pub bookings_cancelled: u64,
}

/// Storage for workshops and their bookings.
pub trait WorkshopStore: Send + Sync {
    /// Check connectivity.
    ///
    /// # Errors
    ///
    /// [`StoreError::Database`] if the backend is unreachable.
    fn ping(&self) -> StoreFuture<'_, ()>;

    /// Insert a new workshop.
    ///
    /// # Errors
    ///
    /// [`StoreError::Database`] on failure.
    fn insert_workshop(&self, workshop: Workshop) -> StoreFuture<'_, Workshop>;

    /// Load a workshop.
    ///
    /// # Errors
    ///
    /// [`StoreError::WorkshopNotFound`] if absent.
    fn load_workshop(&self, id: WorkshopId) -> StoreFuture<'_, Workshop>;

    /// List workshops matching `filter`, ordered by date then start time.
    ///
    /// # Errors
    ///
    /// [`StoreError::Database`] on failure.
    fn list_workshops(&self, filter: WorkshopFilter) -> StoreFuture<'_, Vec<Workshop>>;

    /// Write edited workshop details.
    ///
    /// # Errors
    ///
    /// [`StoreError::WorkshopLocked`] or [`StoreError::CapacityBelowReserved`] if the
    /// guard fails, [`StoreError::WorkshopNotFound`] if absent.
    fn update_workshop(&self, update: WorkshopUpdate) -> StoreFuture<'_, Workshop>;

    /// Apply a guarded status change without touching bookings.
    ///
    /// # Errors
    ///
    /// [`StoreError::WorkshopStatusConflict`] if the status moved since the decision.
    fn transition_workshop(&self, transition: StatusTransition) -> StoreFuture<'_, Workshop>;

    /// Insert the planned booking and reserve its seats in one atomic unit.
    ///
    /// # Errors
    ///
    /// - [`StoreError::WorkshopNotOpen`] if the workshop is no longer published
    /// - [`StoreError::CapacityExceeded`] if the seats no longer fit
    /// - [`StoreError::DuplicateParticipant`] for a second active booking by the same email
    /// - [`StoreError::DuplicateRegistrationNumber`] if the number is taken
    fn commit_registration(&self, plan: RegistrationPlan) -> StoreFuture<'_, Booking>;

    /// Mark the booking cancelled and release its seats in one atomic unit.
    ///
    /// # Errors
    ///
    /// [`StoreError::BookingStatusConflict`] if the booking is no longer confirmed.
    fn commit_cancellation(&self, plan: CancellationPlan) -> StoreFuture<'_, CancellationOutcome>;

    /// Cancel the workshop and every non-cancelled booking in one atomic unit.
    ///
    /// The seat counter is left as it was.
    ///
    /// # Errors
    ///
    /// [`StoreError::WorkshopStatusConflict`] if the status moved since the decision.
    fn cancel_workshop(&self, transition: StatusTransition) -> StoreFuture<'_, WorkshopCancellation>;

    /// Delete a workshop that has no non-cancelled bookings.
    ///
    /// # Errors
    ///
    /// [`StoreError::ActiveBookings`] if any booking still counts.
    fn delete_workshop(&self, id: WorkshopId) -> StoreFuture<'_, ()>;

    /// Delete a workshop and all its bookings unconditionally.
    ///
    /// Returns the number of bookings removed.
    ///
    /// # Errors
    ///
    /// [`StoreError::WorkshopNotFound`] if absent.
    fn purge_workshop(&self, id: WorkshopId) -> StoreFuture<'_, u64>;

    /// Load a booking by registration number.
    ///
    /// # Errors
    ///
    /// [`StoreError::BookingNotFound`] if absent.
    fn load_booking(&self, number: RegistrationNumber) -> StoreFuture<'_, Booking>;

    /// List bookings matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// [`StoreError::Database`] on failure.
    fn list_bookings(&self, filter: BookingFilter, page: PageRequest) -> StoreFuture<'_, Page<Booking>>;

    /// Apply a guarded attendance change.
    ///
    /// # Errors
    ///
    /// [`StoreError::BookingStatusConflict`] if the status moved since the decision.
    fn record_attendance(&self, transition: BookingTransition) -> StoreFuture<'_, Booking>;

    /// Record a payment outcome.
    ///
    /// # Errors
    ///
    /// [`StoreError::BookingNotFound`] if absent.
    fn record_payment(&self, change: PaymentChange) -> StoreFuture<'_, Booking>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_clamps_size() {
        assert_eq!(PageRequest::new(None, None).page_size, 20);
        assert_eq!(PageRequest::new(Some(2), Some(500)).page_size, 100);
        assert_eq!(PageRequest::new(None, Some(0)).page_size, 1);
        assert_eq!(PageRequest::new(Some(3), Some(10)).offset(), 30);
    }

    #[test]
    fn page_counts_pages() {
        let page = Page {
            items: vec![1, 2],
            total: 41,
            page: 0,
            page_size: 20,
        };
        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.map(|n| n * 10).items, vec![10, 20]);
    }
}
