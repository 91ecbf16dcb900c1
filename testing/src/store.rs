//! In-memory workshop store.
//!
//! Every operation holds the write lock for its whole duration and works on a copy
//! of the state that is swapped in only on success, so each call is atomic in the
//! same way a database transaction is.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Lock poisoning only follows a panicking test

use atelier_core::{
    Booking, BookingFilter, BookingStatus, BookingTransition, CancellationOutcome,
    CancellationPlan, Page, PageRequest, PaymentChange, RegistrationNumber, RegistrationPlan,
    StatusTransition, StoreError, StoreFuture, Workshop, WorkshopCancellation, WorkshopFilter,
    WorkshopId, WorkshopStatus, WorkshopStore, WorkshopUpdate,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

#[derive(Clone, Debug, Default)]
struct State {
    workshops: HashMap<WorkshopId, Workshop>,
    /// Insertion order
    bookings: Vec<Booking>,
}

impl State {
    fn workshop_mut(&mut self, id: WorkshopId) -> Result<&mut Workshop, StoreError> {
        self.workshops
            .get_mut(&id)
            .ok_or(StoreError::WorkshopNotFound(id))
    }

    fn booking_mut(&mut self, number: &RegistrationNumber) -> Result<&mut Booking, StoreError> {
        self.bookings
            .iter_mut()
            .find(|b| &b.registration_number == number)
            .ok_or_else(|| StoreError::BookingNotFound(number.clone()))
    }
}

/// In-memory [`WorkshopStore`] for fast, deterministic tests.
///
/// Clones share state. Beyond the trait, it offers inspection helpers and failure
/// injection:
///
/// - [`fail_next_cascade`](Self::fail_next_cascade) makes the next workshop
///   cancellation fail after it has already changed some rows
/// - [`set_unavailable`](Self::set_unavailable) makes every call fail like a lost
///   database connection
#[derive(Clone, Debug, Default)]
pub struct InMemoryWorkshopStore {
    state: Arc<RwLock<State>>,
    fail_cascade: Arc<AtomicBool>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryWorkshopStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a workshop as-is, bypassing all checks.
    ///
    /// Lets tests start from states the workflows would never produce.
    pub fn seed_workshop(&self, workshop: Workshop) {
        self.state
            .write()
            .unwrap()
            .workshops
            .insert(workshop.id, workshop);
    }

    /// Insert a booking as-is, bypassing all checks
    pub fn seed_booking(&self, booking: Booking) {
        self.state.write().unwrap().bookings.push(booking);
    }

    /// Current snapshot of a workshop
    #[must_use]
    pub fn workshop(&self, id: WorkshopId) -> Option<Workshop> {
        self.state.read().unwrap().workshops.get(&id).cloned()
    }

    /// All bookings for a workshop, in insertion order
    #[must_use]
    pub fn bookings_for(&self, id: WorkshopId) -> Vec<Booking> {
        self.state
            .read()
            .unwrap()
            .bookings
            .iter()
            .filter(|b| b.workshop_id == id)
            .cloned()
            .collect()
    }

    /// Sum of seats held by confirmed bookings of a workshop
    #[must_use]
    pub fn active_seats(&self, id: WorkshopId) -> u32 {
        self.bookings_for(id)
            .iter()
            .filter(|b| b.status.holds_seats())
            .map(|b| b.number_of_seats.get())
            .sum()
    }

    /// Make the next [`WorkshopStore::cancel_workshop`] fail midway
    pub fn fail_next_cascade(&self) {
        self.fail_cascade.store(true, Ordering::SeqCst);
    }

    /// Simulate losing (or regaining) the backend
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Database("connection refused".to_string()));
        }
        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(&State) -> Result<T, StoreError>) -> Result<T, StoreError> {
        self.check_available()?;
        f(&self.state.read().unwrap())
    }

    /// Run `f` on a copy of the state; keep the copy only if `f` succeeds.
    fn transact<T>(
        &self,
        f: impl FnOnce(&mut State) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        self.check_available()?;
        let mut guard = self.state.write().unwrap();
        let mut working = guard.clone();
        let result = f(&mut working)?;
        *guard = working;
        Ok(result)
    }

    fn ready<T: Send + 'static>(result: Result<T, StoreError>) -> StoreFuture<'static, T> {
        Box::pin(std::future::ready(result))
    }
}

impl WorkshopStore for InMemoryWorkshopStore {
    fn ping(&self) -> StoreFuture<'_, ()> {
        Self::ready(self.check_available())
    }

    fn insert_workshop(&self, workshop: Workshop) -> StoreFuture<'_, Workshop> {
        Self::ready(self.transact(|state| {
            state.workshops.insert(workshop.id, workshop.clone());
            Ok(workshop)
        }))
    }

    fn load_workshop(&self, id: WorkshopId) -> StoreFuture<'_, Workshop> {
        Self::ready(self.read(|state| {
            state
                .workshops
                .get(&id)
                .cloned()
                .ok_or(StoreError::WorkshopNotFound(id))
        }))
    }

    fn list_workshops(&self, filter: WorkshopFilter) -> StoreFuture<'_, Vec<Workshop>> {
        Self::ready(self.read(|state| {
            let mut workshops: Vec<_> = state
                .workshops
                .values()
                .filter(|w| filter.matches(w))
                .cloned()
                .collect();
            workshops.sort_by_key(|w| (w.schedule.date, w.schedule.start_time, w.created_at));
            Ok(workshops)
        }))
    }

    fn update_workshop(&self, update: WorkshopUpdate) -> StoreFuture<'_, Workshop> {
        Self::ready(self.transact(|state| {
            let new = update.workshop;
            let workshop = state.workshop_mut(new.id)?;
            if matches!(workshop.status, WorkshopStatus::Cancelled | WorkshopStatus::Completed) {
                return Err(StoreError::WorkshopLocked(workshop.status));
            }
            if new.max_participants < workshop.current_participants {
                return Err(StoreError::CapacityBelowReserved {
                    requested: new.max_participants,
                    reserved: workshop.current_participants,
                });
            }
            workshop.title = new.title;
            workshop.description = new.description;
            workshop.instructor = new.instructor;
            workshop.location = new.location;
            workshop.schedule = new.schedule;
            workshop.max_participants = new.max_participants;
            workshop.price = new.price;
            workshop.updated_at = new.updated_at;
            Ok(workshop.clone())
        }))
    }

    fn transition_workshop(&self, transition: StatusTransition) -> StoreFuture<'_, Workshop> {
        Self::ready(self.transact(|state| {
            let workshop = state.workshop_mut(transition.workshop_id)?;
            if workshop.status != transition.from {
                return Err(StoreError::WorkshopStatusConflict {
                    actual: workshop.status,
                    attempted: transition.to,
                });
            }
            workshop.status = transition.to;
            workshop.updated_at = transition.at;
            Ok(workshop.clone())
        }))
    }

    fn commit_registration(&self, plan: RegistrationPlan) -> StoreFuture<'_, Booking> {
        Self::ready(self.transact(|state| {
            let booking = plan.booking;
            let seats = booking.number_of_seats;

            // Conditional increment first, then the insert with its unique checks.
            let workshop = state.workshop_mut(booking.workshop_id)?;
            if workshop.status != WorkshopStatus::Published {
                return Err(StoreError::WorkshopNotOpen {
                    status: workshop.status,
                });
            }
            if !workshop.can_seat(seats) {
                return Err(StoreError::CapacityExceeded {
                    requested: seats.get(),
                    available: workshop.available_seats(),
                });
            }
            workshop.current_participants += seats.get();
            workshop.updated_at = booking.created_at;

            let duplicate = |b: &Booking| {
                b.workshop_id == booking.workshop_id
                    && b.status != BookingStatus::Cancelled
                    && b.participant.email == booking.participant.email
            };
            if state.bookings.iter().any(duplicate) {
                return Err(StoreError::DuplicateParticipant);
            }
            if state
                .bookings
                .iter()
                .any(|b| b.registration_number == booking.registration_number)
            {
                return Err(StoreError::DuplicateRegistrationNumber(
                    booking.registration_number,
                ));
            }

            tracing::debug!(
                workshop_id = %booking.workshop_id,
                seats = seats.get(),
                "Seats reserved"
            );
            state.bookings.push(booking.clone());
            Ok(booking)
        }))
    }

    fn commit_cancellation(&self, plan: CancellationPlan) -> StoreFuture<'_, CancellationOutcome> {
        Self::ready(self.transact(|state| {
            let booking = state.booking_mut(&plan.registration_number)?;
            if booking.status != BookingStatus::Confirmed {
                return Err(StoreError::BookingStatusConflict {
                    actual: booking.status,
                    attempted: BookingStatus::Cancelled,
                });
            }
            booking.status = BookingStatus::Cancelled;
            booking.cancelled_at = Some(plan.cancelled_at);
            booking.cancellation_reason = plan.reason;
            booking.updated_at = plan.cancelled_at;
            let booking = booking.clone();

            let workshop = state.workshop_mut(plan.workshop_id)?;
            workshop.current_participants = workshop
                .current_participants
                .saturating_sub(plan.release_seats.get());
            workshop.updated_at = plan.cancelled_at;

            Ok(CancellationOutcome {
                booking,
                workshop: workshop.clone(),
            })
        }))
    }

    fn cancel_workshop(&self, transition: StatusTransition) -> StoreFuture<'_, WorkshopCancellation> {
        let fail = self.fail_cascade.swap(false, Ordering::SeqCst);
        Self::ready(self.transact(|state| {
            let workshop = state.workshop_mut(transition.workshop_id)?;
            if workshop.status != transition.from {
                return Err(StoreError::WorkshopStatusConflict {
                    actual: workshop.status,
                    attempted: transition.to,
                });
            }
            workshop.status = WorkshopStatus::Cancelled;
            workshop.updated_at = transition.at;
            let workshop = workshop.clone();

            let mut cancelled = 0;
            for booking in state
                .bookings
                .iter_mut()
                .filter(|b| b.workshop_id == transition.workshop_id)
                .filter(|b| b.status != BookingStatus::Cancelled)
            {
                booking.status = BookingStatus::Cancelled;
                booking.cancelled_at = Some(transition.at);
                booking.updated_at = transition.at;
                cancelled += 1;

                if fail {
                    return Err(StoreError::Database(
                        "injected failure during cascade".to_string(),
                    ));
                }
            }

            Ok(WorkshopCancellation {
                workshop,
                bookings_cancelled: cancelled,
            })
        }))
    }

    fn delete_workshop(&self, id: WorkshopId) -> StoreFuture<'_, ()> {
        Self::ready(self.transact(|state| {
            state.workshop_mut(id)?;
            let active = state
                .bookings
                .iter()
                .filter(|b| b.workshop_id == id && b.status != BookingStatus::Cancelled)
                .count() as u64;
            if active > 0 {
                return Err(StoreError::ActiveBookings(active));
            }
            state.workshops.remove(&id);
            state.bookings.retain(|b| b.workshop_id != id);
            Ok(())
        }))
    }

    fn purge_workshop(&self, id: WorkshopId) -> StoreFuture<'_, u64> {
        Self::ready(self.transact(|state| {
            state.workshop_mut(id)?;
            let before = state.bookings.len();
            state.workshops.remove(&id);
            state.bookings.retain(|b| b.workshop_id != id);
            Ok((before - state.bookings.len()) as u64)
        }))
    }

    fn load_booking(&self, number: RegistrationNumber) -> StoreFuture<'_, Booking> {
        Self::ready(self.read(|state| {
            state
                .bookings
                .iter()
                .find(|b| b.registration_number == number)
                .cloned()
                .ok_or(StoreError::BookingNotFound(number))
        }))
    }

    fn list_bookings(&self, filter: BookingFilter, page: PageRequest) -> StoreFuture<'_, Page<Booking>> {
        Self::ready(self.read(|state| {
            let matching: Vec<_> = state
                .bookings
                .iter()
                .rev()
                .filter(|b| filter.matches(b))
                .collect();
            let total = matching.len() as u64;
            let items = matching
                .into_iter()
                .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
                .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
                .cloned()
                .collect();
            Ok(Page {
                items,
                total,
                page: page.page,
                page_size: page.page_size,
            })
        }))
    }

    fn record_attendance(&self, transition: BookingTransition) -> StoreFuture<'_, Booking> {
        Self::ready(self.transact(|state| {
            let booking = state.booking_mut(&transition.registration_number)?;
            if booking.status != transition.from {
                return Err(StoreError::BookingStatusConflict {
                    actual: booking.status,
                    attempted: transition.to,
                });
            }
            booking.status = transition.to;
            booking.updated_at = transition.at;
            Ok(booking.clone())
        }))
    }

    fn record_payment(&self, change: PaymentChange) -> StoreFuture<'_, Booking> {
        Self::ready(self.transact(|state| {
            let booking = state.booking_mut(&change.registration_number)?;
            booking.payment_status = change.status;
            if change.reference.is_some() {
                booking.payment_reference = change.reference;
            }
            booking.updated_at = change.at;
            Ok(booking.clone())
        }))
    }
}
