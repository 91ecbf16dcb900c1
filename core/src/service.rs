//! Booking workflows.
//!
//! [`BookingService`] is the imperative shell around [`crate::decision`]: each
//! workflow loads a snapshot from the store, asks a decision function for a plan,
//! and hands the plan to the store to commit atomically.

use crate::decision::{
    self, RegistrationRequest, authorize_guest, decide_attendance, decide_cancellation,
    decide_completion, decide_payment, decide_publication, decide_registration, decide_update,
    decide_workshop_cancellation,
};
use crate::environment::{Clock, RandomRegistrationNumbers, RegistrationNumberGenerator, SystemClock};
use crate::error::{BookingError, StoreError};
use crate::store::{
    BookingFilter, Page, PageRequest, WorkshopCancellation, WorkshopFilter, WorkshopStore,
};
use crate::types::{
    Booking, BookingStatus, Email, Money, PaymentStatus, RegistrationNumber, SeatCount, Workshop,
    WorkshopChanges, WorkshopDraft, WorkshopId, WorkshopStatus,
};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;

/// How many registration numbers to try before giving up on a registration
pub const MAX_REGISTRATION_NUMBER_ATTEMPTS: u32 = 5;

/// Dependencies injected into [`BookingService`]
#[derive(Clone)]
pub struct BookingEnvironment {
    /// Time source
    pub clock: Arc<dyn Clock>,
    /// Workshop and booking storage
    pub store: Arc<dyn WorkshopStore>,
    /// Registration number source
    pub registration_numbers: Arc<dyn RegistrationNumberGenerator>,
}

impl BookingEnvironment {
    /// Production environment over `store`: system clock, random registration numbers
    #[must_use]
    pub fn new(store: Arc<dyn WorkshopStore>) -> Self {
        Self {
            clock: Arc::new(SystemClock),
            store,
            registration_numbers: Arc::new(RandomRegistrationNumbers),
        }
    }

    /// Replace the clock
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the registration number source
    #[must_use]
    pub fn with_registration_numbers(
        mut self,
        registration_numbers: Arc<dyn RegistrationNumberGenerator>,
    ) -> Self {
        self.registration_numbers = registration_numbers;
        self
    }
}

impl std::fmt::Debug for BookingEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingEnvironment").finish_non_exhaustive()
    }
}

/// What a participant gets back after registering
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationConfirmation {
    /// Customer-facing booking identifier
    pub registration_number: RegistrationNumber,
    /// Booked workshop
    pub workshop_id: WorkshopId,
    /// Workshop title
    pub workshop: String,
    /// Workshop date
    pub date: NaiveDate,
    /// Seats reserved
    pub number_of_seats: SeatCount,
    /// Amount due
    pub total_amount: Money,
    /// Initial payment status
    pub payment_status: PaymentStatus,
}

/// What a participant gets back after cancelling
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationReceipt {
    /// Cancelled booking
    pub registration_number: RegistrationNumber,
    /// Its workshop
    pub workshop_id: WorkshopId,
    /// Seats given back
    pub seats_released: SeatCount,
    /// Seats still free on the workshop afterwards
    pub available_seats: u32,
    /// When the cancellation was recorded
    pub cancelled_at: DateTime<Utc>,
}

/// Workshop catalog and booking workflows
#[derive(Clone, Debug)]
pub struct BookingService {
    env: BookingEnvironment,
}

impl BookingService {
    /// Create a service over `env`
    #[must_use]
    pub const fn new(env: BookingEnvironment) -> Self {
        Self { env }
    }

    /// The injected environment
    #[must_use]
    pub const fn environment(&self) -> &BookingEnvironment {
        &self.env
    }

    fn store(&self) -> &dyn WorkshopStore {
        self.env.store.as_ref()
    }

    /// Check that storage is reachable.
    ///
    /// # Errors
    ///
    /// [`BookingError::Storage`] if the store cannot be reached.
    pub async fn health(&self) -> Result<(), BookingError> {
        self.store().ping().await.map_err(BookingError::Storage)
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Book seats in a workshop.
    ///
    /// The capacity check in the decision is advisory; the store re-checks
    /// `current + seats <= max` while committing, so two requests racing for the last
    /// seats cannot both succeed. If the generated registration number collides with an
    /// existing one, a new number is drawn (nothing was committed).
    ///
    /// # Errors
    ///
    /// - [`BookingError::WorkshopNotFound`]
    /// - [`BookingError::NotAvailableForRegistration`], [`BookingError::DatePassed`],
    ///   [`BookingError::FullyBooked`], [`BookingError::AlreadyRegistered`]
    /// - [`BookingError::Storage`] after repeated registration number collisions
    #[tracing::instrument(
        skip(self, request),
        fields(workshop_id = %workshop_id, seats = request.seats.get())
    )]
    pub async fn register(
        &self,
        workshop_id: WorkshopId,
        request: RegistrationRequest,
    ) -> Result<RegistrationConfirmation, BookingError> {
        let workshop = self.store().load_workshop(workshop_id).await?;
        let now = self.env.clock.now();
        let year = now.year();

        let mut plan = decide_registration(
            &workshop,
            request,
            self.env.registration_numbers.next(year),
            self.env.clock.today(),
            now,
        )?;

        let mut attempt = 1;
        let booking = loop {
            match self.store().commit_registration(plan.clone()).await {
                Ok(booking) => break booking,
                Err(StoreError::DuplicateRegistrationNumber(number))
                    if attempt < MAX_REGISTRATION_NUMBER_ATTEMPTS =>
                {
                    tracing::warn!(%number, attempt, "Registration number collision, drawing another");
                    attempt += 1;
                    plan = plan.with_registration_number(self.env.registration_numbers.next(year));
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Registration rejected at commit");
                    return Err(e.into());
                }
            }
        };

        tracing::info!(
            registration_number = %booking.registration_number,
            "Registration confirmed"
        );

        Ok(RegistrationConfirmation {
            registration_number: booking.registration_number,
            workshop_id: workshop.id,
            workshop: workshop.title,
            date: workshop.schedule.date,
            number_of_seats: booking.number_of_seats,
            total_amount: booking.total_amount,
            payment_status: booking.payment_status,
        })
    }

    /// Look up a booking on behalf of its participant.
    ///
    /// # Errors
    ///
    /// [`BookingError::RegistrationNotFound`] if the booking is missing or `email`
    /// does not own it.
    #[tracing::instrument(skip(self, email), fields(registration_number = %number))]
    pub async fn find_registration(
        &self,
        number: RegistrationNumber,
        email: &Email,
    ) -> Result<Booking, BookingError> {
        let booking = self.store().load_booking(number).await?;
        authorize_guest(&booking, email)?;
        Ok(booking)
    }

    /// Cancel a booking on behalf of its participant and release its seats.
    ///
    /// # Errors
    ///
    /// - [`BookingError::RegistrationNotFound`] if missing or `email` does not own it
    /// - [`BookingError::AlreadyCancelled`], also when a concurrent cancellation won
    /// - [`BookingError::InvalidTransition`] for attended or no-show bookings
    #[tracing::instrument(skip(self, email, reason), fields(registration_number = %number))]
    pub async fn cancel_registration(
        &self,
        number: RegistrationNumber,
        email: &Email,
        reason: Option<String>,
    ) -> Result<CancellationReceipt, BookingError> {
        let booking = self.store().load_booking(number).await?;
        let plan = decide_cancellation(&booking, email, reason, self.env.clock.now())?;
        let outcome = self.store().commit_cancellation(plan).await?;

        tracing::info!(
            workshop_id = %outcome.workshop.id,
            seats = outcome.booking.number_of_seats.get(),
            "Registration cancelled"
        );

        Ok(CancellationReceipt {
            registration_number: outcome.booking.registration_number,
            workshop_id: outcome.workshop.id,
            seats_released: outcome.booking.number_of_seats,
            available_seats: outcome.workshop.available_seats(),
            cancelled_at: outcome.booking.cancelled_at.unwrap_or_else(|| self.env.clock.now()),
        })
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    /// Fetch a workshop. Drafts and cancelled workshops are hidden from the public.
    ///
    /// # Errors
    ///
    /// [`BookingError::WorkshopNotFound`] if missing or hidden.
    #[tracing::instrument(skip(self))]
    pub async fn get_workshop(
        &self,
        id: WorkshopId,
        include_hidden: bool,
    ) -> Result<Workshop, BookingError> {
        let workshop = self.store().load_workshop(id).await?;
        if !include_hidden && !workshop.status.is_public() {
            return Err(BookingError::WorkshopNotFound(id));
        }
        Ok(workshop)
    }

    /// Published workshops dated today or later, soonest first.
    ///
    /// # Errors
    ///
    /// [`BookingError::Storage`] on storage failure.
    #[tracing::instrument(skip(self))]
    pub async fn list_upcoming(&self) -> Result<Vec<Workshop>, BookingError> {
        let filter = WorkshopFilter::upcoming(self.env.clock.today());
        Ok(self.store().list_workshops(filter).await?)
    }

    /// All workshops, optionally in one status.
    ///
    /// # Errors
    ///
    /// [`BookingError::Storage`] on storage failure.
    #[tracing::instrument(skip(self))]
    pub async fn list_workshops(
        &self,
        status: Option<WorkshopStatus>,
    ) -> Result<Vec<Workshop>, BookingError> {
        let filter = WorkshopFilter {
            status,
            from_date: None,
        };
        Ok(self.store().list_workshops(filter).await?)
    }

    /// Create a workshop.
    ///
    /// # Errors
    ///
    /// [`BookingError::Validation`] for invalid fields.
    #[tracing::instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create_workshop(&self, draft: WorkshopDraft) -> Result<Workshop, BookingError> {
        let workshop = decision::new_workshop(draft, self.env.clock.now())?;
        let workshop = self.store().insert_workshop(workshop).await?;
        tracing::info!(workshop_id = %workshop.id, status = %workshop.status, "Workshop created");
        Ok(workshop)
    }

    /// Edit a workshop's details.
    ///
    /// # Errors
    ///
    /// [`BookingError::Validation`], [`BookingError::WorkshopLocked`] or
    /// [`BookingError::CapacityBelowReserved`].
    #[tracing::instrument(skip(self, changes))]
    pub async fn update_workshop(
        &self,
        id: WorkshopId,
        changes: WorkshopChanges,
    ) -> Result<Workshop, BookingError> {
        let workshop = self.store().load_workshop(id).await?;
        let update = decide_update(&workshop, changes, self.env.clock.now())?;
        Ok(self.store().update_workshop(update).await?)
    }

    /// Open a draft workshop for registration.
    ///
    /// # Errors
    ///
    /// [`BookingError::InvalidTransition`] unless it is a draft,
    /// [`BookingError::DatePassed`] if its date is gone.
    #[tracing::instrument(skip(self))]
    pub async fn publish_workshop(&self, id: WorkshopId) -> Result<Workshop, BookingError> {
        let workshop = self.store().load_workshop(id).await?;
        let transition = decide_publication(&workshop, self.env.clock.today(), self.env.clock.now())?;
        let workshop = self.store().transition_workshop(transition).await?;
        tracing::info!("Workshop published");
        Ok(workshop)
    }

    /// Mark a published workshop as held.
    ///
    /// # Errors
    ///
    /// [`BookingError::InvalidTransition`] unless it is published.
    #[tracing::instrument(skip(self))]
    pub async fn complete_workshop(&self, id: WorkshopId) -> Result<Workshop, BookingError> {
        let workshop = self.store().load_workshop(id).await?;
        let transition = decide_completion(&workshop, self.env.clock.now())?;
        Ok(self.store().transition_workshop(transition).await?)
    }

    /// Cancel a workshop together with all of its bookings.
    ///
    /// # Errors
    ///
    /// [`BookingError::InvalidTransition`] for cancelled or completed workshops.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_workshop(&self, id: WorkshopId) -> Result<WorkshopCancellation, BookingError> {
        let workshop = self.store().load_workshop(id).await?;
        let transition = decide_workshop_cancellation(&workshop, self.env.clock.now())?;
        let outcome = self.store().cancel_workshop(transition).await?;
        tracing::info!(
            bookings_cancelled = outcome.bookings_cancelled,
            "Workshop cancelled"
        );
        Ok(outcome)
    }

    /// Delete a workshop that no active booking references.
    ///
    /// # Errors
    ///
    /// [`BookingError::HasActiveRegistrations`] while bookings still count.
    #[tracing::instrument(skip(self))]
    pub async fn delete_workshop(&self, id: WorkshopId) -> Result<(), BookingError> {
        self.store().delete_workshop(id).await?;
        tracing::info!("Workshop deleted");
        Ok(())
    }

    /// Delete a workshop and every booking for it, bypassing the safety check.
    ///
    /// Returns the number of bookings removed.
    ///
    /// # Errors
    ///
    /// [`BookingError::WorkshopNotFound`] if missing.
    #[tracing::instrument(skip(self))]
    pub async fn force_delete_workshop(&self, id: WorkshopId) -> Result<u64, BookingError> {
        let removed = self.store().purge_workshop(id).await?;
        tracing::warn!(bookings_removed = removed, "Workshop force-deleted");
        Ok(removed)
    }

    // ========================================================================
    // Registrations (admin)
    // ========================================================================

    /// Page through bookings.
    ///
    /// # Errors
    ///
    /// [`BookingError::Storage`] on storage failure.
    #[tracing::instrument(skip(self))]
    pub async fn list_registrations(
        &self,
        filter: BookingFilter,
        page: PageRequest,
    ) -> Result<Page<Booking>, BookingError> {
        Ok(self.store().list_bookings(filter, page).await?)
    }

    /// Page through one workshop's bookings.
    ///
    /// # Errors
    ///
    /// [`BookingError::WorkshopNotFound`] if the workshop is missing.
    #[tracing::instrument(skip(self))]
    pub async fn list_workshop_registrations(
        &self,
        id: WorkshopId,
        status: Option<BookingStatus>,
        page: PageRequest,
    ) -> Result<Page<Booking>, BookingError> {
        self.store().load_workshop(id).await?;
        let filter = BookingFilter {
            workshop_id: Some(id),
            status,
            email: None,
        };
        Ok(self.store().list_bookings(filter, page).await?)
    }

    /// Fetch any booking.
    ///
    /// # Errors
    ///
    /// [`BookingError::RegistrationNotFound`] if missing.
    #[tracing::instrument(skip(self), fields(registration_number = %number))]
    pub async fn get_registration(&self, number: RegistrationNumber) -> Result<Booking, BookingError> {
        Ok(self.store().load_booking(number).await?)
    }

    /// Record whether the participant attended.
    ///
    /// # Errors
    ///
    /// [`BookingError::InvalidTransition`] unless the booking is confirmed.
    #[tracing::instrument(skip(self), fields(registration_number = %number))]
    pub async fn mark_attendance(
        &self,
        number: RegistrationNumber,
        status: BookingStatus,
    ) -> Result<Booking, BookingError> {
        let booking = self.store().load_booking(number).await?;
        let transition = decide_attendance(&booking, status, self.env.clock.now())?;
        Ok(self.store().record_attendance(transition).await?)
    }

    /// Record a payment outcome.
    ///
    /// # Errors
    ///
    /// [`BookingError::Validation`] or [`BookingError::InvalidTransition`].
    #[tracing::instrument(skip(self, reference), fields(registration_number = %number))]
    pub async fn record_payment(
        &self,
        number: RegistrationNumber,
        status: PaymentStatus,
        reference: Option<String>,
    ) -> Result<Booking, BookingError> {
        let booking = self.store().load_booking(number).await?;
        let change = decide_payment(&booking, status, reference, self.env.clock.now())?;
        Ok(self.store().record_payment(change).await?)
    }
}
