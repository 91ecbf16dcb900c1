//! `PostgreSQL` workshop store for Atelier.
//!
//! [`PostgresWorkshopStore`] implements [`WorkshopStore`] on top of two tables,
//! `workshops` and `bookings` (see `migrations/`). Seat accounting relies on:
//!
//! - A conditional update as the only seat-reservation primitive:
//!   `current_participants + n <= max_participants AND status = 'published'`
//! - A partial unique index on `(workshop_id, participant_email)` for
//!   non-cancelled bookings
//! - One transaction per multi-row mutation (registration, cancellation,
//!   workshop cancellation cascade, deletion)
//!
//! # Example
//!
//! ```no_run
//! use atelier_postgres::PostgresWorkshopStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = PostgresWorkshopStore::connect("postgres://localhost/atelier").await?;
//! store.migrate().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod rows;

use atelier_core::{
    Booking, BookingFilter, BookingStatus, BookingTransition, CancellationOutcome,
    CancellationPlan, Page, PageRequest, PaymentChange, RegistrationNumber, RegistrationPlan,
    StatusTransition, StoreError, StoreFuture, Workshop, WorkshopCancellation, WorkshopFilter,
    WorkshopId, WorkshopStatus, WorkshopStore, WorkshopUpdate,
};
use rows::{BOOKING_COLUMNS, WORKSHOP_COLUMNS, booking_from_row, to_i16, to_i32, workshop_from_row};
use sqlx::postgres::{PgConnection, PgPool};
use sqlx::Row;

/// Unique index guarding one active booking per (workshop, email)
const ACTIVE_PARTICIPANT_KEY: &str = "bookings_active_participant_key";
/// Unique constraint on registration numbers
const REGISTRATION_NUMBER_KEY: &str = "bookings_registration_number_key";

fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |e| StoreError::Database(format!("{context}: {e}"))
}

/// `PostgreSQL`-backed [`WorkshopStore`].
#[derive(Clone, Debug)]
pub struct PostgresWorkshopStore {
    pool: PgPool,
}

impl PostgresWorkshopStore {
    /// Wrap an existing connection pool
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect with default pool settings.
    ///
    /// # Errors
    ///
    /// [`StoreError::Database`] if the connection fails.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(db_error("Failed to connect"))?;
        Ok(Self::from_pool(pool))
    }

    /// The underlying pool
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run the embedded migrations.
    ///
    /// # Errors
    ///
    /// [`StoreError::Database`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Migration failed: {e}")))?;
        Ok(())
    }

    // ========================================================================
    // Guard explanations
    // ========================================================================
    //
    // A guarded UPDATE that matches no row does not say why. These lookups turn
    // "no row" into the specific StoreError.

    async fn workshop_status(
        conn: &mut PgConnection,
        id: WorkshopId,
    ) -> Result<(WorkshopStatus, u32, u32), StoreError> {
        let row = sqlx::query(
            "SELECT status, max_participants, current_participants FROM workshops WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_error("Failed to load workshop status"))?
        .ok_or(StoreError::WorkshopNotFound(id))?;

        let status: String = row.try_get("status").map_err(db_error("Bad status column"))?;
        let max: i32 = row
            .try_get("max_participants")
            .map_err(db_error("Bad capacity column"))?;
        let current: i32 = row
            .try_get("current_participants")
            .map_err(db_error("Bad seat counter column"))?;
        Ok((
            rows::parse(&status)?,
            rows::to_u32(max)?,
            rows::to_u32(current)?,
        ))
    }

    async fn booking_status(
        conn: &mut PgConnection,
        number: &RegistrationNumber,
    ) -> Result<BookingStatus, StoreError> {
        let status: String = sqlx::query_scalar(
            "SELECT status FROM bookings WHERE registration_number = $1",
        )
        .bind(number.as_str())
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_error("Failed to load booking status"))?
        .ok_or_else(|| StoreError::BookingNotFound(number.clone()))?;
        rows::parse(&status)
    }

    async fn explain_transition(
        &self,
        transition: StatusTransition,
    ) -> StoreError {
        let mut conn = match self.pool.acquire().await {
            Ok(conn) => conn,
            Err(e) => return db_error("Failed to acquire connection")(e),
        };
        match Self::workshop_status(&mut *conn, transition.workshop_id).await {
            Ok((actual, _, _)) => StoreError::WorkshopStatusConflict {
                actual,
                attempted: transition.to,
            },
            Err(e) => e,
        }
    }

    // ========================================================================
    // Operations
    // ========================================================================

    #[tracing::instrument(skip(self, workshop), fields(workshop_id = %workshop.id))]
    async fn insert(&self, workshop: Workshop) -> Result<Workshop, StoreError> {
        let sql = format!(
            "INSERT INTO workshops ({WORKSHOP_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {WORKSHOP_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(workshop.id.as_uuid())
            .bind(&workshop.title)
            .bind(&workshop.description)
            .bind(workshop.instructor.as_deref())
            .bind(workshop.location.as_deref())
            .bind(workshop.schedule.date)
            .bind(workshop.schedule.start_time)
            .bind(workshop.schedule.end_time)
            .bind(to_i32(workshop.max_participants)?)
            .bind(to_i32(workshop.current_participants)?)
            .bind(workshop.price.minor_units())
            .bind(workshop.status.as_str())
            .bind(workshop.created_at)
            .bind(workshop.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to insert workshop"))?;
        workshop_from_row(&row)
    }

    async fn load(&self, id: WorkshopId) -> Result<Workshop, StoreError> {
        let sql = format!("SELECT {WORKSHOP_COLUMNS} FROM workshops WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to load workshop"))?
            .ok_or(StoreError::WorkshopNotFound(id))?;
        workshop_from_row(&row)
    }

    async fn list(&self, filter: WorkshopFilter) -> Result<Vec<Workshop>, StoreError> {
        let sql = format!(
            "SELECT {WORKSHOP_COLUMNS} FROM workshops \
             WHERE ($1::text IS NULL OR status = $1) \
               AND ($2::date IS NULL OR date >= $2) \
             ORDER BY date, start_time, created_at"
        );
        let rows = sqlx::query(&sql)
            .bind(filter.status.map(WorkshopStatus::as_str))
            .bind(filter.from_date)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list workshops"))?;
        rows.iter().map(workshop_from_row).collect()
    }

    #[tracing::instrument(skip(self, update), fields(workshop_id = %update.workshop.id))]
    async fn update(&self, update: WorkshopUpdate) -> Result<Workshop, StoreError> {
        let w = update.workshop;
        let sql = format!(
            "UPDATE workshops SET title = $2, description = $3, instructor = $4, location = $5, \
                    date = $6, start_time = $7, end_time = $8, max_participants = $9, \
                    price_minor = $10, updated_at = $11 \
             WHERE id = $1 \
               AND status IN ('draft', 'published') \
               AND current_participants <= $9 \
             RETURNING {WORKSHOP_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(w.id.as_uuid())
            .bind(&w.title)
            .bind(&w.description)
            .bind(w.instructor.as_deref())
            .bind(w.location.as_deref())
            .bind(w.schedule.date)
            .bind(w.schedule.start_time)
            .bind(w.schedule.end_time)
            .bind(to_i32(w.max_participants)?)
            .bind(w.price.minor_units())
            .bind(w.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to update workshop"))?;

        if let Some(row) = row {
            return workshop_from_row(&row);
        }

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(db_error("Failed to acquire connection"))?;
        let (status, _, current) = Self::workshop_status(&mut *conn, w.id).await?;
        if matches!(status, WorkshopStatus::Cancelled | WorkshopStatus::Completed) {
            return Err(StoreError::WorkshopLocked(status));
        }
        Err(StoreError::CapacityBelowReserved {
            requested: w.max_participants,
            reserved: current,
        })
    }

    #[tracing::instrument(skip(self), fields(workshop_id = %transition.workshop_id, to = %transition.to))]
    async fn transition(&self, transition: StatusTransition) -> Result<Workshop, StoreError> {
        let sql = format!(
            "UPDATE workshops SET status = $3, updated_at = $4 \
             WHERE id = $1 AND status = $2 \
             RETURNING {WORKSHOP_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(transition.workshop_id.as_uuid())
            .bind(transition.from.as_str())
            .bind(transition.to.as_str())
            .bind(transition.at)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to change workshop status"))?;
        match row {
            Some(row) => workshop_from_row(&row),
            None => Err(self.explain_transition(transition).await),
        }
    }

    #[tracing::instrument(
        skip(self, plan),
        fields(
            workshop_id = %plan.workshop_id(),
            registration_number = %plan.booking.registration_number,
            seats = plan.seats().get()
        )
    )]
    async fn reserve_and_insert(&self, plan: RegistrationPlan) -> Result<Booking, StoreError> {
        let booking = plan.booking;
        let seats = i32::from(to_i16(booking.number_of_seats.get())?);
        let mut tx = self.pool.begin().await.map_err(db_error("Failed to begin"))?;

        // Sole seat-reservation primitive. Concurrent registrations serialize on the
        // row lock and re-evaluate the guard against the committed counter.
        let reserved = sqlx::query(
            "UPDATE workshops \
             SET current_participants = current_participants + $2, updated_at = $3 \
             WHERE id = $1 \
               AND status = 'published' \
               AND current_participants + $2 <= max_participants \
             RETURNING id",
        )
        .bind(booking.workshop_id.as_uuid())
        .bind(seats)
        .bind(booking.created_at)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("Failed to reserve seats"))?;

        if reserved.is_none() {
            let (status, max, current) = Self::workshop_status(&mut *tx, booking.workshop_id).await?;
            tracing::debug!(%status, max, current, "Seat reservation guard rejected");
            return Err(if status == WorkshopStatus::Published {
                StoreError::CapacityExceeded {
                    requested: booking.number_of_seats.get(),
                    available: max.saturating_sub(current),
                }
            } else {
                StoreError::WorkshopNotOpen { status }
            });
        }

        let sql = format!(
            "INSERT INTO bookings ({BOOKING_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17) \
             RETURNING {BOOKING_COLUMNS}"
        );
        let inserted = sqlx::query(&sql)
            .bind(booking.id.as_uuid())
            .bind(booking.workshop_id.as_uuid())
            .bind(booking.registration_number.as_str())
            .bind(&booking.participant.name)
            .bind(booking.participant.email.as_str())
            .bind(&booking.participant.phone)
            .bind(booking.participant.age.map(i16::from))
            .bind(booking.participant.special_requirements.as_deref())
            .bind(to_i16(booking.number_of_seats.get())?)
            .bind(booking.total_amount.minor_units())
            .bind(booking.status.as_str())
            .bind(booking.payment_status.as_str())
            .bind(booking.payment_reference.as_deref())
            .bind(booking.cancellation_reason.as_deref())
            .bind(booking.created_at)
            .bind(booking.updated_at)
            .bind(booking.cancelled_at)
            .fetch_one(&mut *tx)
            .await;

        let row = match inserted {
            Ok(row) => row,
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                return Err(match db.constraint() {
                    Some(ACTIVE_PARTICIPANT_KEY) => StoreError::DuplicateParticipant,
                    Some(REGISTRATION_NUMBER_KEY) => {
                        StoreError::DuplicateRegistrationNumber(booking.registration_number)
                    }
                    _ => StoreError::Database(format!("Unique violation: {db}")),
                });
            }
            Err(e) => return Err(db_error("Failed to insert booking")(e)),
        };
        let booking = booking_from_row(&row)?;

        tx.commit().await.map_err(db_error("Failed to commit registration"))?;
        Ok(booking)
    }

    #[tracing::instrument(
        skip(self, plan),
        fields(registration_number = %plan.registration_number, seats = plan.release_seats.get())
    )]
    async fn cancel_and_release(&self, plan: CancellationPlan) -> Result<CancellationOutcome, StoreError> {
        let mut tx = self.pool.begin().await.map_err(db_error("Failed to begin"))?;

        let sql = format!(
            "UPDATE bookings \
             SET status = 'cancelled', cancelled_at = $2, cancellation_reason = $3, updated_at = $2 \
             WHERE id = $1 AND status = 'confirmed' \
             RETURNING {BOOKING_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(plan.booking_id.as_uuid())
            .bind(plan.cancelled_at)
            .bind(plan.reason.as_deref())
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error("Failed to cancel booking"))?;

        let Some(row) = row else {
            let actual = Self::booking_status(&mut *tx, &plan.registration_number).await?;
            return Err(StoreError::BookingStatusConflict {
                actual,
                attempted: BookingStatus::Cancelled,
            });
        };
        let booking = booking_from_row(&row)?;

        let sql = format!(
            "UPDATE workshops \
             SET current_participants = GREATEST(current_participants - $2, 0), updated_at = $3 \
             WHERE id = $1 \
             RETURNING {WORKSHOP_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(plan.workshop_id.as_uuid())
            .bind(to_i32(plan.release_seats.get())?)
            .bind(plan.cancelled_at)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error("Failed to release seats"))?
            .ok_or(StoreError::WorkshopNotFound(plan.workshop_id))?;
        let workshop = workshop_from_row(&row)?;

        tx.commit().await.map_err(db_error("Failed to commit cancellation"))?;
        Ok(CancellationOutcome { booking, workshop })
    }

    #[tracing::instrument(skip(self), fields(workshop_id = %transition.workshop_id))]
    async fn cancel_cascade(&self, transition: StatusTransition) -> Result<WorkshopCancellation, StoreError> {
        let mut tx = self.pool.begin().await.map_err(db_error("Failed to begin"))?;

        let sql = format!(
            "UPDATE workshops SET status = 'cancelled', updated_at = $3 \
             WHERE id = $1 AND status = $2 \
             RETURNING {WORKSHOP_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(transition.workshop_id.as_uuid())
            .bind(transition.from.as_str())
            .bind(transition.at)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error("Failed to cancel workshop"))?;

        let Some(row) = row else {
            let (actual, _, _) = Self::workshop_status(&mut *tx, transition.workshop_id).await?;
            return Err(StoreError::WorkshopStatusConflict {
                actual,
                attempted: WorkshopStatus::Cancelled,
            });
        };
        let workshop = workshop_from_row(&row)?;

        let cancelled = sqlx::query(
            "UPDATE bookings SET status = 'cancelled', cancelled_at = $2, updated_at = $2 \
             WHERE workshop_id = $1 AND status <> 'cancelled'",
        )
        .bind(transition.workshop_id.as_uuid())
        .bind(transition.at)
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to cancel bookings"))?
        .rows_affected();

        tx.commit().await.map_err(db_error("Failed to commit workshop cancellation"))?;
        Ok(WorkshopCancellation {
            workshop,
            bookings_cancelled: cancelled,
        })
    }

    async fn lock_workshop(conn: &mut PgConnection, id: WorkshopId) -> Result<(), StoreError> {
        sqlx::query("SELECT id FROM workshops WHERE id = $1 FOR UPDATE")
            .bind(id.as_uuid())
            .fetch_optional(&mut *conn)
            .await
            .map_err(db_error("Failed to lock workshop"))?
            .ok_or(StoreError::WorkshopNotFound(id))?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_guarded(&self, id: WorkshopId) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(db_error("Failed to begin"))?;
        Self::lock_workshop(&mut *tx, id).await?;

        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings WHERE workshop_id = $1 AND status <> 'cancelled'",
        )
        .bind(id.as_uuid())
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("Failed to count bookings"))?;
        if active > 0 {
            return Err(StoreError::ActiveBookings(active.unsigned_abs()));
        }

        sqlx::query("DELETE FROM workshops WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to delete workshop"))?;
        tx.commit().await.map_err(db_error("Failed to commit deletion"))?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn purge(&self, id: WorkshopId) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await.map_err(db_error("Failed to begin"))?;
        Self::lock_workshop(&mut *tx, id).await?;

        let removed = sqlx::query("DELETE FROM bookings WHERE workshop_id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to delete bookings"))?
            .rows_affected();
        sqlx::query("DELETE FROM workshops WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to delete workshop"))?;

        tx.commit().await.map_err(db_error("Failed to commit purge"))?;
        Ok(removed)
    }

    async fn booking(&self, number: RegistrationNumber) -> Result<Booking, StoreError> {
        let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE registration_number = $1");
        let row = sqlx::query(&sql)
            .bind(number.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to load booking"))?
            .ok_or(StoreError::BookingNotFound(number))?;
        booking_from_row(&row)
    }

    async fn bookings(&self, filter: BookingFilter, page: PageRequest) -> Result<Page<Booking>, StoreError> {
        const WHERE: &str = "WHERE ($1::uuid IS NULL OR workshop_id = $1) \
                               AND ($2::text IS NULL OR status = $2) \
                               AND ($3::text IS NULL OR participant_email = $3)";

        let workshop_id = filter.workshop_id.map(|id| *id.as_uuid());
        let status = filter.status.map(BookingStatus::as_str);
        let email = filter.email.as_ref().map(|e| e.as_str().to_string());

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM bookings {WHERE}"))
            .bind(workshop_id)
            .bind(status)
            .bind(email.as_deref())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count bookings"))?;

        let sql = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings {WHERE} \
             ORDER BY created_at DESC, id \
             LIMIT $4 OFFSET $5"
        );
        let rows = sqlx::query(&sql)
            .bind(workshop_id)
            .bind(status)
            .bind(email.as_deref())
            .bind(i64::try_from(page.limit()).unwrap_or(i64::MAX))
            .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list bookings"))?;

        Ok(Page {
            items: rows.iter().map(booking_from_row).collect::<Result<_, _>>()?,
            total: total.unsigned_abs(),
            page: page.page,
            page_size: page.page_size,
        })
    }

    #[tracing::instrument(skip(self), fields(registration_number = %transition.registration_number))]
    async fn attendance(&self, transition: BookingTransition) -> Result<Booking, StoreError> {
        let sql = format!(
            "UPDATE bookings SET status = $3, updated_at = $4 \
             WHERE registration_number = $1 AND status = $2 \
             RETURNING {BOOKING_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(transition.registration_number.as_str())
            .bind(transition.from.as_str())
            .bind(transition.to.as_str())
            .bind(transition.at)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to record attendance"))?;

        if let Some(row) = row {
            return booking_from_row(&row);
        }
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(db_error("Failed to acquire connection"))?;
        let actual = Self::booking_status(&mut *conn, &transition.registration_number).await?;
        Err(StoreError::BookingStatusConflict {
            actual,
            attempted: transition.to,
        })
    }

    #[tracing::instrument(skip(self), fields(registration_number = %change.registration_number))]
    async fn payment(&self, change: PaymentChange) -> Result<Booking, StoreError> {
        let sql = format!(
            "UPDATE bookings \
             SET payment_status = $2, payment_reference = COALESCE($3, payment_reference), updated_at = $4 \
             WHERE registration_number = $1 \
             RETURNING {BOOKING_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(change.registration_number.as_str())
            .bind(change.status.as_str())
            .bind(change.reference.as_deref())
            .bind(change.at)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to record payment"))?
            .ok_or_else(|| StoreError::BookingNotFound(change.registration_number.clone()))?;
        booking_from_row(&row)
    }
}

impl WorkshopStore for PostgresWorkshopStore {
    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            sqlx::query("SELECT 1")
                .execute(&self.pool)
                .await
                .map_err(db_error("Ping failed"))?;
            Ok(())
        })
    }

    fn insert_workshop(&self, workshop: Workshop) -> StoreFuture<'_, Workshop> {
        Box::pin(self.insert(workshop))
    }

    fn load_workshop(&self, id: WorkshopId) -> StoreFuture<'_, Workshop> {
        Box::pin(self.load(id))
    }

    fn list_workshops(&self, filter: WorkshopFilter) -> StoreFuture<'_, Vec<Workshop>> {
        Box::pin(self.list(filter))
    }

    fn update_workshop(&self, update: WorkshopUpdate) -> StoreFuture<'_, Workshop> {
        Box::pin(self.update(update))
    }

    fn transition_workshop(&self, transition: StatusTransition) -> StoreFuture<'_, Workshop> {
        Box::pin(self.transition(transition))
    }

    fn commit_registration(&self, plan: RegistrationPlan) -> StoreFuture<'_, Booking> {
        Box::pin(self.reserve_and_insert(plan))
    }

    fn commit_cancellation(&self, plan: CancellationPlan) -> StoreFuture<'_, CancellationOutcome> {
        Box::pin(self.cancel_and_release(plan))
    }

    fn cancel_workshop(&self, transition: StatusTransition) -> StoreFuture<'_, WorkshopCancellation> {
        Box::pin(self.cancel_cascade(transition))
    }

    fn delete_workshop(&self, id: WorkshopId) -> StoreFuture<'_, ()> {
        Box::pin(self.delete_guarded(id))
    }

    fn purge_workshop(&self, id: WorkshopId) -> StoreFuture<'_, u64> {
        Box::pin(self.purge(id))
    }

    fn load_booking(&self, number: RegistrationNumber) -> StoreFuture<'_, Booking> {
        Box::pin(self.booking(number))
    }

    fn list_bookings(&self, filter: BookingFilter, page: PageRequest) -> StoreFuture<'_, Page<Booking>> {
        Box::pin(self.bookings(filter, page))
    }

    fn record_attendance(&self, transition: BookingTransition) -> StoreFuture<'_, Booking> {
        Box::pin(self.attendance(transition))
    }

    fn record_payment(&self, change: PaymentChange) -> StoreFuture<'_, Booking> {
        Box::pin(self.payment(change))
    }
}
