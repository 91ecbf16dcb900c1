//! Column lists and row decoding.

use atelier_core::{
    Booking, BookingId, Email, FieldError, Money, Participant, RegistrationNumber, Schedule,
    SeatCount, StoreError, Workshop, WorkshopId,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::Row;
use sqlx::postgres::PgRow;
use std::str::FromStr;
use uuid::Uuid;

pub(crate) const WORKSHOP_COLUMNS: &str = "id, title, description, instructor, location, \
     date, start_time, end_time, max_participants, current_participants, price_minor, \
     status, created_at, updated_at";

pub(crate) const BOOKING_COLUMNS: &str = "id, workshop_id, registration_number, \
     participant_name, participant_email, participant_phone, participant_age, \
     special_requirements, number_of_seats, total_amount_minor, status, payment_status, \
     payment_reference, cancellation_reason, created_at, updated_at, cancelled_at";

fn corrupt(column: &str, error: impl std::fmt::Display) -> StoreError {
    StoreError::Database(format!("Corrupt {column} column: {error}"))
}

fn get<'r, T>(row: &'r PgRow, column: &str) -> Result<T, StoreError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column).map_err(|e| corrupt(column, e))
}

/// Parse a stored status string
pub(crate) fn parse<T>(value: &str) -> Result<T, StoreError>
where
    T: FromStr<Err = FieldError>,
{
    value.parse().map_err(|e| corrupt("status", e))
}

pub(crate) fn to_u32(value: i32) -> Result<u32, StoreError> {
    u32::try_from(value).map_err(|e| corrupt("counter", e))
}

pub(crate) fn to_i32(value: u32) -> Result<i32, StoreError> {
    i32::try_from(value).map_err(|e| StoreError::Database(format!("Value out of range: {e}")))
}

pub(crate) fn to_i16(value: u32) -> Result<i16, StoreError> {
    i16::try_from(value).map_err(|e| StoreError::Database(format!("Value out of range: {e}")))
}

pub(crate) fn workshop_from_row(row: &PgRow) -> Result<Workshop, StoreError> {
    let date: NaiveDate = get(row, "date")?;
    let start_time: NaiveTime = get(row, "start_time")?;
    let end_time: NaiveTime = get(row, "end_time")?;
    let status: String = get(row, "status")?;

    Ok(Workshop {
        id: WorkshopId::from_uuid(get::<Uuid>(row, "id")?),
        title: get(row, "title")?,
        description: get(row, "description")?,
        instructor: get(row, "instructor")?,
        location: get(row, "location")?,
        schedule: Schedule {
            date,
            start_time,
            end_time,
        },
        max_participants: to_u32(get(row, "max_participants")?)?,
        current_participants: to_u32(get(row, "current_participants")?)?,
        price: Money::from_minor(get(row, "price_minor")?).map_err(|e| corrupt("price_minor", e))?,
        status: parse(&status)?,
        created_at: get::<DateTime<Utc>>(row, "created_at")?,
        updated_at: get::<DateTime<Utc>>(row, "updated_at")?,
    })
}

pub(crate) fn booking_from_row(row: &PgRow) -> Result<Booking, StoreError> {
    let number: String = get(row, "registration_number")?;
    let email: String = get(row, "participant_email")?;
    let age: Option<i16> = get(row, "participant_age")?;
    let seats: i16 = get(row, "number_of_seats")?;
    let status: String = get(row, "status")?;
    let payment_status: String = get(row, "payment_status")?;

    Ok(Booking {
        id: BookingId::from_uuid(get::<Uuid>(row, "id")?),
        workshop_id: WorkshopId::from_uuid(get::<Uuid>(row, "workshop_id")?),
        registration_number: RegistrationNumber::parse(&number)
            .map_err(|e| corrupt("registration_number", e))?,
        participant: Participant {
            name: get(row, "participant_name")?,
            email: Email::parse(&email).map_err(|e| corrupt("participant_email", e))?,
            phone: get(row, "participant_phone")?,
            age: age
                .map(u8::try_from)
                .transpose()
                .map_err(|e| corrupt("participant_age", e))?,
            special_requirements: get(row, "special_requirements")?,
        },
        number_of_seats: u32::try_from(seats)
            .map_err(|e| corrupt("number_of_seats", e))
            .and_then(|n| SeatCount::new(n).map_err(|e| corrupt("number_of_seats", e)))?,
        total_amount: Money::from_minor(get(row, "total_amount_minor")?)
            .map_err(|e| corrupt("total_amount_minor", e))?,
        status: parse(&status)?,
        payment_status: parse(&payment_status)?,
        payment_reference: get(row, "payment_reference")?,
        cancellation_reason: get(row, "cancellation_reason")?,
        created_at: get::<DateTime<Utc>>(row, "created_at")?,
        updated_at: get::<DateTime<Utc>>(row, "updated_at")?,
        cancelled_at: get::<Option<DateTime<Utc>>>(row, "cancelled_at")?,
    })
}
