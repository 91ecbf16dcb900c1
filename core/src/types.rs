//! Domain types for workshop booking.
//!
//! Value objects validate on construction, so a `SeatCount`, `Email` or
//! `RegistrationNumber` that exists is always well-formed. Entities (`Workshop`,
//! `Booking`) are plain data; the rules that change them live in [`crate::decision`].

use crate::error::FieldError;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a workshop
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkshopId(Uuid);

impl WorkshopId {
    /// Creates a new random `WorkshopId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `WorkshopId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for WorkshopId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WorkshopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Storage identifier for a booking.
///
/// Customers never see this; they use the [`RegistrationNumber`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(Uuid);

impl BookingId {
    /// Creates a new random `BookingId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `BookingId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human-presentable booking identifier: `WS-<year>-<5 digits>`.
///
/// ```
/// use atelier_core::RegistrationNumber;
///
/// let number = RegistrationNumber::new(2026, 48213).unwrap();
/// assert_eq!(number.as_str(), "WS-2026-48213");
/// assert_eq!("WS-2026-48213".parse::<RegistrationNumber>().unwrap(), number);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegistrationNumber(String);

impl RegistrationNumber {
    /// Literal prefix of every registration number
    pub const PREFIX: &'static str = "WS";
    /// Smallest random serial (always five digits)
    pub const MIN_SERIAL: u32 = 10_000;
    /// Largest random serial
    pub const MAX_SERIAL: u32 = 99_999;

    /// Build a registration number from its year and serial parts.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldError`] if the year is not four digits or the serial
    /// is outside `10000..=99999`.
    pub fn new(year: i32, serial: u32) -> Result<Self, FieldError> {
        if !(1000..=9999).contains(&year) {
            return Err(FieldError::new(
                "registrationNumber",
                "year must have four digits",
            ));
        }
        if !(Self::MIN_SERIAL..=Self::MAX_SERIAL).contains(&serial) {
            return Err(FieldError::new(
                "registrationNumber",
                "serial must have five digits",
            ));
        }
        Ok(Self(format!("{}-{year}-{serial}", Self::PREFIX)))
    }

    /// Like [`RegistrationNumber::new`], but clamps out-of-range parts instead of failing.
    #[must_use]
    pub fn clamped(year: i32, serial: u32) -> Self {
        let year = year.clamp(1000, 9999);
        let serial = serial.clamp(Self::MIN_SERIAL, Self::MAX_SERIAL);
        Self(format!("{}-{year}-{serial}", Self::PREFIX))
    }

    /// Parse a registration number from its textual form.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldError`] if the input does not match `WS-YYYY-NNNNN`.
    pub fn parse(input: &str) -> Result<Self, FieldError> {
        let invalid = || FieldError::new("registrationNumber", "expected the form WS-YYYY-NNNNN");

        let mut parts = input.trim().split('-');
        let (Some(prefix), Some(year), Some(serial), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let all_digits = |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_digit());
        if prefix != Self::PREFIX || !all_digits(year, 4) || !all_digits(serial, 5) {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let serial: u32 = serial.parse().map_err(|_| invalid())?;
        Self::new(year, serial)
    }

    /// The registration number as text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegistrationNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RegistrationNumber {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RegistrationNumber {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RegistrationNumber> for String {
    fn from(value: RegistrationNumber) -> Self {
        value.0
    }
}

// ============================================================================
// Value Objects
// ============================================================================

/// Amount of money in minor currency units (never negative).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Money(i64);

impl Money {
    /// Zero amount (free workshops)
    pub const ZERO: Self = Self(0);

    /// Create an amount from minor units.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldError`] for negative amounts.
    pub fn from_minor(minor_units: i64) -> Result<Self, FieldError> {
        if minor_units < 0 {
            return Err(FieldError::new("price", "must not be negative"));
        }
        Ok(Self(minor_units))
    }

    /// Amount in minor units
    #[must_use]
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Whether the amount is zero
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Price of `seats` seats at this unit price, `None` on overflow.
    #[must_use]
    pub fn times(self, seats: SeatCount) -> Option<Self> {
        self.0.checked_mul(i64::from(seats.get())).map(Self)
    }
}

impl TryFrom<i64> for Money {
    type Error = FieldError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_minor(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Number of seats held by one booking (1..=5).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SeatCount(u8);

impl SeatCount {
    /// Most seats a single booking may hold
    pub const MAX: u32 = 5;

    /// One seat
    pub const ONE: Self = Self(1);

    /// Create a seat count.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldError`] when `seats` is outside `1..=5`.
    pub fn new(seats: u32) -> Result<Self, FieldError> {
        match u8::try_from(seats) {
            Ok(n) if n >= 1 && u32::from(n) <= Self::MAX => Ok(Self(n)),
            _ => Err(FieldError::new(
                "numberOfSeats",
                format!("must be between 1 and {}", Self::MAX),
            )),
        }
    }

    /// Seat count as an integer
    #[must_use]
    pub fn get(self) -> u32 {
        u32::from(self.0)
    }
}

impl TryFrom<u32> for SeatCount {
    type Error = FieldError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SeatCount> for u32 {
    fn from(value: SeatCount) -> Self {
        value.get()
    }
}

/// Participant email, trimmed and lower-cased.
///
/// Two emails that differ only in case or surrounding whitespace are the same
/// participant for duplicate detection and ownership checks.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Parse and normalize an email address.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldError`] if the address is not plausibly valid.
    pub fn parse(input: &str) -> Result<Self, FieldError> {
        let normalized = input.trim().to_lowercase();
        let invalid = || FieldError::new("email", "must be a valid email address");

        if normalized.is_empty() || normalized.len() > 254 || normalized.contains(char::is_whitespace) {
            return Err(invalid());
        }

        let Some((local, domain)) = normalized.split_once('@') else {
            return Err(invalid());
        };
        if local.is_empty() || domain.contains('@') || !domain.contains('.') {
            return Err(invalid());
        }
        if domain.starts_with('.') || domain.ends_with('.') {
            return Err(invalid());
        }

        Ok(Self(normalized))
    }

    /// The normalized address
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

/// When a workshop takes place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// Calendar date of the session
    pub date: NaiveDate,
    /// Start time (local to the café)
    pub start_time: NaiveTime,
    /// End time (local to the café)
    pub end_time: NaiveTime,
}

impl Schedule {
    /// Create a schedule.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldError`] if the session does not end after it starts.
    pub fn new(date: NaiveDate, start_time: NaiveTime, end_time: NaiveTime) -> Result<Self, FieldError> {
        let schedule = Self {
            date,
            start_time,
            end_time,
        };
        schedule.validate()?;
        Ok(schedule)
    }

    /// Check that the session ends after it starts.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldError`] on `endTime`.
    pub fn validate(&self) -> Result<(), FieldError> {
        if self.end_time <= self.start_time {
            return Err(FieldError::new("endTime", "must be after startTime"));
        }
        Ok(())
    }

    /// Whether the session date lies before `today`
    #[must_use]
    pub fn is_past(&self, today: NaiveDate) -> bool {
        self.date < today
    }
}

// ============================================================================
// Status Enums
// ============================================================================

/// Publication status of a workshop
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkshopStatus {
    /// Being prepared, invisible to the public
    Draft,
    /// Open for registration
    Published,
    /// Called off; all bookings cancelled
    Cancelled,
    /// Took place
    Completed,
}

impl WorkshopStatus {
    /// All statuses in lifecycle order
    pub const ALL: [Self; 4] = [Self::Draft, Self::Published, Self::Cancelled, Self::Completed];

    /// Storage / wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    ///
    /// `draft → published → {cancelled | completed}`; a draft may also be
    /// cancelled directly.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Published | Self::Cancelled)
                | (Self::Published, Self::Cancelled | Self::Completed)
        )
    }

    /// Whether the public can see workshops in this status
    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Published | Self::Completed)
    }
}

impl fmt::Display for WorkshopStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkshopStatus {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| FieldError::new("status", format!("unknown workshop status '{s}'")))
    }
}

/// Lifecycle status of a booking
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    /// Seats are held
    Confirmed,
    /// Seats were released (or the workshop was cancelled)
    Cancelled,
    /// Participant showed up
    Attended,
    /// Participant did not show up
    NoShow,
}

impl BookingStatus {
    /// All statuses
    pub const ALL: [Self; 4] = [Self::Confirmed, Self::Cancelled, Self::Attended, Self::NoShow];

    /// Storage / wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Attended => "attended",
            Self::NoShow => "no-show",
        }
    }

    /// `confirmed → {cancelled | attended | no-show}`; every other status is final.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Confirmed, Self::Cancelled | Self::Attended | Self::NoShow)
        )
    }

    /// Whether the booking still counts against workshop capacity
    #[must_use]
    pub const fn holds_seats(self) -> bool {
        matches!(self, Self::Confirmed)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| FieldError::new("status", format!("unknown registration status '{s}'")))
    }
}

/// Payment status recorded on a booking
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Awaiting payment
    Pending,
    /// Paid (or nothing to pay)
    Paid,
    /// Payment attempt failed
    Failed,
    /// Money returned to the participant
    Refunded,
}

impl PaymentStatus {
    /// All statuses
    pub const ALL: [Self; 4] = [Self::Pending, Self::Paid, Self::Failed, Self::Refunded];

    /// Storage / wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }

    /// Initial payment status for a booking of `amount`
    #[must_use]
    pub const fn initial_for(amount: Money) -> Self {
        if amount.is_zero() { Self::Paid } else { Self::Pending }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| FieldError::new("paymentStatus", format!("unknown payment status '{s}'")))
    }
}

// ============================================================================
// Entities
// ============================================================================

/// Contact details of the person booking seats
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Full name
    pub name: String,
    /// Normalized email (identity for duplicates and guest cancellation)
    pub email: Email,
    /// Phone number
    pub phone: String,
    /// Age, if given
    pub age: Option<u8>,
    /// Dietary needs, accessibility, etc.
    pub special_requirements: Option<String>,
}

impl Participant {
    /// Check field lengths and ranges, collecting every problem.
    #[must_use]
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        let name_len = self.name.trim().chars().count();
        if name_len == 0 || name_len > 100 {
            errors.push(FieldError::new("name", "must be between 1 and 100 characters"));
        }

        let phone_len = self.phone.trim().chars().count();
        if !(7..=20).contains(&phone_len) {
            errors.push(FieldError::new("phone", "must be between 7 and 20 characters"));
        }

        if let Some(age) = self.age {
            if age == 0 || age > 120 {
                errors.push(FieldError::new("age", "must be between 1 and 120"));
            }
        }

        if self
            .special_requirements
            .as_ref()
            .is_some_and(|text| text.chars().count() > 500)
        {
            errors.push(FieldError::new(
                "specialRequirements",
                "must be at most 500 characters",
            ));
        }

        errors
    }
}

/// A scheduled, bookable workshop with finite capacity
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workshop {
    /// Workshop identifier
    pub id: WorkshopId,
    /// Title shown to customers
    pub title: String,
    /// Longer description
    pub description: String,
    /// Who runs the session
    pub instructor: Option<String>,
    /// Where it takes place
    pub location: Option<String>,
    /// Date and time
    pub schedule: Schedule,
    /// Seat capacity
    pub max_participants: u32,
    /// Seats held by active bookings (denormalized running total)
    pub current_participants: u32,
    /// Price per seat
    pub price: Money,
    /// Publication status
    pub status: WorkshopStatus,
    /// When the workshop was created
    pub created_at: DateTime<Utc>,
    /// Last modification
    pub updated_at: DateTime<Utc>,
}

impl Workshop {
    /// Seats still free
    #[must_use]
    pub const fn available_seats(&self) -> u32 {
        self.max_participants.saturating_sub(self.current_participants)
    }

    /// Whether no seat is left
    #[must_use]
    pub const fn is_fully_booked(&self) -> bool {
        self.current_participants >= self.max_participants
    }

    /// Whether the session date lies before `today`
    #[must_use]
    pub fn is_past(&self, today: NaiveDate) -> bool {
        self.schedule.is_past(today)
    }

    /// Whether `seats` more seats fit within capacity
    #[must_use]
    pub fn can_seat(&self, seats: SeatCount) -> bool {
        u64::from(self.current_participants) + u64::from(seats.get()) <= u64::from(self.max_participants)
    }
}

/// Everything needed to create a workshop
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkshopDraft {
    /// Title shown to customers
    pub title: String,
    /// Longer description
    pub description: String,
    /// Who runs the session
    pub instructor: Option<String>,
    /// Where it takes place
    pub location: Option<String>,
    /// Date and time
    pub schedule: Schedule,
    /// Seat capacity
    pub max_participants: u32,
    /// Price per seat
    pub price: Money,
    /// Initial status: `draft` or `published`
    pub status: WorkshopStatus,
}

/// Partial update of a workshop's editable details.
///
/// Status is not editable here; it moves through publish, complete and cancel.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkshopChanges {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New instructor
    pub instructor: Option<String>,
    /// New location
    pub location: Option<String>,
    /// New date
    pub date: Option<NaiveDate>,
    /// New start time
    pub start_time: Option<NaiveTime>,
    /// New end time
    pub end_time: Option<NaiveTime>,
    /// New capacity (never below seats already reserved)
    pub max_participants: Option<u32>,
    /// New price (existing bookings keep their total)
    pub price: Option<Money>,
}

/// A participant's reservation of seats in a workshop
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Storage identifier
    pub id: BookingId,
    /// Booked workshop
    pub workshop_id: WorkshopId,
    /// Customer-facing identifier
    pub registration_number: RegistrationNumber,
    /// Contact details
    pub participant: Participant,
    /// Seats held
    pub number_of_seats: SeatCount,
    /// Price per seat × seats, fixed at creation
    pub total_amount: Money,
    /// Lifecycle status
    pub status: BookingStatus,
    /// Payment status
    pub payment_status: PaymentStatus,
    /// Gateway payment reference, if any
    pub payment_reference: Option<String>,
    /// Why the booking was cancelled
    pub cancellation_reason: Option<String>,
    /// When the booking was made
    pub created_at: DateTime<Utc>,
    /// Last modification
    pub updated_at: DateTime<Utc>,
    /// When the booking was cancelled
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Whether `email` is the participant's address
    #[must_use]
    pub fn belongs_to(&self, email: &Email) -> bool {
        &self.participant.email == email
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn registration_number_round_trips_through_text() {
        let number = RegistrationNumber::new(2026, 10_000).unwrap();
        assert_eq!(number.as_str(), "WS-2026-10000");
        assert_eq!(RegistrationNumber::parse("WS-2026-10000").unwrap(), number);
    }

    #[test]
    fn registration_number_rejects_malformed_input() {
        for input in [
            "",
            "WS-2026-1234",
            "WS-2026-123456",
            "WS-26-12345",
            "XS-2026-12345",
            "WS-2026-09999",
            "WS-2026-12a45",
            "WS-2026-12345-1",
        ] {
            assert!(RegistrationNumber::parse(input).is_err(), "{input} should be rejected");
        }
    }

    #[test]
    fn registration_number_serde_validates() {
        let ok: RegistrationNumber = serde_json::from_str("\"WS-2025-55555\"").unwrap();
        assert_eq!(ok.as_str(), "WS-2025-55555");
        assert!(serde_json::from_str::<RegistrationNumber>("\"nope\"").is_err());
    }

    #[test]
    fn seat_count_bounds() {
        assert!(SeatCount::new(0).is_err());
        assert_eq!(SeatCount::new(1).unwrap().get(), 1);
        assert_eq!(SeatCount::new(5).unwrap().get(), 5);
        assert!(SeatCount::new(6).is_err());
        assert!(serde_json::from_str::<SeatCount>("7").is_err());
    }

    #[test]
    fn email_is_normalized() {
        let email = Email::parse("  Ada.Lovelace@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "ada.lovelace@example.com");
        assert_eq!(email, Email::parse("ada.lovelace@example.com").unwrap());
    }

    #[test]
    fn email_rejects_garbage() {
        for input in ["", "plain", "@example.com", "a@b", "a@@b.com", "a b@c.com", "a@.com", "a@com."] {
            assert!(Email::parse(input).is_err(), "{input} should be rejected");
        }
    }

    #[test]
    fn money_multiplies_by_seats() {
        let price = Money::from_minor(1_250).unwrap();
        assert_eq!(price.times(SeatCount::new(3).unwrap()), Some(Money::from_minor(3_750).unwrap()));
        assert_eq!(Money::from_minor(i64::MAX).unwrap().times(SeatCount::new(2).unwrap()), None);
        assert!(Money::from_minor(-1).is_err());
        assert_eq!(price.to_string(), "12.50");
    }

    #[test]
    fn schedule_requires_end_after_start() {
        let date = NaiveDate::from_ymd_opt(2026, 11, 2).unwrap();
        let ten = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        assert!(Schedule::new(date, ten, noon).is_ok());
        assert!(Schedule::new(date, noon, ten).is_err());
        assert!(Schedule::new(date, ten, ten).is_err());
    }

    #[test]
    fn workshop_status_lifecycle() {
        use WorkshopStatus::{Cancelled, Completed, Draft, Published};
        assert!(Draft.can_transition_to(Published));
        assert!(Draft.can_transition_to(Cancelled));
        assert!(Published.can_transition_to(Cancelled));
        assert!(Published.can_transition_to(Completed));
        assert!(!Published.can_transition_to(Draft));
        assert!(!Cancelled.can_transition_to(Published));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Draft.can_transition_to(Completed));
    }

    #[test]
    fn booking_status_lifecycle_and_wire_names() {
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::NoShow));
        assert!(!BookingStatus::Cancelled.can_transition_to(BookingStatus::Confirmed));
        assert!(!BookingStatus::Attended.can_transition_to(BookingStatus::Cancelled));
        assert_eq!(serde_json::to_string(&BookingStatus::NoShow).unwrap(), "\"no-show\"");
        assert_eq!("no-show".parse::<BookingStatus>().unwrap(), BookingStatus::NoShow);
    }

    #[test]
    fn participant_validation_collects_all_problems() {
        let participant = Participant {
            name: String::new(),
            email: Email::parse("a@b.co").unwrap(),
            phone: "12".to_string(),
            age: Some(0),
            special_requirements: Some("x".repeat(501)),
        };
        let fields: Vec<_> = participant.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, ["name", "phone", "age", "specialRequirements"]);
    }
}
