use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use gigbook_core::{BookingError, CoreResult};
use gigbook_shared::time::{optional_hhmm, utc_timestamp};
use gigbook_shared::{BookingId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Booking status in the lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Requested,
    Accepted,
    Rejected,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Requested,
        BookingStatus::Accepted,
        BookingStatus::Rejected,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Requested => "requested",
            BookingStatus::Accepted => "accepted",
            BookingStatus::Rejected => "rejected",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, BookingStatus::Requested)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| BookingError::validation(format!("unknown booking status '{}'", s)))
    }
}

/// What an actor asks to do with a requested booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingAction {
    Accept,
    Reject,
    Cancel,
}

impl BookingAction {
    pub const ALL: [BookingAction; 3] = [
        BookingAction::Accept,
        BookingAction::Reject,
        BookingAction::Cancel,
    ];

    /// Terminal status this action moves a booking into.
    pub fn target_status(&self) -> BookingStatus {
        match self {
            BookingAction::Accept => BookingStatus::Accepted,
            BookingAction::Reject => BookingStatus::Rejected,
            BookingAction::Cancel => BookingStatus::Cancelled,
        }
    }

    /// Inverse of [`BookingAction::target_status`]. `requested` has no action.
    pub fn for_target(status: BookingStatus) -> Option<Self> {
        BookingAction::ALL
            .into_iter()
            .find(|action| action.target_status() == status)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingAction::Accept => "accept",
            BookingAction::Reject => "reject",
            BookingAction::Cancel => "cancel",
        }
    }
}

impl fmt::Display for BookingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request by one user to reserve a slot in another user's calendar.
///
/// Only `status` changes after creation. Deserialisation goes through
/// [`BookingRecord`] so malformed payloads never become a `Booking`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BookingRecord")]
pub struct Booking {
    pub id: BookingId,
    pub requester_id: UserId,
    pub recipient_id: UserId,
    pub date: NaiveDate,
    #[serde(serialize_with = "optional_hhmm::serialize")]
    pub start_time: Option<NaiveTime>,
    #[serde(serialize_with = "optional_hhmm::serialize")]
    pub end_time: Option<NaiveTime>,
    pub fee: Option<f64>,
    pub location: Option<String>,
    pub note: Option<String>,
    pub status: BookingStatus,
    #[serde(serialize_with = "utc_timestamp::serialize")]
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// No start time means the booking covers the whole day.
    pub fn is_all_day(&self) -> bool {
        self.start_time.is_none()
    }

    pub fn involves(&self, user: UserId) -> bool {
        self.requester_id == user || self.recipient_id == user
    }

    pub fn is_provisional(&self) -> bool {
        self.id.is_provisional()
    }
}

/// Untrusted wire shape of a booking.
#[derive(Debug, Deserialize)]
struct BookingRecord {
    id: BookingId,
    requester_id: UserId,
    recipient_id: UserId,
    date: NaiveDate,
    #[serde(default, with = "optional_hhmm")]
    start_time: Option<NaiveTime>,
    #[serde(default, with = "optional_hhmm")]
    end_time: Option<NaiveTime>,
    #[serde(default)]
    fee: Option<f64>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    note: Option<String>,
    status: BookingStatus,
    #[serde(with = "utc_timestamp")]
    created_at: DateTime<Utc>,
}

impl TryFrom<BookingRecord> for Booking {
    type Error = BookingError;

    fn try_from(record: BookingRecord) -> Result<Self, Self::Error> {
        ensure_distinct_parties(record.requester_id, record.recipient_id)?;
        ensure_valid_fee(record.fee)?;
        ensure_time_order(record.start_time, record.end_time)?;

        Ok(Booking {
            id: record.id,
            requester_id: record.requester_id,
            recipient_id: record.recipient_id,
            date: record.date,
            start_time: record.start_time,
            end_time: record.end_time,
            fee: record.fee,
            location: record.location,
            note: record.note,
            status: record.status,
            created_at: record.created_at,
        })
    }
}

/// Payload of a booking request. The requester is the authenticated viewer
/// and is never part of the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBooking {
    pub recipient_id: UserId,
    pub date: NaiveDate,
    #[serde(default, with = "optional_hhmm")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "optional_hhmm")]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub fee: Option<f64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl NewBooking {
    pub fn new(recipient_id: UserId, date: NaiveDate) -> Self {
        Self {
            recipient_id,
            date,
            start_time: None,
            end_time: None,
            fee: None,
            location: None,
            note: None,
        }
    }

    pub fn with_times(mut self, start: NaiveTime, end: Option<NaiveTime>) -> Self {
        self.start_time = Some(start);
        self.end_time = end;
        self
    }

    pub fn with_fee(mut self, fee: f64) -> Self {
        self.fee = Some(fee);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Trims free text, drops blanks, and drops the end time of all-day requests.
    pub fn normalized(mut self) -> Self {
        self.location = trimmed(self.location);
        self.note = trimmed(self.note);
        if self.start_time.is_none() {
            self.end_time = None;
        }
        self
    }

    /// Local checks run before any request leaves the client.
    pub fn validate(&self, requester: UserId, today: NaiveDate) -> CoreResult<()> {
        if self.date < today {
            return Err(BookingError::validation(
                "You cannot request a booking for a past date.",
            ));
        }
        ensure_distinct_parties(requester, self.recipient_id)?;
        ensure_valid_fee(self.fee)?;

        ensure_time_order(self.start_time, self.end_time)
    }

    /// Materialise the request as a freshly `requested` booking.
    pub fn into_booking(self, id: BookingId, requester: UserId, created_at: DateTime<Utc>) -> Booking {
        let data = self.normalized();
        Booking {
            id,
            requester_id: requester,
            recipient_id: data.recipient_id,
            date: data.date,
            start_time: data.start_time,
            end_time: data.end_time,
            fee: data.fee,
            location: data.location,
            note: data.note,
            status: BookingStatus::Requested,
            created_at,
        }
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn ensure_distinct_parties(requester: UserId, recipient: UserId) -> CoreResult<()> {
    if requester == recipient {
        return Err(BookingError::validation(
            "Requester and recipient must be different users.",
        ));
    }
    Ok(())
}

fn ensure_valid_fee(fee: Option<f64>) -> CoreResult<()> {
    match fee {
        Some(f) if !f.is_finite() || f < 0.0 => {
            Err(BookingError::validation("Fee must be a non-negative number."))
        }
        _ => Ok(()),
    }
}

fn ensure_time_order(start: Option<NaiveTime>, end: Option<NaiveTime>) -> CoreResult<()> {
    if let (Some(start), Some(end)) = (start, end) {
        if end <= start {
            return Err(BookingError::validation("End time must be after start time."));
        }
    }
    Ok(())
}
