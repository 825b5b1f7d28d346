use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a user, as issued by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Identifier of a booking.
///
/// The server assigns numeric ids. While a create request is in flight the
/// client holds the record under a provisional id that the server never sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookingId {
    Assigned(i64),
    Provisional(Uuid),
}

impl BookingId {
    pub fn provisional() -> Self {
        BookingId::Provisional(Uuid::new_v4())
    }

    pub fn is_provisional(&self) -> bool {
        matches!(self, BookingId::Provisional(_))
    }

    /// Server id, if one has been assigned.
    pub fn assigned(&self) -> Option<i64> {
        match self {
            BookingId::Assigned(id) => Some(*id),
            BookingId::Provisional(_) => None,
        }
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingId::Assigned(id) => write!(f, "{}", id),
            BookingId::Provisional(tmp) => write!(f, "tmp-{}", tmp),
        }
    }
}
