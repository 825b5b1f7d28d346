//! Time-of-day handling for the booking wire format.
//!
//! Times travel as `HH:MM`. Seconds are accepted on input and dropped on
//! output.

use chrono::NaiveTime;

pub const TIME_OF_DAY_FORMAT: &str = "%H:%M";

pub fn parse_time_of_day(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, TIME_OF_DAY_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
}

pub fn format_time_of_day(time: &NaiveTime) -> String {
    time.format(TIME_OF_DAY_FORMAT).to_string()
}

/// Serde adapter for `Option<NaiveTime>` fields. Blank strings read as absent.
pub mod optional_hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_some(&super::format_time_of_day(time)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            Some(s) if !s.trim().is_empty() => super::parse_time_of_day(&s)
                .map(Some)
                .map_err(|e| de::Error::custom(format!("invalid time of day '{}': {}", s, e))),
            _ => Ok(None),
        }
    }
}

/// Serde adapter for creation timestamps. Accepts RFC 3339 and naive
/// `YYYY-MM-DDTHH:MM:SS[.f]` values, the latter read as UTC.
pub mod utc_timestamp {
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(parsed.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| Utc.from_utc_datetime(&naive))
            .map_err(|e| de::Error::custom(format!("invalid timestamp '{}': {}", raw, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Slot {
        #[serde(default, with = "optional_hhmm")]
        start_time: Option<NaiveTime>,
    }

    #[test]
    fn test_parses_with_and_without_seconds() {
        assert_eq!(parse_time_of_day("18:00").unwrap(), NaiveTime::from_hms_opt(18, 0, 0).unwrap());
        assert_eq!(parse_time_of_day("21:30:00").unwrap(), NaiveTime::from_hms_opt(21, 30, 0).unwrap());
        assert!(parse_time_of_day("25:00").is_err());
    }

    #[test]
    fn test_optional_field() {
        let slot: Slot = serde_json::from_str(r#"{"start_time": "18:00"}"#).unwrap();
        assert_eq!(slot.start_time, NaiveTime::from_hms_opt(18, 0, 0));
        assert_eq!(serde_json::to_string(&slot).unwrap(), r#"{"start_time":"18:00"}"#);

        let missing: Slot = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.start_time, None);

        let null: Slot = serde_json::from_str(r#"{"start_time": null}"#).unwrap();
        assert_eq!(null.start_time, None);

        let blank: Slot = serde_json::from_str(r#"{"start_time": ""}"#).unwrap();
        assert_eq!(blank.start_time, None);
    }

    #[derive(Deserialize)]
    struct Stamp {
        #[serde(with = "utc_timestamp")]
        at: chrono::DateTime<chrono::Utc>,
    }

    #[test]
    fn test_timestamp_accepts_naive_and_offset_forms() {
        let naive: Stamp = serde_json::from_str(r#"{"at": "2025-03-01T09:30:00.123"}"#).unwrap();
        let offset: Stamp = serde_json::from_str(r#"{"at": "2025-03-01T10:30:00.123+01:00"}"#).unwrap();
        assert_eq!(naive.at, offset.at);
        assert!(serde_json::from_str::<Stamp>(r#"{"at": "yesterday"}"#).is_err());
    }
}
