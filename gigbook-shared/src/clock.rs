use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};

/// Source of "now" and of the local calendar day.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Local calendar day used for past-date validation.
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
    today: NaiveDate,
}

impl FixedClock {
    /// Noon UTC on `date`, with `date` as the local day.
    pub fn on(date: NaiveDate) -> Self {
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default();
        Self {
            now: Utc.from_utc_datetime(&date.and_time(noon)),
            today: date,
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}
