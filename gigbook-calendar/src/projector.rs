use crate::window::{CalendarView, Navigate, ViewWindow};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use gigbook_booking::{Booking, BookingStatus};
use gigbook_shared::BookingId;
use serde::Serialize;

/// Title used when a booking has no location.
pub const PLACEHOLDER_TITLE: &str = "Booking request";

/// Visual category of an event. Colours are a rendering concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusCategory {
    Pending,
    Confirmed,
    Declined,
    Withdrawn,
    Neutral,
}

impl From<BookingStatus> for StatusCategory {
    fn from(status: BookingStatus) -> Self {
        match status {
            BookingStatus::Requested => StatusCategory::Pending,
            BookingStatus::Accepted => StatusCategory::Confirmed,
            BookingStatus::Rejected => StatusCategory::Declined,
            BookingStatus::Cancelled => StatusCategory::Withdrawn,
        }
    }
}

impl StatusCategory {
    /// Category for a raw status label; anything unrecognised is neutral.
    pub fn from_label(label: &str) -> Self {
        label
            .parse::<BookingStatus>()
            .map(StatusCategory::from)
            .unwrap_or(StatusCategory::Neutral)
    }
}

/// One renderable calendar block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEvent {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub all_day: bool,
    pub category: StatusCategory,
    /// Lookup key only; never used to decide ownership.
    pub booking_id: BookingId,
}

impl CalendarEvent {
    pub fn from_booking(booking: &Booking) -> Self {
        let title = booking
            .location
            .as_deref()
            .map(str::trim)
            .filter(|location| !location.is_empty())
            .unwrap_or(PLACEHOLDER_TITLE)
            .to_string();

        let all_day = booking.is_all_day();
        let start_time = booking.start_time.unwrap_or_else(start_of_day);
        let end_time = if all_day {
            end_of_day()
        } else {
            booking.end_time.unwrap_or_else(end_of_day)
        };

        Self {
            title,
            start: booking.date.and_time(start_time),
            end: booking.date.and_time(end_time),
            all_day,
            category: StatusCategory::from(booking.status),
            booking_id: booking.id,
        }
    }
}

fn start_of_day() -> NaiveTime {
    NaiveTime::default()
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 0).unwrap_or_default()
}

/// Turns bookings into calendar events.
pub struct CalendarProjector;

impl CalendarProjector {
    /// One event per booking, ordered by start. Overlapping bookings are all kept.
    pub fn project(bookings: &[Booking], window: ViewWindow) -> Projection {
        let mut events: Vec<CalendarEvent> = bookings.iter().map(CalendarEvent::from_booking).collect();
        events.sort_by_key(|event| event.start);
        tracing::debug!(
            "Projected {} bookings for {:?} view around {}",
            events.len(),
            window.view,
            window.focus
        );
        Projection { window, events }
    }

    /// Day handed to the booking form when an empty slot is picked.
    pub fn select_slot(slot_start: NaiveDateTime) -> NaiveDate {
        slot_start.date()
    }
}

/// Events plus the window they are shown through.
///
/// Changing the window never touches the events.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    window: ViewWindow,
    events: Vec<CalendarEvent>,
}

impl Projection {
    pub fn window(&self) -> ViewWindow {
        self.window
    }

    /// Every projected event, visible or not.
    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    /// Events that fall inside the current window.
    pub fn visible(&self) -> impl Iterator<Item = &CalendarEvent> + '_ {
        let range = self.window.range();
        self.events
            .iter()
            .filter(move |event| range.intersects(event.start.date(), event.end.date()))
    }

    pub fn navigate(mut self, action: Navigate) -> Self {
        self.window = self.window.navigate(action);
        self
    }

    pub fn with_view(mut self, view: CalendarView) -> Self {
        self.window = self.window.with_view(view);
        self
    }

    /// The booking behind a clicked event.
    pub fn select_event<'a>(&self, booking_id: BookingId, bookings: &'a [Booking]) -> Option<&'a Booking> {
        self.events
            .iter()
            .find(|event| event.booking_id == booking_id)
            .and_then(|event| bookings.iter().find(|b| b.id == event.booking_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use gigbook_booking::NewBooking;
    use gigbook_shared::UserId;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn booking(id: i64, on: NaiveDate) -> Booking {
        NewBooking::new(UserId(2), on).into_booking(BookingId::Assigned(id), UserId(1), Utc::now())
    }

    fn timed(id: i64, on: NaiveDate, start: NaiveTime, end: Option<NaiveTime>) -> Booking {
        NewBooking::new(UserId(2), on)
            .with_times(start, end)
            .with_location("Club Nine")
            .into_booking(BookingId::Assigned(id), UserId(1), Utc::now())
    }

    #[test]
    fn test_all_day_booking() {
        let b = booking(1, date(2025, 3, 10));
        let event = CalendarEvent::from_booking(&b);
        assert!(event.all_day);
        assert_eq!(event.start, date(2025, 3, 10).and_time(time(0, 0)));
        assert_eq!(event.end, date(2025, 3, 10).and_time(time(23, 59)));
        assert_eq!(event.title, PLACEHOLDER_TITLE);
        assert_eq!(event.category, StatusCategory::Pending);
        assert_eq!(event.booking_id, BookingId::Assigned(1));
    }

    #[test]
    fn test_timed_booking() {
        let b = timed(2, date(2025, 3, 10), time(18, 0), Some(time(21, 0)));
        let event = CalendarEvent::from_booking(&b);
        assert!(!event.all_day);
        assert_eq!(event.title, "Club Nine");
        assert_eq!(event.start, date(2025, 3, 10).and_time(time(18, 0)));
        assert_eq!(event.end, date(2025, 3, 10).and_time(time(21, 0)));

        let open_ended = timed(3, date(2025, 3, 10), time(18, 0), None);
        assert_eq!(
            CalendarEvent::from_booking(&open_ended).end,
            date(2025, 3, 10).and_time(time(23, 59))
        );
    }

    #[test]
    fn test_blank_location_uses_placeholder() {
        let mut b = booking(1, date(2025, 3, 10));
        b.location = Some("  ".to_string());
        assert_eq!(CalendarEvent::from_booking(&b).title, PLACEHOLDER_TITLE);
    }

    #[test]
    fn test_one_event_per_booking_including_overlaps() {
        let day = date(2025, 3, 10);
        let bookings = vec![
            timed(1, day, time(20, 0), Some(time(23, 0))),
            timed(2, day, time(18, 0), Some(time(21, 0))),
            timed(3, day, time(18, 0), Some(time(21, 0))),
            booking(4, date(2025, 5, 1)),
        ];
        let projection = CalendarProjector::project(&bookings, ViewWindow::new(CalendarView::Month, day));

        assert_eq!(projection.events().len(), bookings.len());
        for b in &bookings {
            assert_eq!(
                projection.events().iter().filter(|e| e.booking_id == b.id).count(),
                1
            );
        }
        let order: Vec<BookingId> = projection.events().iter().map(|e| e.booking_id).collect();
        assert_eq!(
            order,
            vec![
                BookingId::Assigned(2),
                BookingId::Assigned(3),
                BookingId::Assigned(1),
                BookingId::Assigned(4)
            ]
        );
    }

    #[test]
    fn test_navigation_keeps_events() {
        let bookings = vec![booking(1, date(2025, 3, 10)), booking(2, date(2025, 4, 15))];
        let projection = CalendarProjector::project(
            &bookings,
            ViewWindow::new(CalendarView::Month, date(2025, 3, 1)),
        );
        let march: Vec<BookingId> = projection.visible().map(|e| e.booking_id).collect();
        assert_eq!(march, vec![BookingId::Assigned(1)]);

        let events_before = projection.events().to_vec();
        let april = projection.navigate(Navigate::Next);
        assert_eq!(april.events(), events_before.as_slice());
        let visible: Vec<BookingId> = april.visible().map(|e| e.booking_id).collect();
        assert_eq!(visible, vec![BookingId::Assigned(2)]);

        let back = april.navigate(Navigate::Previous).with_view(CalendarView::Week);
        assert_eq!(back.events(), events_before.as_slice());
        assert_eq!(back.visible().count(), 0);
    }

    #[test]
    fn test_status_categories() {
        let categories: Vec<StatusCategory> =
            BookingStatus::ALL.into_iter().map(StatusCategory::from).collect();
        for (i, a) in categories.iter().enumerate() {
            assert_ne!(*a, StatusCategory::Neutral);
            for b in &categories[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(StatusCategory::from_label("accepted"), StatusCategory::Confirmed);
        assert_eq!(StatusCategory::from_label("on-hold"), StatusCategory::Neutral);
    }

    #[test]
    fn test_selection() {
        let bookings = vec![booking(1, date(2025, 3, 10)), booking(2, date(2025, 3, 11))];
        let projection = CalendarProjector::project(
            &bookings,
            ViewWindow::new(CalendarView::Week, date(2025, 3, 10)),
        );
        let picked = projection.select_event(BookingId::Assigned(2), &bookings).unwrap();
        assert_eq!(picked, &bookings[1]);
        assert!(projection.select_event(BookingId::Assigned(9), &bookings).is_none());

        let slot = date(2025, 3, 12).and_time(time(14, 30));
        assert_eq!(CalendarProjector::select_slot(slot), date(2025, 3, 12));
    }
}
