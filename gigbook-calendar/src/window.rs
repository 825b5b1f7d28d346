use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    #[default]
    Month,
    Week,
    Day,
}

/// Toolbar navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigate {
    Previous,
    Next,
    /// Jump back to the given "today".
    Today(NaiveDate),
    Date(NaiveDate),
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Whether `[from, to]` shares at least one day with this range.
    pub fn intersects(&self, from: NaiveDate, to: NaiveDate) -> bool {
        let (from, to) = if from <= to { (from, to) } else { (to, from) };
        from <= self.end && to >= self.start
    }
}

/// The displayed calendar range, derived entirely from the view and a focus date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewWindow {
    pub view: CalendarView,
    pub focus: NaiveDate,
    pub week_start: Weekday,
}

impl ViewWindow {
    pub fn new(view: CalendarView, focus: NaiveDate) -> Self {
        Self {
            view,
            focus,
            week_start: Weekday::Sun,
        }
    }

    pub fn with_week_start(mut self, week_start: Weekday) -> Self {
        self.week_start = week_start;
        self
    }

    /// Switch view, keeping the focus date.
    pub fn with_view(mut self, view: CalendarView) -> Self {
        self.view = view;
        self
    }

    pub fn navigate(mut self, action: Navigate) -> Self {
        self.focus = match action {
            Navigate::Today(today) => today,
            Navigate::Date(date) => date,
            Navigate::Previous => self.step_back(),
            Navigate::Next => self.step_forward(),
        };
        self
    }

    /// Visible days. Month views are padded to whole weeks.
    pub fn range(&self) -> DateRange {
        match self.view {
            CalendarView::Day => DateRange {
                start: self.focus,
                end: self.focus,
            },
            CalendarView::Week => DateRange {
                start: self.week_first_day(self.focus),
                end: self.week_last_day(self.focus),
            },
            CalendarView::Month => {
                let first = self.focus.with_day(1).unwrap_or(self.focus);
                let last = first
                    .checked_add_months(Months::new(1))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(self.focus);
                DateRange {
                    start: self.week_first_day(first),
                    end: self.week_last_day(last),
                }
            }
        }
    }

    /// Weeks that run past the representable calendar are cut at its edge.
    fn week_first_day(&self, date: NaiveDate) -> NaiveDate {
        date.week(self.week_start)
            .checked_first_day()
            .unwrap_or(NaiveDate::MIN)
    }

    fn week_last_day(&self, date: NaiveDate) -> NaiveDate {
        date.week(self.week_start)
            .checked_last_day()
            .unwrap_or(NaiveDate::MAX)
    }

    fn step_back(&self) -> NaiveDate {
        let stepped = match self.view {
            CalendarView::Month => self.focus.checked_sub_months(Months::new(1)),
            CalendarView::Week => self.focus.checked_sub_days(Days::new(7)),
            CalendarView::Day => self.focus.checked_sub_days(Days::new(1)),
        };
        stepped.unwrap_or(self.focus)
    }

    fn step_forward(&self) -> NaiveDate {
        let stepped = match self.view {
            CalendarView::Month => self.focus.checked_add_months(Months::new(1)),
            CalendarView::Week => self.focus.checked_add_days(Days::new(7)),
            CalendarView::Day => self.focus.checked_add_days(Days::new(1)),
        };
        stepped.unwrap_or(self.focus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_range_is_padded_to_weeks() {
        let window = ViewWindow::new(CalendarView::Month, date(2025, 3, 10));
        let range = window.range();
        assert_eq!(range.start, date(2025, 2, 23));
        assert_eq!(range.end, date(2025, 4, 5));
    }

    #[test]
    fn test_week_range_respects_week_start() {
        let sunday_first = ViewWindow::new(CalendarView::Week, date(2025, 3, 10));
        assert_eq!(
            sunday_first.range(),
            DateRange { start: date(2025, 3, 9), end: date(2025, 3, 15) }
        );

        let monday_first = sunday_first.with_week_start(Weekday::Mon);
        assert_eq!(
            monday_first.range(),
            DateRange { start: date(2025, 3, 10), end: date(2025, 3, 16) }
        );
    }

    #[test]
    fn test_range_at_calendar_edges() {
        let last = ViewWindow::new(CalendarView::Week, NaiveDate::MAX);
        assert_eq!(last.range().end, NaiveDate::MAX);
        assert!(last.range().contains(NaiveDate::MAX));

        let month = last.with_view(CalendarView::Month);
        assert_eq!(month.range().end, NaiveDate::MAX);

        let first = ViewWindow::new(CalendarView::Month, NaiveDate::MIN);
        assert_eq!(first.range().start, NaiveDate::MIN);
        assert_eq!(first.with_view(CalendarView::Week).range().start, NaiveDate::MIN);

        // Stepping past the edge keeps the focus.
        assert_eq!(last.navigate(Navigate::Next).focus, NaiveDate::MAX);
        assert_eq!(first.navigate(Navigate::Previous).focus, NaiveDate::MIN);
    }

    #[test]
    fn test_navigation() {
        let window = ViewWindow::new(CalendarView::Month, date(2025, 1, 31));
        assert_eq!(window.navigate(Navigate::Next).focus, date(2025, 2, 28));
        assert_eq!(window.navigate(Navigate::Previous).focus, date(2024, 12, 31));

        let week = window.with_view(CalendarView::Week);
        assert_eq!(week.focus, date(2025, 1, 31));
        assert_eq!(week.navigate(Navigate::Next).focus, date(2025, 2, 7));

        let day = window.with_view(CalendarView::Day);
        assert_eq!(day.navigate(Navigate::Previous).focus, date(2025, 1, 30));

        let jumped = window.navigate(Navigate::Date(date(2026, 6, 1)));
        assert_eq!(jumped.focus, date(2026, 6, 1));
        assert_eq!(jumped.navigate(Navigate::Today(date(2025, 3, 10))).focus, date(2025, 3, 10));
    }

    #[test]
    fn test_range_intersection() {
        let range = DateRange { start: date(2025, 3, 9), end: date(2025, 3, 15) };
        assert!(range.contains(date(2025, 3, 9)));
        assert!(!range.contains(date(2025, 3, 16)));
        assert!(range.intersects(date(2025, 3, 1), date(2025, 3, 9)));
        assert!(!range.intersects(date(2025, 3, 16), date(2025, 3, 20)));
    }
}
