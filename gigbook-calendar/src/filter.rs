//! Viewer-scoped booking visibility.
//!
//! On their own calendar a viewer sees what they sent and what they received,
//! subject to two toggles. On someone else's calendar a viewer only ever sees
//! their own requests to that person; other visitors' requests stay private.

use gigbook_booking::Booking;
use gigbook_shared::UserId;

/// Who is looking, and at whose calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarContext {
    pub viewer_id: UserId,
    pub calendar_owner_id: UserId,
}

impl CalendarContext {
    pub fn new(viewer_id: UserId, calendar_owner_id: UserId) -> Self {
        Self {
            viewer_id,
            calendar_owner_id,
        }
    }

    pub fn is_own_calendar(&self) -> bool {
        self.viewer_id == self.calendar_owner_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToggleKind {
    Sent,
    Received,
}

impl ToggleKind {
    pub fn label(&self, context: &CalendarContext, owner_name: &str) -> String {
        match (self, context.is_own_calendar()) {
            (ToggleKind::Sent, _) => "Bookings I have requested".to_string(),
            (ToggleKind::Received, true) => "Bookings requested of me".to_string(),
            (ToggleKind::Received, false) => format!("Bookings I am requesting of {}", owner_name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterToggles {
    pub include_sent: bool,
    pub include_received: bool,
}

impl Default for FilterToggles {
    fn default() -> Self {
        Self {
            include_sent: true,
            include_received: true,
        }
    }
}

impl FilterToggles {
    /// Toggle values for a freshly opened calendar.
    pub fn defaults(is_own_calendar: bool) -> Self {
        Self {
            include_sent: is_own_calendar,
            include_received: true,
        }
    }

    /// Toggles shown to the viewer. "Sent" has no meaning on another user's calendar.
    pub fn applicable(is_own_calendar: bool) -> &'static [ToggleKind] {
        if is_own_calendar {
            &[ToggleKind::Sent, ToggleKind::Received]
        } else {
            &[ToggleKind::Received]
        }
    }

    pub fn get(&self, kind: ToggleKind) -> bool {
        match kind {
            ToggleKind::Sent => self.include_sent,
            ToggleKind::Received => self.include_received,
        }
    }

    fn set(&mut self, kind: ToggleKind, on: bool) {
        match kind {
            ToggleKind::Sent => self.include_sent = on,
            ToggleKind::Received => self.include_received = on,
        }
    }
}

/// Pure visibility rule. Output preserves input order.
pub fn visible_bookings<'a>(
    bookings: &'a [Booking],
    context: CalendarContext,
    toggles: FilterToggles,
) -> Vec<&'a Booking> {
    let viewer = context.viewer_id;
    if context.is_own_calendar() {
        bookings
            .iter()
            .filter(|b| {
                (toggles.include_sent && b.requester_id == viewer)
                    || (toggles.include_received && b.recipient_id == viewer)
            })
            .collect()
    } else {
        let owner = context.calendar_owner_id;
        bookings
            .iter()
            .filter(|b| toggles.include_received && b.recipient_id == owner && b.requester_id == viewer)
            .collect()
    }
}

/// Filter state for one rendered calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingFilterView {
    context: CalendarContext,
    toggles: FilterToggles,
}

impl BookingFilterView {
    pub fn new(context: CalendarContext) -> Self {
        Self {
            context,
            toggles: FilterToggles::defaults(context.is_own_calendar()),
        }
    }

    pub fn context(&self) -> CalendarContext {
        self.context
    }

    pub fn toggles(&self) -> FilterToggles {
        self.toggles
    }

    /// Switch viewer or calendar. Toggles reset to the defaults for the new
    /// pair; returns whether anything changed.
    pub fn set_context(&mut self, context: CalendarContext) -> bool {
        if context == self.context {
            return false;
        }
        self.context = context;
        self.toggles = FilterToggles::defaults(context.is_own_calendar());
        true
    }

    pub fn applicable_toggles(&self) -> &'static [ToggleKind] {
        FilterToggles::applicable(self.context.is_own_calendar())
    }

    /// Returns false and does nothing for a toggle that is not shown.
    pub fn set_toggle(&mut self, kind: ToggleKind, on: bool) -> bool {
        if !self.applicable_toggles().contains(&kind) {
            return false;
        }
        self.toggles.set(kind, on);
        true
    }

    pub fn flip(&mut self, kind: ToggleKind) -> bool {
        let next = !self.toggles.get(kind);
        self.set_toggle(kind, next)
    }

    pub fn visible<'a>(&self, bookings: &'a [Booking]) -> Vec<&'a Booking> {
        visible_bookings(bookings, self.context, self.toggles)
    }
}
