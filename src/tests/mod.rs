mod candidates;
mod cascade;
mod format;

use lunar_table::MonthTable;

use crate::AdjustedCalendar;

/// Four month starts with lengths 29, 30, 29.
pub(crate) fn uneven_table() -> MonthTable {
    MonthTable::new(1445, vec![1000, 1029, 1059, 1088]).unwrap()
}

/// Four month starts with all lengths 30, so that any early start cascades.
pub(crate) fn full_table() -> MonthTable {
    MonthTable::new(1445, vec![1000, 1030, 1060, 1090]).unwrap()
}

pub(crate) fn uneven_calendar() -> AdjustedCalendar {
    AdjustedCalendar::new(uneven_table())
}

pub(crate) fn full_calendar() -> AdjustedCalendar {
    AdjustedCalendar::new(full_table())
}
