use lunar_table::MonthTable;

use crate::tests::{full_calendar, uneven_calendar};
use crate::AdjustedCalendar;

#[test]
fn exactly_two_candidates_one_day_apart() {
    let calendar = uneven_calendar();

    for month in 2..=4 {
        let starts = calendar.possible_starts(month, 1445);
        assert_eq!(starts.len(), 2);
        assert_eq!(starts[1].mjd - starts[0].mjd, 1);

        let current: Vec<_> = starts.iter().filter(|start| start.current_set).collect();
        assert_eq!(current.len(), 1);
    }
}

#[test]
fn candidates_follow_the_effective_previous_start() {
    let mut calendar = uneven_calendar();

    let starts = calendar.possible_starts(3, 1445);
    assert_eq!((starts[0].mjd, starts[1].mjd), (1058, 1059));
    assert!(starts[1].current_set);

    // Moving month 2 moves the base the candidates are measured from.
    calendar.commit_insertion(2, 1445, 1030).unwrap();

    let starts = calendar.possible_starts(3, 1445);
    assert_eq!((starts[0].mjd, starts[1].mjd), (1059, 1060));
    assert!(starts[0].current_set);
}

#[test]
fn candidates_carry_their_forced_cascade() {
    let calendar = full_calendar();
    let starts = calendar.possible_starts(2, 1445);

    // The 29 day candidate forces the two following starts one day earlier.
    assert_eq!(starts[0].mjd, 1029);
    let forced: Vec<_> = (starts[0].also_adjusted.iter())
        .map(|adj| (adj.month, adj.year, adj.mjd))
        .collect();
    assert_eq!(forced, [(3, 1445, 1059), (4, 1445, 1089)]);

    // The 30 day candidate is the baseline itself and forces nothing.
    assert_eq!(starts[1].mjd, 1030);
    assert!(starts[1].current_set);
    assert!(starts[1].also_adjusted.is_empty());
}

#[test]
fn candidates_survive_unrepresentable_gregorian_dates() {
    // A valid table whose day-counts fall outside chrono's year range: the
    // candidates are still enumerated, only their Gregorian mirror is gone.
    let table = MonthTable::new(1445, vec![i64::MAX - 61, i64::MAX - 32, i64::MAX - 2]).unwrap();
    let calendar = AdjustedCalendar::new(table);

    let starts = calendar.possible_starts(2, 1445);
    assert_eq!(starts.len(), 2);
    assert!(starts.iter().all(|start| start.date.is_none()));

    assert!(uneven_calendar().possible_starts(2, 1445)[0].date.is_some());
}

#[test]
fn out_of_range_months_have_no_candidates() {
    let calendar = uneven_calendar();

    assert!(calendar.possible_starts(1, 1400).is_empty());
    assert!(calendar.possible_starts(5, 1445).is_empty());

    // The first tabulated month has no previous start to measure from.
    assert!(calendar.possible_starts(1, 1445).is_empty());
}

#[test]
fn current_adjustments_report_both_dates() {
    let mut calendar = uneven_calendar();
    calendar.commit_insertion(2, 1445, 1030).unwrap();

    let report = calendar.current_adjustments();
    assert_eq!(report.len(), 1);
    assert_eq!((report[0].month, report[0].year), (2, 1445));
    assert_eq!((report[0].current - report[0].original).num_days(), 1);
}
