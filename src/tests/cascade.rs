use crate::cascade::{insertion_cascade, removal_cascade};
use crate::error::Error;
use crate::store::AdjustmentStore;
use crate::tests::{full_calendar, full_table, uneven_calendar, uneven_table};
use crate::AdjustedCalendar;

#[test]
fn insertion_stretches_short_months() {
    // Start month 1 (offset 1) one day before the next baseline start: every
    // following month collapses to 1 day and is stretched back to 29.
    let forced = insertion_cascade(&uneven_table(), &AdjustmentStore::new(), 1, 1058);
    assert_eq!(forced, [(2, 1087), (3, 1116)]);
}

#[test]
fn insertion_caps_long_months() {
    let forced = insertion_cascade(&uneven_table(), &AdjustmentStore::new(), 1, 1000);
    assert_eq!(forced, [(2, 1030), (3, 1060)]);
}

#[test]
fn insertion_stops_at_first_valid_length() {
    let forced = insertion_cascade(&uneven_table(), &AdjustmentStore::new(), 1, 1030);
    assert!(forced.is_empty());
}

#[test]
fn removal_drops_dependent_overrides_forward() {
    let mut store = AdjustmentStore::new();
    store.set(1, 1058);
    store.set(2, 1087);
    store.set(3, 1116);

    // Without the override at 1, the override at 2 implies a 58 day month,
    // and without 2, the one at 3 implies a 57 day month.
    assert_eq!(removal_cascade(&uneven_table(), &store, 1), [2, 3]);
}

#[test]
fn removal_spares_overrides_that_still_stand() {
    let mut store = AdjustmentStore::new();
    store.set(1, 1029);
    store.set(2, 1059);

    // Restoring the baseline at offset 1 leaves offset 2 with a 29 day
    // month, so its override survives and the walk stops there.
    assert!(removal_cascade(&full_table(), &store, 1).is_empty());
}

#[test]
fn removal_walks_backward_too() {
    let mut store = AdjustmentStore::new();
    store.set(1, 1029);
    store.set(2, 1059);
    store.set(3, 1089);

    // Restoring the baseline 1060 at offset 2 leaves the override at 1 with
    // a 31 day month behind it; the forward neighbour at 3 keeps a valid 29.
    assert_eq!(removal_cascade(&full_table(), &store, 2), [1]);
}

#[test]
fn commit_insertion_applies_the_whole_cascade() {
    let mut calendar = full_calendar();
    calendar.commit_insertion(2, 1445, 1029).unwrap();

    assert_eq!(
        calendar.adjustments().entries(),
        [(1, 1029), (2, 1059), (3, 1089)],
    );

    assert!(calendar.effective().is_consistent());
    assert_eq!(calendar.effective().start(3), Some(1089));
}

#[test]
fn commit_insertion_rejects_invalid_lengths_atomically() {
    let mut calendar = uneven_calendar();
    calendar.commit_insertion(2, 1445, 1030).unwrap();
    let before = calendar.clone();

    // 28 and 31 day months, measured against the *current* start of the
    // previous month.
    for bad_start in [1058, 1061] {
        assert!(matches!(
            calendar.commit_insertion(3, 1445, bad_start),
            Err(Error::InvalidMonthLength { .. }),
        ));

        assert_eq!(calendar, before);
    }
}

#[test]
fn commit_insertion_rejects_out_of_range_months() {
    let mut calendar = uneven_calendar();

    assert!(matches!(
        calendar.commit_insertion(1, 1400, 1000),
        Err(Error::OutOfRange { month: 1, year: 1400 }),
    ));

    // The first tabulated month has no predecessor to measure against.
    assert!(matches!(
        calendar.commit_insertion(1, 1445, 1001),
        Err(Error::OutOfRange { .. }),
    ));

    assert!(calendar.adjustments().is_empty());
}

#[test]
fn commit_insertion_prunes_overrides_equal_to_baseline() {
    let mut calendar = uneven_calendar();
    calendar.commit_insertion(2, 1445, 1030).unwrap();
    assert_eq!(calendar.adjustments().len(), 1);

    // Putting the start back on its baseline value must drop the override
    // instead of storing a redundant one.
    calendar.commit_insertion(2, 1445, 1029).unwrap();
    assert!(calendar.adjustments().is_empty());
}

#[test]
fn commit_deletion_restores_the_baseline() {
    let mut calendar = uneven_calendar();
    let before = calendar.clone();

    calendar.commit_insertion(2, 1445, 1030).unwrap();
    calendar.commit_deletion(2, 1445).unwrap();

    assert_eq!(calendar, before);
}

#[test]
fn commit_deletion_cascades_over_every_dependent_override() {
    let mut store = AdjustmentStore::new();
    store.set(1, 1058);
    store.set(2, 1087);
    store.set(3, 1116);

    let mut calendar = AdjustedCalendar::with_adjustments(uneven_table(), store);
    calendar.commit_deletion(2, 1445).unwrap();

    assert!(calendar.adjustments().is_empty());
    assert_eq!(calendar.effective(), AdjustedCalendar::new(uneven_table()).effective());
}

#[test]
fn commit_deletion_without_override_is_a_noop() {
    let mut calendar = uneven_calendar();
    calendar.commit_deletion(2, 1445).unwrap();
    assert!(calendar.adjustments().is_empty());
}

#[test]
fn commit_deletion_rejects_out_of_range_months() {
    let mut calendar = uneven_calendar();

    assert!(matches!(
        calendar.commit_deletion(5, 1446),
        Err(Error::OutOfRange { month: 5, year: 1446 }),
    ));
}

#[test]
fn deletion_preview_matches_the_commit() {
    let mut store = AdjustmentStore::new();
    store.set(1, 1058);
    store.set(2, 1087);
    store.set(3, 1116);

    let calendar = AdjustedCalendar::with_adjustments(uneven_table(), store);

    assert_eq!(
        calendar.deletion_preview(2, 1445).unwrap(),
        [(3, 1445), (4, 1445)],
    );
}

#[test]
fn insertion_preview_translates_forced_offsets() {
    let calendar = uneven_calendar();
    let forced = calendar.insertion_preview(2, 1445, 1058).unwrap();

    assert_eq!(forced.len(), 2);
    assert_eq!((forced[0].month, forced[0].year, forced[0].mjd), (3, 1445, 1087));
    assert_eq!((forced[1].month, forced[1].year, forced[1].mjd), (4, 1445, 1116));
}
