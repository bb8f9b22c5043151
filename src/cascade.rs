//! Pure cascade decision logic.
//!
//! Editing one month start can leave a neighboring month with a length
//! outside of `29..=30`. The two functions here compute, without mutating
//! anything, the complete set of extra edits a proposed change forces before
//! the calendar re-stabilizes.

use lunar_table::MonthTable;

use crate::effective::EffectiveTable;
use crate::store::AdjustmentStore;

/// Length of the month ending at `offset`, on a trial table.
fn link_length(trial: &EffectiveTable, offset: i64) -> Option<i64> {
    Some(trial.start(offset)? - trial.start(offset - 1)?)
}

/// Compute the overrides that must also be removed if the override at
/// `offset` is removed.
///
/// Two independent walks run from `offset + 1` forward and `offset - 1`
/// backward, only over offsets that still carry an override. An override
/// whose month length turns invalid on the trial table is slated for removal,
/// which restores the baseline value at its slot, and the walk continues; the
/// first override that remains valid survives and stops its direction. The
/// result does not include `offset` itself.
pub(crate) fn removal_cascade(
    table: &MonthTable,
    adjustments: &AdjustmentStore,
    offset: i64,
) -> Vec<i64> {
    let mut remaining = adjustments.clone();
    remaining.remove(offset);

    let mut trial = EffectiveTable::merge(table, &remaining);
    let mut dropped = Vec::new();

    let mut drop_at = |trial: &mut EffectiveTable, remaining: &mut AdjustmentStore, noff: i64| {
        dropped.push(noff);
        remaining.remove(noff);

        if let Some(start) = table.start(noff) {
            trial.force(noff, start);
        }
    };

    let mut noff = offset + 1;
    while remaining.contains(noff) {
        match link_length(&trial, noff) {
            Some(length) if !(29..=30).contains(&length) => {
                drop_at(&mut trial, &mut remaining, noff);
                noff += 1;
            }
            _ => break,
        }
    }

    let mut noff = offset - 1;
    while remaining.contains(noff) {
        match link_length(&trial, noff + 1) {
            Some(length) if !(29..=30).contains(&length) => {
                drop_at(&mut trial, &mut remaining, noff);
                noff -= 1;
            }
            _ => break,
        }
    }

    dropped
}

/// Compute the starts that must also be forced if the month at `offset` is
/// forced to start on `value`.
///
/// The walk only goes forward: earlier months are already fixed, a new start
/// can only disturb later ones. It runs as long as the baseline defines
/// entries, so it may force brand-new overrides on offsets that carried none.
/// At each step the month length is clamped to the nearest legal boundary: a
/// too-short month is stretched to 29 days, a too-long one capped at 30, and
/// the first already-valid length stops the walk.
pub(crate) fn insertion_cascade(
    table: &MonthTable,
    adjustments: &AdjustmentStore,
    offset: i64,
    value: i64,
) -> Vec<(i64, i64)> {
    let mut trial = EffectiveTable::merge(table, adjustments);
    trial.force(offset, value);

    let mut forced = Vec::new();
    let mut noff = offset + 1;

    while table.contains(noff) {
        let Some(length) = link_length(&trial, noff) else {
            break;
        };

        let clamped = match length {
            ..=28 => 29,
            31.. => 30,
            _ => break,
        };

        let Some(prev) = trial.start(noff - 1) else {
            break;
        };

        forced.push((noff, prev + clamped));
        trial.force(noff, prev + clamped);
        noff += 1;
    }

    forced
}
