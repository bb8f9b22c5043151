use lunar_table::MonthTable;

use crate::store::AdjustmentStore;

/// The calendar as seen by callers: the baseline table with every override
/// applied on top of it.
///
/// This is purely derived state. It is rebuilt whenever the adjustment store
/// changes, and the cascade walks mutate throw-away copies of it while
/// probing the consequences of a proposed edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectiveTable {
    starts: Vec<i64>,
}

impl EffectiveTable {
    /// Merge a baseline table with an adjustment store. Overrides outside of
    /// the baseline domain are ignored.
    pub(crate) fn merge(table: &MonthTable, adjustments: &AdjustmentStore) -> Self {
        let mut starts: Vec<i64> = table.iter().map(|(_, start)| start).collect();

        for (offset, value) in adjustments.iter() {
            if let Ok(index) = usize::try_from(offset) {
                if let Some(slot) = starts.get_mut(index) {
                    *slot = value;
                }
            }
        }

        Self { starts }
    }

    /// Number of covered months, identical to the baseline's.
    #[allow(clippy::len_without_is_empty)] // the baseline is never empty
    pub fn len(&self) -> i64 {
        self.starts.len() as i64
    }

    /// Check if a month offset is covered.
    pub fn contains(&self, offset: i64) -> bool {
        (0..self.len()).contains(&offset)
    }

    /// Get the effective day-count on which the month at the given offset
    /// starts.
    pub fn start(&self, offset: i64) -> Option<i64> {
        let index = usize::try_from(offset).ok()?;
        self.starts.get(index).copied()
    }

    /// Get the effective length in days of the month at the given offset.
    pub fn month_length(&self, offset: i64) -> Option<i64> {
        Some(self.start(offset + 1)? - self.start(offset)?)
    }

    /// Greatest covered offset whose month starts on or before the given
    /// day-count.
    pub fn offset_at(&self, day_count: i64) -> Option<i64> {
        let index = self.starts.partition_point(|&start| start <= day_count);
        index.checked_sub(1).map(|index| index as i64)
    }

    /// Overwrite one start in place. Only used on trial copies during a
    /// cascade walk; the committed table is always rebuilt with `merge`.
    pub(crate) fn force(&mut self, offset: i64, value: i64) {
        if let Ok(index) = usize::try_from(offset) {
            if let Some(slot) = self.starts.get_mut(index) {
                *slot = value;
            }
        }
    }

    /// Check that every adjacent pair of starts is 29 or 30 days apart.
    pub fn is_consistent(&self) -> bool {
        self.starts
            .windows(2)
            .all(|pair| (29..=30).contains(&(pair[1] - pair[0])))
    }

    /// Iterate over the `(offset, start)` pairs of the merged table.
    pub fn iter(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        (0..).zip(self.starts.iter().copied())
    }
}
