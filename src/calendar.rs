use chrono::NaiveDate;

use lunar_table::{mjd_to_date, MonthTable};

use crate::cascade;
use crate::effective::EffectiveTable;
use crate::error::{Error, Result};
use crate::store::AdjustmentStore;

/// A Hijri date resolved against an adjusted calendar.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct HijriDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

/// An extra override that a proposed month start would force downstream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForcedAdjustment {
    pub month: u32,
    pub year: i32,
    /// Forced start of the month, as a Modified Julian Day.
    pub mjd: i64,
    /// Same day in the Gregorian calendar, when it is representable.
    pub date: Option<NaiveDate>,
}

/// One of the legal candidate starts of a Hijri month.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PossibleStart {
    /// Candidate start of the month, as a Modified Julian Day.
    pub mjd: i64,
    /// Same day in the Gregorian calendar, when it is representable.
    pub date: Option<NaiveDate>,
    /// Whether this candidate is the start currently in effect.
    pub current_set: bool,
    /// Overrides that picking this candidate would force on later months.
    pub also_adjusted: Vec<ForcedAdjustment>,
}

/// A live override reported by [`AdjustedCalendar::current_adjustments`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentAdjustment {
    pub month: u32,
    pub year: i32,
    /// Start of the month currently in effect, in the Gregorian calendar.
    pub current: NaiveDate,
    /// Start of the month in the unmodified baseline table.
    pub original: NaiveDate,
}

/// One editing session over a baseline month table and its adjustments.
///
/// The baseline is immutable for the lifetime of the session; every mutation
/// goes through a commit operation that resolves the full cascade it forces,
/// so the merged view always describes months of 29 or 30 days.
///
/// ```
/// use hijri_adjust::AdjustedCalendar;
/// use lunar_table::MonthTable;
///
/// let table = MonthTable::new(1445, vec![1000, 1029, 1059, 1088]).unwrap();
/// let mut calendar = AdjustedCalendar::new(table);
///
/// calendar.commit_insertion(2, 1445, 1030).unwrap();
/// assert_eq!(calendar.effective().start(1), Some(1030));
/// assert_eq!(calendar.snapshot(), r#"{"1":1030}"#);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdjustedCalendar {
    table: MonthTable,
    adjustments: AdjustmentStore,
    effective: EffectiveTable,
}

impl AdjustedCalendar {
    /// Start a session with no adjustment: the effective view equals the
    /// baseline.
    pub fn new(table: MonthTable) -> Self {
        Self::with_adjustments(table, AdjustmentStore::new())
    }

    /// Start a session from a previously decoded adjustment store.
    ///
    /// Overrides equal to their baseline value carry no information and are
    /// dropped, so that a snapshot produced by an older baseline keeps the
    /// store normalized.
    pub fn with_adjustments(table: MonthTable, mut adjustments: AdjustmentStore) -> Self {
        let redundant: Vec<i64> = adjustments
            .iter()
            .filter(|&(offset, value)| table.start(offset) == Some(value))
            .map(|(offset, _)| offset)
            .collect();

        for offset in redundant {
            #[cfg(feature = "log")]
            log::warn!("Dropping redundant adjustment at month offset {offset}");
            adjustments.remove(offset);
        }

        let effective = EffectiveTable::merge(&table, &adjustments);
        Self { table, adjustments, effective }
    }

    /// Start a session from a serialized adjustment snapshot.
    ///
    /// ```
    /// use hijri_adjust::AdjustedCalendar;
    /// use lunar_table::MonthTable;
    ///
    /// let table = MonthTable::new(1445, vec![1000, 1029, 1059, 1088]).unwrap();
    /// let calendar = AdjustedCalendar::from_snapshot(table, r#"{"1":1030}"#).unwrap();
    /// assert_eq!(calendar.effective().start(1), Some(1030));
    /// ```
    pub fn from_snapshot(table: MonthTable, snapshot: &str) -> Result<Self> {
        let adjustments = AdjustmentStore::from_snapshot(snapshot)?;
        Ok(Self::with_adjustments(table, adjustments))
    }

    /// The unmodified baseline table.
    pub fn table(&self) -> &MonthTable {
        &self.table
    }

    /// The current set of overrides.
    pub fn adjustments(&self) -> &AdjustmentStore {
        &self.adjustments
    }

    /// The baseline merged with the current overrides.
    pub fn effective(&self) -> &EffectiveTable {
        &self.effective
    }

    /// Encode the current overrides as a snapshot, entries sorted by value.
    pub fn snapshot(&self) -> String {
        self.adjustments.to_snapshot()
    }

    /// Resolve a (month, year) pair to its offset, rejecting anything the
    /// baseline does not cover.
    fn checked_offset(&self, month: u32, year: i32) -> Result<i64> {
        if !(1..=12).contains(&month) {
            return Err(Error::OutOfRange { month, year });
        }

        let offset = self.table.month_to_offset(month, year);

        if self.table.contains(offset) {
            Ok(offset)
        } else {
            Err(Error::OutOfRange { month, year })
        }
    }

    fn forced_adjustment(&self, offset: i64, mjd: i64) -> ForcedAdjustment {
        let (month, year) = self.table.offset_to_month(offset);

        ForcedAdjustment { month, year, mjd, date: mjd_to_date(mjd) }
    }

    /// Simulate forcing a month to start on `new_start` and report the
    /// overrides this would cascade onto later months, without committing
    /// anything.
    pub fn insertion_preview(
        &self,
        month: u32,
        year: i32,
        new_start: i64,
    ) -> Result<Vec<ForcedAdjustment>> {
        let offset = self.checked_offset(month, year)?;

        Ok(
            cascade::insertion_cascade(&self.table, &self.adjustments, offset, new_start)
                .into_iter()
                .map(|(noff, value)| self.forced_adjustment(noff, value))
                .collect(),
        )
    }

    /// Simulate deleting a month's override and report which neighboring
    /// overrides would have to be deleted with it, without committing
    /// anything.
    pub fn deletion_preview(&self, month: u32, year: i32) -> Result<Vec<(u32, i32)>> {
        let offset = self.checked_offset(month, year)?;

        Ok(
            cascade::removal_cascade(&self.table, &self.adjustments, offset)
                .into_iter()
                .map(|noff| self.table.offset_to_month(noff))
                .collect(),
        )
    }

    /// Force the month to start on `new_start` (a Modified Julian Day),
    /// committing the override together with every override it cascades.
    ///
    /// The proposal is rejected atomically when the targeted month is out of
    /// the tabulated range, or when the implied month length against the
    /// current start of the previous month is not 29 or 30 days.
    ///
    /// ```
    /// use hijri_adjust::{AdjustedCalendar, Error};
    /// use lunar_table::MonthTable;
    ///
    /// let table = MonthTable::new(1445, vec![1000, 1029, 1059, 1088]).unwrap();
    /// let mut calendar = AdjustedCalendar::new(table);
    ///
    /// // 1031 would make month 1/1445 last 31 days.
    /// assert!(matches!(
    ///     calendar.commit_insertion(2, 1445, 1031),
    ///     Err(Error::InvalidMonthLength { length: 31 }),
    /// ));
    ///
    /// calendar.commit_insertion(2, 1445, 1030).unwrap();
    /// assert_eq!(calendar.effective().start(1), Some(1030));
    /// ```
    pub fn commit_insertion(&mut self, month: u32, year: i32, new_start: i64) -> Result<()> {
        let offset = self.checked_offset(month, year)?;

        let prev = (offset.checked_sub(1))
            .and_then(|prev_offset| self.effective.start(prev_offset))
            .ok_or(Error::OutOfRange { month, year })?;

        let length = new_start - prev;

        if !(29..=30).contains(&length) {
            return Err(Error::InvalidMonthLength { length });
        }

        let forced = cascade::insertion_cascade(&self.table, &self.adjustments, offset, new_start);
        self.apply(std::iter::once((offset, new_start)).chain(forced));
        Ok(())
    }

    /// Delete the month's override, together with every neighboring override
    /// that can no longer stand without it.
    ///
    /// Past the range check this never fails: removing constraints only ever
    /// forces further removals, not rejections. Deleting a month that carries
    /// no override is a no-op.
    pub fn commit_deletion(&mut self, month: u32, year: i32) -> Result<()> {
        let offset = self.checked_offset(month, year)?;

        let dropped = cascade::removal_cascade(&self.table, &self.adjustments, offset);
        self.adjustments.remove(offset);

        for noff in dropped {
            self.adjustments.remove(noff);
        }

        self.effective = EffectiveTable::merge(&self.table, &self.adjustments);
        debug_assert!(self.effective.is_consistent());
        Ok(())
    }

    /// Commit a batch of overrides, pruning the ones equal to the baseline.
    fn apply(&mut self, entries: impl IntoIterator<Item = (i64, i64)>) {
        for (offset, value) in entries {
            if self.table.start(offset) == Some(value) {
                self.adjustments.remove(offset);
            } else {
                self.adjustments.set(offset, value);
            }
        }

        self.effective = EffectiveTable::merge(&self.table, &self.adjustments);
        debug_assert!(self.effective.is_consistent());
    }

    /// Enumerate the legal starts of a Hijri month: exactly the two
    /// day-counts 29 and 30 days after the effective start of the previous
    /// month, each with the downstream overrides it would force. Out of the
    /// tabulated range the result is empty.
    ///
    /// ```
    /// use hijri_adjust::AdjustedCalendar;
    /// use lunar_table::MonthTable;
    ///
    /// let table = MonthTable::new(1445, vec![1000, 1029, 1059, 1088]).unwrap();
    /// let calendar = AdjustedCalendar::new(table);
    ///
    /// let starts = calendar.possible_starts(2, 1445);
    /// assert_eq!(starts.len(), 2);
    /// assert_eq!(starts[0].mjd, 1029);
    /// assert!(starts[0].current_set);
    /// assert_eq!(starts[1].mjd, 1030);
    /// assert!(!starts[1].current_set);
    ///
    /// assert!(calendar.possible_starts(1, 1400).is_empty());
    /// ```
    pub fn possible_starts(&self, month: u32, year: i32) -> Vec<PossibleStart> {
        let Ok(offset) = self.checked_offset(month, year) else {
            return Vec::new();
        };

        let Some(prev) = (offset.checked_sub(1)).and_then(|prev| self.effective.start(prev))
        else {
            // The first tabulated month has no measurable length.
            return Vec::new();
        };

        let current = self.effective.start(offset);

        (29..=30)
            .map(|length| {
                let mjd = prev + length;

                let also_adjusted =
                    cascade::insertion_cascade(&self.table, &self.adjustments, offset, mjd)
                        .into_iter()
                        .map(|(noff, value)| self.forced_adjustment(noff, value))
                        .collect();

                PossibleStart {
                    mjd,
                    date: mjd_to_date(mjd),
                    current_set: current == Some(mjd),
                    also_adjusted,
                }
            })
            .collect()
    }

    /// Report every live override with its current and original Gregorian
    /// start dates.
    pub fn current_adjustments(&self) -> Vec<CurrentAdjustment> {
        self.adjustments
            .iter()
            .filter_map(|(offset, value)| {
                let (month, year) = self.table.offset_to_month(offset);
                let original = self.table.start(offset)?;

                Some(CurrentAdjustment {
                    month,
                    year,
                    current: mjd_to_date(value)?,
                    original: mjd_to_date(original)?,
                })
            })
            .collect()
    }

    /// Resolve a day-count to the Hijri date it falls on, according to the
    /// effective table.
    ///
    /// ```
    /// use hijri_adjust::{AdjustedCalendar, HijriDate};
    /// use lunar_table::MonthTable;
    ///
    /// let table = MonthTable::new(1445, vec![1000, 1029, 1059, 1088]).unwrap();
    /// let calendar = AdjustedCalendar::new(table);
    ///
    /// assert_eq!(
    ///     calendar.hijri_date(1058),
    ///     Some(HijriDate { year: 1445, month: 2, day: 30 }),
    /// );
    /// assert_eq!(calendar.hijri_date(999), None);
    /// ```
    pub fn hijri_date(&self, mjd: i64) -> Option<HijriDate> {
        let offset = self.effective.offset_at(mjd)?;
        let day = mjd - self.effective.start(offset)? + 1;

        // The last tabulated month covers at most 30 days.
        if day > 30 {
            return None;
        }

        let (month, year) = self.table.offset_to_month(offset);
        Some(HijriDate { year, month, day: day as u32 })
    }

    /// Resolve a Hijri date to its day-count, according to the effective
    /// table. The day is validated against the effective month length.
    ///
    /// ```
    /// use hijri_adjust::AdjustedCalendar;
    /// use lunar_table::MonthTable;
    ///
    /// let table = MonthTable::new(1445, vec![1000, 1029, 1059, 1088]).unwrap();
    /// let calendar = AdjustedCalendar::new(table);
    ///
    /// assert_eq!(calendar.hijri_to_mjd(1445, 1, 1), Some(1000));
    /// assert_eq!(calendar.hijri_to_mjd(1445, 1, 29), Some(1028));
    /// assert_eq!(calendar.hijri_to_mjd(1445, 1, 30), None);
    /// ```
    pub fn hijri_to_mjd(&self, year: i32, month: u32, day: u32) -> Option<i64> {
        if !(1..=12).contains(&month) {
            return None;
        }

        let offset = self.table.month_to_offset(month, year);
        let start = self.effective.start(offset)?;
        let length = self.effective.month_length(offset).unwrap_or(30);

        if !(1..=length as u32).contains(&day) {
            return None;
        }

        Some(start + i64::from(day) - 1)
    }
}
