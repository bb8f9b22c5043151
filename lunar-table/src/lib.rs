#![doc = include_str!("../README.md")]

use std::{fmt, io};

use chrono::{Datelike, NaiveDate};

/// Number of days between 0001-01-01 CE (day 1 for chrono) and the Modified
/// Julian Day epoch, 1858-11-17.
const MJD_DAYS_FROM_CE: i64 = 678_576;

/// Convert a Modified Julian Day to a Gregorian date.
///
/// Returns `None` when the day-count falls outside of the range of dates
/// representable by [`chrono::NaiveDate`].
///
/// ```
/// use chrono::NaiveDate;
/// use lunar_table::mjd_to_date;
///
/// assert_eq!(mjd_to_date(0), NaiveDate::from_ymd_opt(1858, 11, 17));
/// assert_eq!(mjd_to_date(1), NaiveDate::from_ymd_opt(1858, 11, 18));
/// assert_eq!(mjd_to_date(i64::MAX), None);
/// ```
pub fn mjd_to_date(mjd: i64) -> Option<NaiveDate> {
    let days_from_ce = i32::try_from(mjd.checked_add(MJD_DAYS_FROM_CE)?).ok()?;
    NaiveDate::from_num_days_from_ce_opt(days_from_ce)
}

/// Convert a Gregorian date to a Modified Julian Day.
///
/// ```
/// use chrono::NaiveDate;
/// use lunar_table::{date_to_mjd, mjd_to_date};
///
/// let date = NaiveDate::from_ymd_opt(1858, 11, 17).unwrap();
/// assert_eq!(date_to_mjd(date), 0);
/// assert_eq!(mjd_to_date(date_to_mjd(date)), Some(date));
/// ```
pub fn date_to_mjd(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce()) - MJD_DAYS_FROM_CE
}

/// An error emitted when constructing an inconsistent [`MonthTable`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableError {
    /// The table contains no month start at all.
    Empty,
    /// Two adjacent month starts are less than 29 or more than 30 days apart.
    InvalidLength { offset: i64, length: i64 },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "month table is empty"),
            Self::InvalidLength { offset, length } => {
                write!(f, "month at offset {offset} is {length} days long")
            }
        }
    }
}

impl std::error::Error for TableError {}

/// An immutable table of lunar month starts.
///
/// Each entry is the Modified Julian Day on which a month begins. Entries are
/// indexed by *offset*: offset 0 is the first month (Muharram) of
/// `first_year`, and each following offset is the next month. The table is
/// guaranteed to only describe months of 29 or 30 days.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct MonthTable {
    first_year: i32,
    starts: Vec<i64>,
}

impl MonthTable {
    /// Build a table from the first tabulated (lunar) year and the list of
    /// month-start day-counts. Fail if the table is empty or if any pair of
    /// adjacent starts is not 29 or 30 days apart.
    ///
    /// ```
    /// use lunar_table::{MonthTable, TableError};
    ///
    /// assert!(MonthTable::new(1445, vec![1000, 1029, 1059]).is_ok());
    /// assert_eq!(MonthTable::new(1445, vec![]), Err(TableError::Empty));
    ///
    /// assert_eq!(
    ///     MonthTable::new(1445, vec![1000, 1031]),
    ///     Err(TableError::InvalidLength { offset: 0, length: 31 }),
    /// );
    /// ```
    pub fn new(first_year: i32, starts: Vec<i64>) -> Result<Self, TableError> {
        if starts.is_empty() {
            return Err(TableError::Empty);
        }

        for (offset, pair) in starts.windows(2).enumerate() {
            let length = pair[1] - pair[0];

            if !(29..=30).contains(&length) {
                return Err(TableError::InvalidLength { offset: offset as i64, length });
            }
        }

        Ok(Self { first_year, starts })
    }

    /// The first tabulated year.
    ///
    /// ```
    /// use lunar_table::MonthTable;
    ///
    /// let table = MonthTable::new(1445, vec![1000, 1029]).unwrap();
    /// assert_eq!(table.first_year(), 1445);
    /// ```
    pub fn first_year(&self) -> i32 {
        self.first_year
    }

    /// Number of tabulated months.
    ///
    /// ```
    /// use lunar_table::MonthTable;
    ///
    /// let table = MonthTable::new(1445, vec![1000, 1029, 1059]).unwrap();
    /// assert_eq!(table.len(), 3);
    /// ```
    #[allow(clippy::len_without_is_empty)] // a table is never empty
    pub fn len(&self) -> i64 {
        self.starts.len() as i64
    }

    /// Check if a month offset is covered by this table.
    ///
    /// ```
    /// use lunar_table::MonthTable;
    ///
    /// let table = MonthTable::new(1445, vec![1000, 1029, 1059]).unwrap();
    /// assert!(table.contains(0));
    /// assert!(table.contains(2));
    /// assert!(!table.contains(3));
    /// assert!(!table.contains(-1));
    /// ```
    pub fn contains(&self, offset: i64) -> bool {
        (0..self.len()).contains(&offset)
    }

    /// Get the day-count on which the month at the given offset starts.
    ///
    /// ```
    /// use lunar_table::MonthTable;
    ///
    /// let table = MonthTable::new(1445, vec![1000, 1029, 1059]).unwrap();
    /// assert_eq!(table.start(1), Some(1029));
    /// assert_eq!(table.start(3), None);
    /// ```
    pub fn start(&self, offset: i64) -> Option<i64> {
        let index = usize::try_from(offset).ok()?;
        self.starts.get(index).copied()
    }

    /// Get the length in days of the month at the given offset. The length of
    /// the last tabulated month is unknown since the start of the month that
    /// follows it is not.
    ///
    /// ```
    /// use lunar_table::MonthTable;
    ///
    /// let table = MonthTable::new(1445, vec![1000, 1029, 1059]).unwrap();
    /// assert_eq!(table.month_length(0), Some(29));
    /// assert_eq!(table.month_length(1), Some(30));
    /// assert_eq!(table.month_length(2), None);
    /// ```
    pub fn month_length(&self, offset: i64) -> Option<i64> {
        Some(self.start(offset + 1)? - self.start(offset)?)
    }

    /// Convert a (month, year) pair to its offset. The result may fall
    /// outside of the table, which [`MonthTable::contains`] can check.
    ///
    /// ```
    /// use lunar_table::MonthTable;
    ///
    /// let table = MonthTable::new(1445, vec![1000, 1029, 1059]).unwrap();
    /// assert_eq!(table.month_to_offset(1, 1445), 0);
    /// assert_eq!(table.month_to_offset(1, 1446), 12);
    /// assert_eq!(table.month_to_offset(12, 1444), -1);
    /// ```
    pub fn month_to_offset(&self, month: u32, year: i32) -> i64 {
        assert!((1..=12).contains(&month));
        i64::from(year - self.first_year) * 12 + i64::from(month) - 1
    }

    /// Convert an offset back to its (month, year) pair. This is the inverse
    /// of [`MonthTable::month_to_offset`] over the whole offset range.
    ///
    /// ```
    /// use lunar_table::MonthTable;
    ///
    /// let table = MonthTable::new(1445, vec![1000, 1029, 1059]).unwrap();
    /// assert_eq!(table.offset_to_month(1), (2, 1445));
    /// assert_eq!(table.offset_to_month(12), (1, 1446));
    /// assert_eq!(table.offset_to_month(-1), (12, 1444));
    /// ```
    pub fn offset_to_month(&self, offset: i64) -> (u32, i32) {
        let month = offset.rem_euclid(12) as u32 + 1;
        let year = self.first_year + offset.div_euclid(12) as i32;
        (month, year)
    }

    /// Iterate over the `(offset, start)` pairs of the table.
    ///
    /// ```
    /// use lunar_table::MonthTable;
    ///
    /// let table = MonthTable::new(1445, vec![1000, 1029]).unwrap();
    /// let entries: Vec<_> = table.iter().collect();
    /// assert_eq!(entries, [(0, 1000), (1, 1029)]);
    /// ```
    pub fn iter(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        (0..).zip(self.starts.iter().copied())
    }

    /// Serialize this table into a writer.
    ///
    /// ```
    /// use lunar_table::MonthTable;
    ///
    /// let table = MonthTable::new(1445, vec![1000, 1029]).unwrap();
    /// let mut buf = Vec::new();
    /// table.serialize(&mut buf).unwrap();
    /// assert!(!buf.is_empty());
    /// ```
    pub fn serialize(&self, mut writer: impl io::Write) -> io::Result<()> {
        writer.write_all(&self.first_year.to_ne_bytes())?;
        writer.write_all(&self.starts.len().to_ne_bytes())?;

        for start in &self.starts {
            writer.write_all(&start.to_ne_bytes())?;
        }

        Ok(())
    }

    /// Deserialize a table from a reader. The 29/30 day invariant is checked
    /// again, so this can never build an inconsistent table.
    ///
    /// ```
    /// use lunar_table::MonthTable;
    ///
    /// let table1 = MonthTable::new(1445, vec![1000, 1029, 1059]).unwrap();
    ///
    /// let mut buf = Vec::new();
    /// table1.serialize(&mut buf).unwrap();
    ///
    /// let table2 = MonthTable::deserialize(buf.as_slice()).unwrap();
    /// assert_eq!(table1, table2);
    /// ```
    pub fn deserialize(mut reader: impl io::Read) -> io::Result<Self> {
        let first_year = {
            let mut buf = [0; std::mem::size_of::<i32>()];
            reader.read_exact(&mut buf)?;
            i32::from_ne_bytes(buf)
        };

        let length = {
            let mut buf = [0; std::mem::size_of::<usize>()];
            reader.read_exact(&mut buf)?;
            usize::from_ne_bytes(buf)
        };

        let starts = (0..length)
            .map(|_| {
                let mut buf = [0; std::mem::size_of::<i64>()];
                reader.read_exact(&mut buf)?;
                Ok(i64::from_ne_bytes(buf))
            })
            .collect::<io::Result<_>>()?;

        Self::new(first_year, starts)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }
}

impl fmt::Debug for MonthTable {
    /// ```
    /// use lunar_table::MonthTable;
    ///
    /// let table = MonthTable::new(1445, vec![1000, 1029]).unwrap();
    ///
    /// assert_eq!(
    ///     format!("{table:?}"),
    ///     "MonthTable { first_year: 1445, months: 2, starts: 1000..=1029 }",
    /// );
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct DebugStarts<'a>(&'a [i64]);

        impl fmt::Debug for DebugStarts<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}..={}", self.0.first().unwrap(), self.0.last().unwrap())
            }
        }

        f.debug_struct("MonthTable")
            .field("first_year", &self.first_year)
            .field("months", &self.starts.len())
            .field("starts", &DebugStarts(&self.starts))
            .finish()
    }
}
