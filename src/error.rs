use std::fmt;

use crate::format::Rule;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// The targeted month is not covered by the baseline table, or has no
    /// tabulated predecessor to measure a length against.
    OutOfRange { month: u32, year: i32 },
    /// The proposed month start is not exactly 29 or 30 days after the start
    /// of the previous month.
    InvalidMonthLength { length: i64 },
    /// An adjustment snapshot could not be decoded.
    Snapshot(serde_json::Error),
    /// A date format expression could not be parsed.
    Format(Box<pest::error::Error<Rule>>),
}

impl From<serde_json::Error> for Error {
    fn from(json_err: serde_json::Error) -> Self {
        Self::Snapshot(json_err)
    }
}

impl From<pest::error::Error<Rule>> for Error {
    fn from(pest_err: pest::error::Error<Rule>) -> Self {
        Self::Format(Box::new(pest_err))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { month, year } => {
                write!(f, "month {month}/{year} is out of the tabulated range")
            }
            Self::InvalidMonthLength { length } => {
                write!(f, "a month cannot be {length} days long: expected 29 or 30")
            }
            Self::Snapshot(json_err) => write!(f, "invalid adjustment snapshot: {json_err}"),
            Self::Format(pest_err) => write!(f, "{pest_err}"),
        }
    }
}

impl std::error::Error for Error {}
