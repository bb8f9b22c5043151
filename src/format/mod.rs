//! A small date-format language rendering a day-count as mixed Hijri and
//! Gregorian text, after the format characters of `DateTime::format` in PHP:
//! `_`-prefixed characters select Hijri fields, bare characters Gregorian
//! ones, and `\` escapes a literal. The expression is parsed once into a
//! tagged token stream and can then be resolved against any calendar.

use chrono::Datelike;
use pest::Parser;

use lunar_table::mjd_to_date;

use crate::calendar::AdjustedCalendar;
use crate::error::{Error, Result};

#[derive(Parser)]
#[grammar = "format/grammar.pest"]
struct FormatParser;

/// English names of the Hijri months.
const MONTH_NAMES: [&str; 12] = [
    "Muharram",
    "Safar",
    "Rabi' al-Awwal",
    "Rabi' al-Thani",
    "Jumada al-Ula",
    "Jumada al-Akhirah",
    "Rajab",
    "Sha'ban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qi'dah",
    "Dhu al-Hijjah",
];

/// Three-letter abbreviations of the Hijri months.
const MONTH_NAMES_SHORT: [&str; 12] = [
    "Muh", "Saf", "Rb1", "Rb2", "Jm1", "Jm2", "Raj", "Sha", "Ram", "Shw", "Qid", "Hij",
];

/// A field of a calendar date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    /// `j`: day of the month, 1 to 31
    Day,
    /// `d`: day of the month, 01 to 31
    DayPadded,
    /// `n`: month number, 1 to 12
    Month,
    /// `m`: month number, 01 to 12
    MonthPadded,
    /// `F`: full month name
    MonthName,
    /// `M`: abbreviated month name
    MonthNameShort,
    /// `Y`: full year
    Year,
    /// `y`: two-digit year
    YearShort,
}

impl Field {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'j' => Some(Self::Day),
            'd' => Some(Self::DayPadded),
            'n' => Some(Self::Month),
            'm' => Some(Self::MonthPadded),
            'F' => Some(Self::MonthName),
            'M' => Some(Self::MonthNameShort),
            'Y' => Some(Self::Year),
            'y' => Some(Self::YearShort),
            _ => None,
        }
    }
}

/// One token of a parsed format expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Literal(String),
    Hijri(Field),
    Gregorian(Field),
}

/// A parsed date format expression.
///
/// ```
/// use hijri_adjust::format::DateFormat;
/// use hijri_adjust::AdjustedCalendar;
/// use lunar_table::MonthTable;
///
/// let table = MonthTable::new(1445, vec![57133, 57162, 57192, 57221]).unwrap();
/// let calendar = AdjustedCalendar::new(table);
///
/// let format = DateFormat::parse("_j _F _Y").unwrap();
/// assert_eq!(format.render(&calendar, 57135), Some("3 Muharram 1445".to_string()));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateFormat {
    tokens: Vec<Token>,
}

fn unexpected_token<T>(rule: Rule, parent: Rule) -> T {
    unreachable!("Grammar error: found `{rule:?}` inside of `{parent:?}`")
}

fn push_literal(tokens: &mut Vec<Token>, text: &str) {
    if text.is_empty() {
        return;
    }

    if let Some(Token::Literal(tail)) = tokens.last_mut() {
        tail.push_str(text);
    } else {
        tokens.push(Token::Literal(text.to_string()));
    }
}

impl DateFormat {
    /// Parse a format expression. Unknown field characters fall through as
    /// literal text.
    pub fn parse(input: &str) -> Result<Self> {
        let pairs = FormatParser::parse(Rule::format, input)
            .map_err(Error::from)?
            .next()
            .expect("grammar error: no format found")
            .into_inner();

        let mut tokens = Vec::new();

        for pair in pairs {
            match pair.as_rule() {
                Rule::escape => push_literal(&mut tokens, &pair.as_str()[1..]),
                Rule::hijri_field => {
                    let tail = &pair.as_str()[1..];

                    match tail.chars().next().and_then(Field::from_char) {
                        Some(field) => tokens.push(Token::Hijri(field)),
                        None => push_literal(&mut tokens, tail),
                    }
                }
                Rule::greg_field => match pair.as_str().chars().next().and_then(Field::from_char) {
                    Some(field) => tokens.push(Token::Gregorian(field)),
                    None => push_literal(&mut tokens, pair.as_str()),
                },
                Rule::literal => push_literal(&mut tokens, pair.as_str()),
                Rule::EOI => {}
                other => unexpected_token(other, Rule::format),
            }
        }

        Ok(Self { tokens })
    }

    /// The parsed token stream.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Render a day-count through this format, resolving Hijri fields
    /// against the calendar's effective table. Returns `None` when the
    /// day-count falls outside of the calendar or of representable Gregorian
    /// dates.
    pub fn render(&self, calendar: &AdjustedCalendar, mjd: i64) -> Option<String> {
        let hijri = calendar.hijri_date(mjd)?;
        let date = mjd_to_date(mjd)?;
        let mut out = String::new();

        for token in &self.tokens {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::Hijri(field) => {
                    let month0 = (hijri.month - 1) as usize;

                    match field {
                        Field::Day => out.push_str(&hijri.day.to_string()),
                        Field::DayPadded => out.push_str(&format!("{:02}", hijri.day)),
                        Field::Month => out.push_str(&hijri.month.to_string()),
                        Field::MonthPadded => out.push_str(&format!("{:02}", hijri.month)),
                        Field::MonthName => out.push_str(MONTH_NAMES[month0]),
                        Field::MonthNameShort => out.push_str(MONTH_NAMES_SHORT[month0]),
                        Field::Year => out.push_str(&hijri.year.to_string()),
                        Field::YearShort => {
                            out.push_str(&format!("{:02}", hijri.year.rem_euclid(100)))
                        }
                    }
                }
                Token::Gregorian(field) => match field {
                    Field::Day => out.push_str(&date.day().to_string()),
                    Field::DayPadded => out.push_str(&format!("{:02}", date.day())),
                    Field::Month => out.push_str(&date.month().to_string()),
                    Field::MonthPadded => out.push_str(&format!("{:02}", date.month())),
                    Field::MonthName => out.push_str(&date.format("%B").to_string()),
                    Field::MonthNameShort => out.push_str(&date.format("%b").to_string()),
                    Field::Year => out.push_str(&date.year().to_string()),
                    Field::YearShort => {
                        out.push_str(&format!("{:02}", date.year().rem_euclid(100)))
                    }
                },
            }
        }

        Some(out)
    }
}
