use lunar_table::MonthTable;

use crate::format::{DateFormat, Field, Token};
use crate::AdjustedCalendar;

/// A table where the second month starts on MJD 0, i.e. 1858-11-17.
fn epoch_calendar() -> AdjustedCalendar {
    AdjustedCalendar::new(MonthTable::new(1275, vec![-30, 0, 29]).unwrap())
}

#[test]
fn parses_into_tagged_tokens() {
    let format = DateFormat::parse("_j _F _Y").unwrap();

    assert_eq!(
        format.tokens(),
        [
            Token::Hijri(Field::Day),
            Token::Literal(" ".to_string()),
            Token::Hijri(Field::MonthName),
            Token::Literal(" ".to_string()),
            Token::Hijri(Field::Year),
        ],
    );
}

#[test]
fn escaped_characters_are_literal() {
    let format = DateFormat::parse(r"\_j").unwrap();

    assert_eq!(
        format.tokens(),
        [Token::Literal("_".to_string()), Token::Gregorian(Field::Day)],
    );
}

#[test]
fn trailing_escape_is_dropped() {
    let format = DateFormat::parse("j\\").unwrap();

    assert_eq!(format.tokens(), [Token::Gregorian(Field::Day)]);
}

#[test]
fn unknown_field_characters_fall_through() {
    let format = DateFormat::parse("_q at 10").unwrap();

    // `q`, `a` and `t` are not fields: everything collapses to literal text.
    assert_eq!(format.tokens(), [Token::Literal("q at 10".to_string())]);
}

#[test]
fn renders_hijri_fields() {
    let calendar = epoch_calendar();
    let format = DateFormat::parse("_d/_m/_Y (_M)").unwrap();

    assert_eq!(format.render(&calendar, 2), Some("03/02/1275 (Saf)".to_string()));
}

#[test]
fn renders_gregorian_fields() {
    let calendar = epoch_calendar();
    let format = DateFormat::parse("j F Y").unwrap();

    assert_eq!(format.render(&calendar, 0), Some("17 November 1858".to_string()));
}

#[test]
fn renders_mixed_fields() {
    let calendar = epoch_calendar();
    let format = DateFormat::parse("_j _M = d/m/Y").unwrap();

    assert_eq!(format.render(&calendar, 0), Some("1 Saf = 17/11/1858".to_string()));
}

#[test]
fn render_fails_outside_of_the_table() {
    let calendar = epoch_calendar();
    let format = DateFormat::parse("_j").unwrap();

    assert_eq!(format.render(&calendar, -31), None);
    assert_eq!(format.render(&calendar, 59), None);
}
