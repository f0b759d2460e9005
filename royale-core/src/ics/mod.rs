//! ICS calendar parsing.

mod parse;

pub use parse::parse_calendar;
