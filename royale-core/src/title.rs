//! Course metadata extraction from event titles.
//!
//! Titles like "CMPSC 221 - LEC" follow one institution's naming
//! convention, so the interpretation is a pluggable capability with an
//! explicit fallback rather than a hardcoded rule.

use once_cell::sync::Lazy;
use regex::Regex;

/// Course type used when a title does not match any known pattern.
pub const FALLBACK_COURSE_TYPE: &str = "Class";

/// Course metadata derived from an event title.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseTitle {
    /// e.g. "CMPSC 221", or the raw title when unparsed.
    pub code: String,
    /// e.g. "LEC", or [`FALLBACK_COURSE_TYPE`] when unparsed.
    pub kind: String,
}

/// Strategy for deriving course metadata from a free-text title.
pub trait TitleInterpreter {
    fn interpret(&self, title: &str) -> CourseTitle;
}

static COURSE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z]+)\s+(\d+[A-Z]?)\s*-\s*(.+)$").expect("course pattern is valid")
});

/// Default interpreter: `SUBJECT NUMBER - TYPE` (e.g. "CMPSC 221 - LEC").
#[derive(Debug, Clone, Copy, Default)]
pub struct CoursePattern;

impl TitleInterpreter for CoursePattern {
    fn interpret(&self, title: &str) -> CourseTitle {
        match COURSE_RE.captures(title.trim()) {
            Some(caps) => CourseTitle {
                code: format!("{} {}", &caps[1], &caps[2]),
                kind: caps[3].to_string(),
            },
            None => CourseTitle {
                code: title.to_string(),
                kind: FALLBACK_COURSE_TYPE.to_string(),
            },
        }
    }
}
