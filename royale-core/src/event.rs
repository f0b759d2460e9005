//! Parsed calendar event types.
//!
//! `CalendarEvent` is what the parser produces: one record per VEVENT,
//! immutable after parse. `Occurrence` is one concrete instance of an
//! event, produced by recurrence expansion and consumed immediately by
//! the projector.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// A single parsed VEVENT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// UID, falling back to the summary when absent.
    pub id: String,
    pub summary: String,
    pub location: Option<String>,
    pub start: EventTime,
    /// DTEND, falling back to DTSTART (zero duration) when absent.
    pub end: EventTime,
    /// Raw RRULE expression, kept opaque until expansion.
    pub rrule: Option<String>,
}

impl CalendarEvent {
    /// Recurrence status is a property of the master event; it is
    /// uniform across every occurrence expanded from it.
    pub fn is_recurring(&self) -> bool {
        self.rrule.is_some()
    }
}

/// DTSTART/DTEND as written in the source, preserving timezone fidelity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventTime {
    /// All-day date (VALUE=DATE).
    Date(NaiveDate),
    DateTimeUtc(DateTime<Utc>),
    /// No timezone designator; interpreted in the reference timezone.
    DateTimeFloating(NaiveDateTime),
    DateTimeZoned { datetime: NaiveDateTime, tzid: String },
}

impl EventTime {
    /// Resolve to an absolute instant against the reference timezone.
    ///
    /// Floating and all-day values are interpreted in the reference zone.
    /// An unknown TZID also falls back to the reference zone so that one
    /// exotic zone id does not poison an otherwise valid calendar.
    pub fn resolve(&self, reference: Tz) -> DateTime<Utc> {
        match self {
            EventTime::Date(d) => {
                let midnight = d.and_hms_opt(0, 0, 0).unwrap_or_default();
                local_to_utc(midnight, reference)
            }
            EventTime::DateTimeUtc(dt) => *dt,
            EventTime::DateTimeFloating(naive) => local_to_utc(*naive, reference),
            EventTime::DateTimeZoned { datetime, tzid } => {
                let tz: Tz = tzid.parse().unwrap_or(reference);
                local_to_utc(*datetime, tz)
            }
        }
    }
}

/// Map a wall-clock time in `tz` to UTC. DST gaps take the earliest
/// valid interpretation; a time that does not exist at all is read as UTC.
fn local_to_utc(naive: NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => naive.and_utc(),
    }
}

/// One concrete instance of a `CalendarEvent` within the ingestion window.
///
/// Invariant: `end - start` equals the owning event's duration.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence {
    /// Id of the owning `CalendarEvent`.
    pub event_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use chrono_tz::America::New_York;

    fn naive(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn utc_time_resolves_to_itself() {
        let dt = Utc.with_ymd_and_hms(2025, 10, 6, 13, 0, 0).unwrap();
        assert_eq!(EventTime::DateTimeUtc(dt).resolve(New_York), dt);
    }

    #[test]
    fn floating_time_is_read_in_reference_zone() {
        // 09:00 wall clock in New York during EDT is 13:00 UTC
        let t = EventTime::DateTimeFloating(naive(2025, 10, 6, 9, 0));
        assert_eq!(
            t.resolve(New_York),
            Utc.with_ymd_and_hms(2025, 10, 6, 13, 0, 0).unwrap()
        );
    }

    #[test]
    fn zoned_time_uses_its_own_tzid() {
        let t = EventTime::DateTimeZoned {
            datetime: naive(2025, 10, 6, 9, 0),
            tzid: "America/Chicago".to_string(),
        };
        // 09:00 Chicago (CDT) is 14:00 UTC
        assert_eq!(
            t.resolve(New_York),
            Utc.with_ymd_and_hms(2025, 10, 6, 14, 0, 0).unwrap()
        );
    }

    #[test]
    fn unknown_tzid_falls_back_to_reference_zone() {
        let t = EventTime::DateTimeZoned {
            datetime: naive(2025, 10, 6, 9, 0),
            tzid: "Not/A_Zone".to_string(),
        };
        assert_eq!(
            t.resolve(New_York),
            Utc.with_ymd_and_hms(2025, 10, 6, 13, 0, 0).unwrap()
        );
    }

    #[test]
    fn all_day_date_resolves_to_local_midnight() {
        let t = EventTime::Date(NaiveDate::from_ymd_opt(2025, 10, 6).unwrap());
        assert_eq!(
            t.resolve(New_York),
            Utc.with_ymd_and_hms(2025, 10, 6, 4, 0, 0).unwrap()
        );
    }
}
