//! ICS file parsing using the icalendar crate's parser.

use crate::error::{RoyaleError, RoyaleResult};
use crate::event::{CalendarEvent, EventTime};
use icalendar::{
    DatePerhapsTime,
    parser::{Component, read_calendar, unfold},
};

/// Placeholder summary for VEVENTs without a SUMMARY property.
const NO_TITLE: &str = "(No title)";

/// Parse ICS content into the ordered sequence of events it contains.
///
/// Zero VEVENTs is a valid (empty) calendar. A document that does not
/// parse, or a VEVENT without a usable DTSTART, fails with
/// [`RoyaleError::MalformedCalendar`]; no partial events are returned.
pub fn parse_calendar(content: &str) -> RoyaleResult<Vec<CalendarEvent>> {
    let unfolded = unfold(content);
    let calendar =
        read_calendar(&unfolded).map_err(|e| RoyaleError::MalformedCalendar(e.to_string()))?;

    calendar
        .components
        .iter()
        .filter(|c| c.name == "VEVENT")
        .map(parse_event)
        .collect()
}

fn parse_event(vevent: &Component) -> RoyaleResult<CalendarEvent> {
    let summary = vevent
        .find_prop("SUMMARY")
        .map(|p| p.val.to_string())
        .unwrap_or_else(|| NO_TITLE.to_string());

    // UID falls back to the summary so entries can still be tracked
    // back to their source event.
    let id = vevent
        .find_prop("UID")
        .map(|p| p.val.to_string())
        .unwrap_or_else(|| summary.clone());

    let start = vevent
        .find_prop("DTSTART")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
        .map(to_event_time)
        .ok_or_else(|| {
            RoyaleError::MalformedCalendar(format!("VEVENT '{}' is missing DTSTART", summary))
        })?;

    // Missing DTEND means a zero-duration event, not a parse failure.
    let end = vevent
        .find_prop("DTEND")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
        .map(to_event_time)
        .unwrap_or_else(|| start.clone());

    let location = vevent.find_prop("LOCATION").map(|p| p.val.to_string());
    let rrule = vevent.find_prop("RRULE").map(|p| p.val.to_string());

    Ok(CalendarEvent {
        id,
        summary,
        location,
        start,
        end,
        rrule,
    })
}

/// Convert icalendar's DatePerhapsTime to our EventTime, preserving timezone info
fn to_event_time(dpt: DatePerhapsTime) -> EventTime {
    match dpt {
        DatePerhapsTime::Date(d) => EventTime::Date(d),
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            icalendar::CalendarDateTime::Utc(dt) => EventTime::DateTimeUtc(dt),
            icalendar::CalendarDateTime::Floating(naive) => EventTime::DateTimeFloating(naive),
            icalendar::CalendarDateTime::WithTimezone { date_time, tzid } => {
                EventTime::DateTimeZoned {
                    datetime: date_time,
                    tzid,
                }
            }
        },
    }
}
