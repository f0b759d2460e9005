//! RRULE expansion for recurring events.
//!
//! Expands a master event into concrete occurrences whose start instants
//! fall inside the ingestion window. Non-recurring events pass through
//! as at most one occurrence.

use chrono::{Duration, Utc};
use rrule::RRuleSet;

use crate::error::{RoyaleError, RoyaleResult};
use crate::event::{CalendarEvent, EventTime, Occurrence};
use crate::window::Window;

/// Hard cap on expanded occurrences per event. A daily rule over the
/// default 7-day window stays far below this; the cap only guards
/// against rules like FREQ=SECONDLY.
const MAX_OCCURRENCES: u16 = 366;

/// Expand an event into the occurrences starting within `window`.
///
/// Every occurrence keeps the master event's duration. A rule the rrule
/// crate cannot evaluate fails with [`RoyaleError::InvalidRecurrenceRule`];
/// callers are expected to skip that single event rather than abort the
/// whole batch.
pub fn expand_event(
    event: &CalendarEvent,
    reference: chrono_tz::Tz,
    window: &Window,
) -> RoyaleResult<Vec<Occurrence>> {
    let start = event.start.resolve(reference);
    let duration = (event.end.resolve(reference) - start).max(Duration::zero());

    let Some(rrule) = &event.rrule else {
        if window.contains(start) {
            return Ok(vec![Occurrence {
                event_id: event.id.clone(),
                start,
                end: start + duration,
            }]);
        }
        return Ok(Vec::new());
    };

    let rrule_doc = build_rrule_document(&event.start, rrule, reference);
    let rrule_set: RRuleSet = rrule_doc.parse().map_err(|e| {
        RoyaleError::InvalidRecurrenceRule(format!("event '{}': {}", event.id, e))
    })?;

    // Convert window bounds to rrule's Tz type. after/before are
    // inclusive, matching the closed window.
    let tz: rrule::Tz = Utc.into();
    let after = window.from.with_timezone(&tz);
    let before = window.to.with_timezone(&tz);

    let result = rrule_set.after(after).before(before).all(MAX_OCCURRENCES);

    Ok(result
        .dates
        .iter()
        .map(|occ_dt| occ_dt.with_timezone(&Utc))
        .filter(|occ_start| window.contains(*occ_start))
        .map(|occ_start| Occurrence {
            event_id: event.id.clone(),
            start: occ_start,
            end: occ_start + duration,
        })
        .collect())
}

/// Build an iCalendar-format DTSTART+RRULE document for the rrule crate
/// parser. Floating and all-day starts are pinned to the reference
/// timezone, matching how they resolve everywhere else.
fn build_rrule_document(start: &EventTime, rrule: &str, reference: chrono_tz::Tz) -> String {
    let dtstart = match start {
        EventTime::Date(d) => {
            format!("DTSTART;TZID={}:{}T000000", reference.name(), d.format("%Y%m%d"))
        }
        EventTime::DateTimeUtc(dt) => {
            format!("DTSTART:{}", dt.format("%Y%m%dT%H%M%SZ"))
        }
        EventTime::DateTimeFloating(dt) => {
            format!(
                "DTSTART;TZID={}:{}",
                reference.name(),
                dt.format("%Y%m%dT%H%M%S")
            )
        }
        EventTime::DateTimeZoned { datetime, tzid } => {
            // Unknown TZIDs fall back to the reference zone, same as
            // EventTime::resolve.
            let tz: chrono_tz::Tz = tzid.parse().unwrap_or(reference);
            format!(
                "DTSTART;TZID={}:{}",
                tz.name(),
                datetime.format("%Y%m%dT%H%M%S")
            )
        }
    };

    format!("{}\nRRULE:{}", dtstart, rrule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use chrono_tz::America::New_York;

    fn zoned(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> EventTime {
        EventTime::DateTimeZoned {
            datetime: NaiveDate::from_ymd_opt(y, mo, d)
                .unwrap()
                .and_hms_opt(h, mi, 0)
                .unwrap(),
            tzid: "America/New_York".to_string(),
        }
    }

    fn weekly_lecture() -> CalendarEvent {
        CalendarEvent {
            id: "lecture-1".to_string(),
            summary: "CMPSC 221 - LEC".to_string(),
            location: None,
            start: zoned(2025, 10, 6, 9, 0),
            end: zoned(2025, 10, 6, 10, 15),
            rrule: Some("FREQ=WEEKLY;BYDAY=MO,WE,FR".to_string()),
        }
    }

    // Monday 2025-10-06 through Sunday 2025-10-12
    fn one_week_window() -> Window {
        Window {
            from: Utc.with_ymd_and_hms(2025, 10, 6, 0, 0, 0).unwrap(),
            to: Utc.with_ymd_and_hms(2025, 10, 12, 23, 59, 59).unwrap(),
        }
    }

    #[test]
    fn weekly_rule_yields_one_occurrence_per_matching_weekday() {
        let occurrences =
            expand_event(&weekly_lecture(), New_York, &one_week_window()).expect("Should expand");

        // Mon, Wed, Fri of that week
        assert_eq!(occurrences.len(), 3);
        assert_eq!(
            occurrences[0].start,
            Utc.with_ymd_and_hms(2025, 10, 6, 13, 0, 0).unwrap()
        );
        assert_eq!(
            occurrences[1].start,
            Utc.with_ymd_and_hms(2025, 10, 8, 13, 0, 0).unwrap()
        );
        assert_eq!(
            occurrences[2].start,
            Utc.with_ymd_and_hms(2025, 10, 10, 13, 0, 0).unwrap()
        );
    }

    #[test]
    fn occurrences_keep_the_master_duration() {
        let occurrences =
            expand_event(&weekly_lecture(), New_York, &one_week_window()).expect("Should expand");

        for occ in &occurrences {
            assert_eq!(occ.end - occ.start, Duration::minutes(75));
            assert_eq!(occ.event_id, "lecture-1");
        }
    }

    #[test]
    fn non_recurring_event_passes_through_once() {
        let mut event = weekly_lecture();
        event.rrule = None;

        let occurrences =
            expand_event(&event, New_York, &one_week_window()).expect("Should expand");

        assert_eq!(occurrences.len(), 1);
        assert_eq!(
            occurrences[0].start,
            Utc.with_ymd_and_hms(2025, 10, 6, 13, 0, 0).unwrap()
        );
    }

    #[test]
    fn non_recurring_event_outside_window_is_dropped() {
        let mut event = weekly_lecture();
        event.rrule = None;
        event.start = zoned(2025, 11, 3, 9, 0);
        event.end = zoned(2025, 11, 3, 10, 15);

        let occurrences =
            expand_event(&event, New_York, &one_week_window()).expect("Should expand");

        assert!(occurrences.is_empty());
    }

    #[test]
    fn occurrences_never_start_past_the_window_end() {
        let mut event = weekly_lecture();
        event.start = EventTime::DateTimeUtc(Utc.with_ymd_and_hms(2025, 10, 6, 13, 0, 0).unwrap());
        event.end = EventTime::DateTimeUtc(Utc.with_ymd_and_hms(2025, 10, 6, 14, 0, 0).unwrap());
        event.rrule = Some("FREQ=DAILY".to_string());

        // Window ends one second before the Oct 8 occurrence starts
        let window = Window {
            from: Utc.with_ymd_and_hms(2025, 10, 6, 0, 0, 0).unwrap(),
            to: Utc.with_ymd_and_hms(2025, 10, 8, 12, 59, 59).unwrap(),
        };

        let occurrences = expand_event(&event, New_York, &window).expect("Should expand");

        let starts: Vec<_> = occurrences.iter().map(|occ| occ.start).collect();
        assert_eq!(
            starts,
            vec![
                Utc.with_ymd_and_hms(2025, 10, 6, 13, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2025, 10, 7, 13, 0, 0).unwrap(),
            ]
        );
    }

    #[test]
    fn window_bounds_are_inclusive_for_recurring_starts() {
        let mut event = weekly_lecture();
        event.start = EventTime::DateTimeUtc(Utc.with_ymd_and_hms(2025, 10, 6, 13, 0, 0).unwrap());
        event.end = EventTime::DateTimeUtc(Utc.with_ymd_and_hms(2025, 10, 6, 14, 0, 0).unwrap());
        event.rrule = Some("FREQ=DAILY".to_string());

        // Both bounds land exactly on occurrence starts
        let window = Window {
            from: Utc.with_ymd_and_hms(2025, 10, 6, 13, 0, 0).unwrap(),
            to: Utc.with_ymd_and_hms(2025, 10, 7, 13, 0, 0).unwrap(),
        };

        let occurrences = expand_event(&event, New_York, &window).expect("Should expand");

        assert_eq!(occurrences.len(), 2);
        assert_eq!(occurrences[0].start, window.from);
        assert_eq!(occurrences[1].start, window.to);
    }

    #[test]
    fn recurring_event_with_unknown_tzid_falls_back_to_reference_zone() {
        let mut event = weekly_lecture();
        event.start = EventTime::DateTimeZoned {
            datetime: NaiveDate::from_ymd_opt(2025, 10, 6)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            tzid: "Not/A_Zone".to_string(),
        };
        event.end = EventTime::DateTimeZoned {
            datetime: NaiveDate::from_ymd_opt(2025, 10, 6)
                .unwrap()
                .and_hms_opt(10, 15, 0)
                .unwrap(),
            tzid: "Not/A_Zone".to_string(),
        };
        event.rrule = Some("FREQ=WEEKLY;BYDAY=MO".to_string());

        let occurrences =
            expand_event(&event, New_York, &one_week_window()).expect("Should expand");

        // 09:00 read in New York (EDT) is 13:00 UTC
        assert_eq!(occurrences.len(), 1);
        assert_eq!(
            occurrences[0].start,
            Utc.with_ymd_and_hms(2025, 10, 6, 13, 0, 0).unwrap()
        );
    }

    #[test]
    fn malformed_rule_is_reported_not_swallowed() {
        let mut event = weekly_lecture();
        event.rrule = Some("FREQ=SOMETIMES;BYDAY=XX".to_string());

        let err = expand_event(&event, New_York, &one_week_window()).expect_err("Should fail");
        assert!(matches!(err, RoyaleError::InvalidRecurrenceRule(_)));
    }

    #[test]
    fn negative_duration_clamps_to_zero() {
        let mut event = weekly_lecture();
        event.rrule = None;
        event.end = zoned(2025, 10, 6, 8, 0);

        let occurrences =
            expand_event(&event, New_York, &one_week_window()).expect("Should expand");

        assert_eq!(occurrences[0].start, occurrences[0].end);
    }
}
