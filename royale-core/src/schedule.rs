//! Display-ready schedule entries.
//!
//! Projection is a pure function of (occurrence, owning event, reference
//! timezone): identical inputs always produce an identical entry. The
//! server-assigned `createdAt`/`updatedAt` fields are attached later by
//! the synchronizer, never here.

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::event::{CalendarEvent, Occurrence};
use crate::title::TitleInterpreter;

/// Location used when the source event has none.
const NO_LOCATION: &str = "N/A";

/// One persisted schedule document, mirroring the remote collection's
/// field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub summary: String,
    pub course_code: String,
    pub course_type: String,
    pub location: String,
    /// e.g. "Mon, 06 Oct 2025" in the reference timezone.
    pub date: String,
    /// 12-hour clock start, e.g. "09:00 AM".
    pub start: String,
    /// 12-hour clock end, e.g. "10:15 AM".
    pub end: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// ISO weekday of the localized start, Monday = 1 through Sunday = 7.
    pub day_of_week: u32,
    pub is_recurring: bool,
    pub original_event_id: String,
    pub attended: bool,
    pub attendance_time: Option<DateTime<Utc>>,
}

/// Project one occurrence into its schedule entry.
pub fn project(
    occurrence: &Occurrence,
    event: &CalendarEvent,
    reference: Tz,
    titles: &dyn TitleInterpreter,
) -> ScheduleEntry {
    let start_local = occurrence.start.with_timezone(&reference);
    let end_local = occurrence.end.with_timezone(&reference);
    let course = titles.interpret(&event.summary);

    ScheduleEntry {
        summary: event.summary.clone(),
        course_code: course.code,
        course_type: course.kind,
        location: event
            .location
            .clone()
            .unwrap_or_else(|| NO_LOCATION.to_string()),
        date: start_local.format("%a, %d %b %Y").to_string(),
        start: start_local.format("%I:%M %p").to_string(),
        end: end_local.format("%I:%M %p").to_string(),
        start_time: occurrence.start,
        end_time: occurrence.end,
        day_of_week: start_local.weekday().number_from_monday(),
        is_recurring: event.is_recurring(),
        original_event_id: event.id.clone(),
        attended: false,
        attendance_time: None,
    }
}
