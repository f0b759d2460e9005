//! The ingestion pipeline, end to end.
//!
//! Raw text → parsed events → occurrences → schedule entries →
//! synchronized store. One bad recurrence rule skips that event and
//! logs a warning; it never aborts the rest of the schedule.

use chrono::{DateTime, Utc};

use crate::config::IngestConfig;
use crate::error::{RoyaleError, RoyaleResult};
use crate::recurrence::expand_event;
use crate::schedule::{self, ScheduleEntry};
use crate::store::DocumentStore;
use crate::sync::{SyncReport, Synchronizer};
use crate::title::CoursePattern;
use crate::{ics, title::TitleInterpreter};

/// A computed schedule, not yet persisted.
#[derive(Debug, Clone)]
pub struct Schedule {
    /// Entries sorted by start instant ascending.
    pub entries: Vec<ScheduleEntry>,
    /// VEVENTs found in the source.
    pub parsed_events: usize,
    /// Events skipped because their recurrence rule failed to evaluate.
    pub skipped_events: usize,
}

impl Schedule {
    /// Zero occurrences in the window is a valid outcome, not an error;
    /// callers should present "no classes found".
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outcome of a full ingestion run.
#[derive(Debug, Clone, Copy)]
pub struct IngestReport {
    pub parsed_events: usize,
    pub skipped_events: usize,
    pub entries: usize,
    pub sync: SyncReport,
}

/// Compute the schedule for the window anchored at `now`.
pub fn build_schedule_at(
    text: &str,
    config: &IngestConfig,
    now: DateTime<Utc>,
) -> RoyaleResult<Schedule> {
    build_with_titles(text, config, now, &CoursePattern)
}

/// Same as [`build_schedule_at`] with a custom title interpreter.
pub fn build_with_titles(
    text: &str,
    config: &IngestConfig,
    now: DateTime<Utc>,
    titles: &dyn TitleInterpreter,
) -> RoyaleResult<Schedule> {
    let events = ics::parse_calendar(text)?;
    let window = config.window_policy().bounds(now, config.timezone);

    let mut entries = Vec::new();
    let mut skipped_events = 0;

    for event in &events {
        match expand_event(event, config.timezone, &window) {
            Ok(occurrences) => {
                for occurrence in &occurrences {
                    entries.push(schedule::project(occurrence, event, config.timezone, titles));
                }
            }
            Err(RoyaleError::InvalidRecurrenceRule(reason)) => {
                log::warn!("skipping event '{}': {}", event.summary, reason);
                skipped_events += 1;
            }
            Err(e) => return Err(e),
        }
    }

    entries.sort_by_key(|entry| entry.start_time);

    Ok(Schedule {
        entries,
        parsed_events: events.len(),
        skipped_events,
    })
}

/// Run the whole pipeline: build the schedule for "now" and replace the
/// configured collection with it.
pub async fn ingest<S: DocumentStore>(
    text: &str,
    config: &IngestConfig,
    store: S,
) -> RoyaleResult<IngestReport> {
    let schedule = build_schedule_at(text, config, Utc::now())?;

    let synchronizer = Synchronizer::new(store, config.collection.clone(), config.batch_size);
    let sync = synchronizer.replace_all(&schedule.entries).await?;

    Ok(IngestReport {
        parsed_events: schedule.parsed_events,
        skipped_events: schedule.skipped_events,
        entries: schedule.entries.len(),
        sync,
    })
}
