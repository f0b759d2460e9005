//! Ingestion time windows.
//!
//! Two policies decide which occurrence starts are relevant. Each
//! variant has its own evaluation path so the contract stays testable
//! per-variant instead of hiding behind a runtime flag.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

pub const DEFAULT_BUFFER_MINUTES: i64 = 15;
pub const DEFAULT_HORIZON_DAYS: i64 = 7;

/// How the ingestion window is computed relative to "now".
#[derive(Debug, Clone, PartialEq)]
pub enum WindowPolicy {
    /// Absolute-instant bounds: `[now - buffer, now + horizon]`.
    Strict { buffer: Duration, horizon: Duration },
    /// Calendar-day bounds in the reference timezone:
    /// `[start of today, end of (today + horizon_days)]`.
    ///
    /// Keeps same-day events that are already slightly in the past, so
    /// a student's earlier classes still show up during a demo.
    Relaxed { horizon_days: i64 },
}

impl Default for WindowPolicy {
    fn default() -> Self {
        WindowPolicy::Strict {
            buffer: Duration::minutes(DEFAULT_BUFFER_MINUTES),
            horizon: Duration::days(DEFAULT_HORIZON_DAYS),
        }
    }
}

impl WindowPolicy {
    /// Materialize the closed window for a given "now".
    pub fn bounds(&self, now: DateTime<Utc>, reference: Tz) -> Window {
        match self {
            WindowPolicy::Strict { buffer, horizon } => Window {
                from: now - *buffer,
                to: now + *horizon,
            },
            WindowPolicy::Relaxed { horizon_days } => {
                let today = now.with_timezone(&reference).date_naive();
                let last_day = today + Duration::days(*horizon_days);
                Window {
                    from: local_instant(today.and_hms_opt(0, 0, 0).unwrap_or_default(), reference),
                    to: local_instant(
                        last_day.and_hms_opt(23, 59, 59).unwrap_or_default(),
                        reference,
                    ),
                }
            }
        }
    }
}

/// A closed `[from, to]` range of absolute instants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl Window {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.from && instant <= self.to
    }
}

/// Wall-clock time in `tz` as a UTC instant, tolerating DST edges.
fn local_instant(naive: NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => naive.and_utc(),
    }
}
