//! Core pipeline for the Class Royale schedule ingester.
//!
//! Raw `.ics` text flows one way through four stages:
//! parse (`ics`) → expand (`recurrence`) → project (`schedule`) →
//! replace the remote collection (`sync`). The `store` module is the
//! seam to the document store backend.

pub mod config;
pub mod error;
pub mod event;
pub mod ics;
pub mod pipeline;
pub mod recurrence;
pub mod schedule;
pub mod store;
pub mod sync;
pub mod title;
pub mod window;

pub use config::{IngestConfig, WindowMode};
pub use error::{RoyaleError, RoyaleResult};
pub use event::{CalendarEvent, EventTime, Occurrence};
pub use schedule::ScheduleEntry;
pub use window::{Window, WindowPolicy};
