//! Terminal rendering for schedule entries and reports.

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use royale_core::ScheduleEntry;
use royale_core::pipeline::IngestReport;

/// Extension trait for colored terminal rendering.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for ScheduleEntry {
    fn render(&self) -> String {
        let recurring = if self.is_recurring { " ↻" } else { "" };
        format!(
            "   {}  {} – {}  {} {} @ {}{}",
            self.date.dimmed(),
            self.start,
            self.end,
            self.course_code.bold(),
            format!("({})", self.course_type).dimmed(),
            self.location,
            recurring.dimmed(),
        )
    }
}

pub fn render_report(report: &IngestReport) -> String {
    let mut lines = vec![format!(
        "{} {} uploaded to the store",
        "✓".green(),
        pluralize_classes(report.entries)
    )];

    lines.push(format!(
        "   {} old documents cleared, {} inserted in {} waves",
        report.sync.deleted, report.sync.inserted, report.sync.waves
    ));

    if report.skipped_events > 0 {
        lines.push(format!(
            "   {}",
            format!(
                "{} event(s) skipped (invalid recurrence rule)",
                report.skipped_events
            )
            .yellow()
        ));
    }

    lines.join("\n")
}

pub fn pluralize_classes(count: usize) -> String {
    if count == 1 {
        "1 class".to_string()
    } else {
        format!("{} classes", count)
    }
}

pub fn create_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["-", "\\", "|", "/"])
            .template("{msg} {spinner}")
            .unwrap(),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}
