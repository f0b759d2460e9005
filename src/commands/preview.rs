use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use owo_colors::OwoColorize;
use royale_core::IngestConfig;
use royale_core::pipeline;

use crate::render::{self, Render};

pub fn run(file: &Path, config: IngestConfig) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let schedule = pipeline::build_schedule_at(&text, &config, Utc::now())?;

    if schedule.is_empty() {
        println!("{}", "No classes found in the selected window.".yellow());
        return Ok(());
    }

    println!("📚 Classes for the upcoming week:");
    for entry in &schedule.entries {
        println!("{}", entry.render());
    }

    println!(
        "\n{} from {} event(s)",
        render::pluralize_classes(schedule.entries.len()),
        schedule.parsed_events
    );
    if schedule.skipped_events > 0 {
        println!(
            "{}",
            format!(
                "{} event(s) skipped (invalid recurrence rule)",
                schedule.skipped_events
            )
            .yellow()
        );
    }

    Ok(())
}
