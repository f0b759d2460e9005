use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use royale_core::IngestConfig;
use royale_core::pipeline;
use royale_core::store::ProviderStore;

use crate::render;

pub async fn run(file: &Path, config: IngestConfig) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    log::debug!("read {} bytes from {}", text.len(), file.display());

    let store = ProviderStore::new(&config.store);

    let spinner = render::create_spinner(format!(
        "📚 Syncing schedule to '{}'",
        config.collection
    ));
    let result = pipeline::ingest(&text, &config, store).await;
    spinner.finish_and_clear();

    let report = result?;

    if report.entries == 0 {
        println!(
            "{}",
            "No classes found in the selected window; collection cleared.".yellow()
        );
    }
    println!("{}", render::render_report(&report));

    Ok(())
}
