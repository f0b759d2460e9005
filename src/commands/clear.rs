use anyhow::Result;
use owo_colors::OwoColorize;
use royale_core::IngestConfig;
use royale_core::store::ProviderStore;
use royale_core::sync::Synchronizer;

use crate::render;

/// Replace the collection with nothing: same delete stage as a full
/// ingestion, no insert waves.
pub async fn run(config: IngestConfig) -> Result<()> {
    let store = ProviderStore::new(&config.store);
    let synchronizer = Synchronizer::new(store, config.collection.clone(), config.batch_size);

    let spinner = render::create_spinner(format!("🗑 Clearing '{}'", config.collection));
    let result = synchronizer.replace_all(&[]).await;
    spinner.finish_and_clear();

    let report = result?;
    println!(
        "{} Cleared {} document(s) from '{}'",
        "✓".green(),
        report.deleted,
        config.collection
    );

    Ok(())
}
