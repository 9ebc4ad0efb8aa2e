mod bootstrap;
mod report;

use anyhow::{Context, Result};
use chat_core::settings::Settings;
use chat_data::aggregator::ChatAggregator;
use chat_data::analysis::build_report;
use chat_data::session::ChatSession;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Chat Analyzer v{} starting", env!("CARGO_PKG_VERSION"));

    let config = settings
        .analyzer_config()
        .context("failed to load analyzer configuration")?;
    let aggregator = ChatAggregator::from_config(&config)?;

    let session = ChatSession::load(&settings.file, settings.converted_out.as_deref())
        .with_context(|| format!("failed to load chat export {}", settings.file.display()))?;

    if settings.list_users {
        for user in session.users() {
            println!("{}", user);
        }
        return Ok(());
    }

    let selection = settings.selection();
    if !selection.is_overall() && !session.has_author(&selection) {
        tracing::warn!("No messages from \"{}\" in {}", selection, settings.file.display());
    }

    let analysis = build_report(&session, &aggregator, &selection);

    match settings.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&analysis)?),
        _ => print!("{}", report::render_text(&analysis)),
    }

    Ok(())
}
