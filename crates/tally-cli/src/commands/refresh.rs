//! Refresh command handler
//!
//! Pulls the habit list from a remote source and replaces the local file
//! with it. Local edits not present remotely are discarded.

use anyhow::{bail, Context, Result};
use tracing::info;

use tally_core::{Config, HabitError, HabitStore, HttpSource, JsonFileSource};

use crate::output::Output;

/// Replace local habits with the list served at `url` (or `source_url`)
pub async fn refresh(config: &Config, url: Option<String>, output: &Output) -> Result<()> {
    let Some(url) = url.or_else(|| config.source_url.clone()) else {
        bail!(
            "No source configured. Pass --url or set one:\n  tally config set source_url <url>"
        );
    };

    let remote = HabitStore::new(HttpSource::new(&url)?);
    if let Err(e) = remote.load().await {
        if let HabitError::Load(ref load) = e {
            if let Some(hint) = load.recovery_suggestion() {
                eprintln!("{}", hint);
            }
        }
        return Err(e).with_context(|| format!("Failed to refresh from {}", url));
    }

    config.ensure_data_dir()?;
    let local = JsonFileSource::new(config.habits_path());
    let habits = remote.habits();
    local
        .save(&habits)
        .await
        .context("Failed to save refreshed habits")?;

    info!(count = habits.len(), %url, "Refreshed habits");
    output.success(&format!("Refreshed {} habit(s) from {}", habits.len(), url));
    Ok(())
}
