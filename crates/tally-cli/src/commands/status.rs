//! Status command handler

use anyhow::Result;

use tally_core::{Config, HabitSource};

use crate::commands::habit::LocalStore;
use crate::output::{Output, OutputFormat};

/// Show where habits live and how many there are
pub fn show(store: &LocalStore, config: &Config, output: &Output) -> Result<()> {
    let state = store.snapshot();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "habits_file": store.source().describe(),
                    "source_url": config.source_url,
                    "goal_days": config.goal_days,
                    "habits": state.habits.len(),
                    "is_loading": state.is_loading,
                    "error": state.error,
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", state.habits.len());
        }
        OutputFormat::Human => {
            println!("Tally Status");
            println!("============");
            println!();
            println!("Storage:");
            println!("  Habits file: {}", store.source().describe());
            println!(
                "  Remote:      {}",
                config.source_url.as_deref().unwrap_or("(not set)")
            );
            println!();
            println!("Contents:");
            println!("  Habits:    {}", state.habits.len());
            println!("  Goal days: {}", config.goal_days);
            if let Some(ref err) = state.error {
                println!();
                println!("Last load failed: {}", err);
            }
        }
    }

    Ok(())
}
