//! Tally CLI
//!
//! Command-line interface for Tally - habit tracking with streaks.

use std::path::PathBuf;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use tally_core::{Config, Frequency};

mod commands;
mod logging;
mod output;
mod prompt;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Tally - Track habits, streaks, and daily progress")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use a specific config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new habit
    Add {
        /// Habit name (3-50 characters)
        name: String,
        /// How often the habit is meant to be done
        #[arg(short, long, default_value = "daily")]
        frequency: Frequency,
    },
    /// List habits with today's status and streaks
    #[command(alias = "ls")]
    List {
        /// Day to report on (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Show habit details
    Show {
        /// Habit ID (full UUID or prefix)
        id: String,
        /// Day to report on (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Mark a habit done, or undo it if already done
    #[command(alias = "done")]
    Toggle {
        /// Habit ID (full UUID or prefix)
        id: String,
        /// Day to toggle (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Delete a habit
    #[command(alias = "rm")]
    Remove {
        /// Habit ID (full UUID or prefix)
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show completion rate and streak stats
    Stats {
        /// Day to report on (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Suggest habits to start with
    Suggest {
        /// Only show this category (e.g. Health, Learning)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Replace local habits with the remote list
    Refresh {
        /// Habit list URL (defaults to source_url)
        #[arg(long)]
        url: Option<String>,
    },
    /// Show storage location and counts
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, source_url, goal_days, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands must work even when the config file is broken
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), config_path, &output);
    }

    let config = Config::load_with_cli_override(config_path)?;
    logging::init(&config, cli.verbose);

    let today = Local::now().date_naive();

    match cli.command {
        Commands::Config { .. } => unreachable!(), // Handled above
        Commands::Suggest { category } => commands::suggest::list(category, &output),
        Commands::Refresh { url } => commands::refresh::refresh(&config, url, &output).await,
        Commands::Add { name, frequency } => {
            let store = commands::habit::open_store(&config).await?;
            commands::habit::add(&store, name, frequency, &config, today, &output).await
        }
        Commands::List { date } => {
            let store = commands::habit::open_store(&config).await?;
            commands::habit::list(&store, &config, date.unwrap_or(today), &output)
        }
        Commands::Show { id, date } => {
            let store = commands::habit::open_store(&config).await?;
            commands::habit::show(&store, id, &config, date.unwrap_or(today), &output)
        }
        Commands::Toggle { id, date } => {
            let store = commands::habit::open_store(&config).await?;
            commands::habit::toggle(&store, id, &config, date.unwrap_or(today), &output).await
        }
        Commands::Remove { id, yes } => {
            let store = commands::habit::open_store(&config).await?;
            commands::habit::remove(&store, id, yes, &output).await
        }
        Commands::Stats { date } => {
            let store = commands::habit::open_store(&config).await?;
            commands::stats::show(&store, date.unwrap_or(today), &output)
        }
        Commands::Status => {
            let store = commands::habit::open_store(&config).await?;
            commands::status::show(&store, &config, &output)
        }
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}
