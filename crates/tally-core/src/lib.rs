//! Tally Core Library
//!
//! This crate provides the core functionality for Tally, a habit tracker:
//! the habit store and the metrics derived from it.
//!
//! # Architecture
//!
//! - **Store**: owns the habit collection and applies mutations
//! - **Metrics**: pure functions computing streaks and completion rates
//! - **Sources**: where the store loads its habits from
//!
//! Derived numbers are never cached; callers take a snapshot from the store
//! and run the metrics over it each time.
//!
//! # Quick Start
//!
//! ```text
//! let store = HabitStore::new(JsonFileSource::new(config.habits_path()));
//! store.load().await?;
//!
//! let habit = store.add("Drink water", Frequency::Daily)?;
//! store.toggle_completion(habit.id, today)?;
//!
//! let summary = HabitSummary::for_date(&store.habits(), today);
//! ```
//!
//! # Modules
//!
//! - `store`: Habit store (main entry point)
//! - `models`: Habit, Frequency, and collection state
//! - `metrics`: Streaks, completion rates, and summaries
//! - `source`: Habit sources (JSON file, HTTP)
//! - `suggestions`: Predefined habit ideas
//! - `error`: Error types
//! - `config`: Application configuration

pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod source;
pub mod store;
pub mod suggestions;

pub use config::Config;
pub use error::{HabitError, HabitResult, LoadError, ValidationError};
pub use metrics::{HabitSummary, StreakTier, DEFAULT_GOAL_DAYS};
pub use models::{Frequency, Habit, HabitCollectionState};
pub use source::{HabitSource, HttpSource, JsonFileSource};
pub use store::{HabitStore, LoadStatus};
pub use suggestions::{Suggestion, SUGGESTIONS};
