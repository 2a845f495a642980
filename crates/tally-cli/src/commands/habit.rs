//! Habit command handlers

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use uuid::Uuid;

use tally_core::{Config, Frequency, Habit, HabitStore, JsonFileSource};

use crate::output::{short_id, HabitRow, Output};
use crate::prompt::confirm;

pub type LocalStore = HabitStore<JsonFileSource>;

/// Open the local habits file and load it into a store
pub async fn open_store(config: &Config) -> Result<LocalStore> {
    config.ensure_data_dir()?;
    let store = HabitStore::new(JsonFileSource::new(config.habits_path()));
    store.load().await.context("Failed to load habits")?;
    Ok(store)
}

/// Write the store's habits back to the local file
async fn persist(store: &LocalStore) -> Result<()> {
    store
        .source()
        .save(&store.habits())
        .await
        .context("Failed to save habits")
}

/// Create a new habit
pub async fn add(
    store: &LocalStore,
    name: String,
    frequency: Frequency,
    config: &Config,
    today: NaiveDate,
    output: &Output,
) -> Result<()> {
    let habit = store.add(&name, frequency)?;
    persist(store).await?;

    output.success(&format!("Added habit: {}", habit.name));
    output.print_habit(&HabitRow::new(&habit, today, config.goal_days));
    Ok(())
}

/// List all habits with their status for `date`
pub fn list(store: &LocalStore, config: &Config, date: NaiveDate, output: &Output) -> Result<()> {
    let habits = store.habits();
    let rows: Vec<_> = habits
        .iter()
        .map(|h| HabitRow::new(h, date, config.goal_days))
        .collect();

    output.print_habits(&rows);
    Ok(())
}

/// Show a single habit
pub fn show(
    store: &LocalStore,
    id: String,
    config: &Config,
    date: NaiveDate,
    output: &Output,
) -> Result<()> {
    let uuid = parse_habit_id(&id, &store.habits())?;
    let habit = store
        .get(uuid)
        .ok_or_else(|| anyhow::anyhow!("Habit not found: {}", id))?;

    output.print_habit(&HabitRow::new(&habit, date, config.goal_days));
    Ok(())
}

/// Mark or unmark a habit as done on `date`
pub async fn toggle(
    store: &LocalStore,
    id: String,
    config: &Config,
    date: NaiveDate,
    output: &Output,
) -> Result<()> {
    let uuid = parse_habit_id(&id, &store.habits())?;
    let completed = store.toggle_completion(uuid, date)?;
    persist(store).await?;

    let habit = store
        .get(uuid)
        .ok_or_else(|| anyhow::anyhow!("Habit not found: {}", id))?;
    let verb = if completed { "Completed" } else { "Unmarked" };
    output.success(&format!("{} {} for {}", verb, habit.name, date));
    output.print_habit(&HabitRow::new(&habit, date, config.goal_days));
    Ok(())
}

/// Delete a habit
pub async fn remove(store: &LocalStore, id: String, yes: bool, output: &Output) -> Result<()> {
    let uuid = parse_habit_id(&id, &store.habits())?;

    let Some(habit) = store.get(uuid) else {
        output.message(&format!("No habit with id {} (already removed)", uuid));
        return Ok(());
    };

    // Confirm deletion
    if !yes && output.should_prompt() {
        println!("Delete habit: {} - {}", short_id(&habit.id), habit.name);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.remove(uuid);
    persist(store).await?;

    output.success(&format!("Deleted habit: {}", habit.name));
    Ok(())
}

/// Parse a habit ID (supports full UUID or prefix)
///
/// A full UUID is returned as-is even if no habit has it, so removing an
/// already-removed habit stays a no-op.
pub fn parse_habit_id(id: &str, habits: &[Habit]) -> Result<Uuid> {
    // Try full UUID first
    if let Ok(uuid) = Uuid::parse_str(id) {
        return Ok(uuid);
    }

    // Try prefix match
    let prefix = id.to_lowercase();
    let matches: Vec<_> = habits
        .iter()
        .filter(|h| h.id.to_string().starts_with(&prefix))
        .collect();

    match matches.len() {
        0 => bail!("No habit found matching: {}", id),
        1 => Ok(matches[0].id),
        _ => {
            eprintln!("Multiple habits match '{}':", id);
            for habit in &matches {
                eprintln!("  {} - {}", habit.id, habit.name);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}
