//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use chrono::NaiveDate;
use serde::Serialize;

use tally_core::metrics::{self, HabitSummary, StreakTier};
use tally_core::{Habit, Suggestion};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// A habit together with the numbers derived for one day
#[derive(Debug, Serialize)]
pub struct HabitRow<'a> {
    #[serde(flatten)]
    pub habit: &'a Habit,
    pub done: bool,
    pub streak: u32,
    pub tier: StreakTier,
    pub goal_progress: f64,
}

impl<'a> HabitRow<'a> {
    pub fn new(habit: &'a Habit, date: NaiveDate, goal_days: u32) -> Self {
        let streak = metrics::current_streak(habit, date);
        Self {
            habit,
            done: habit.is_completed_on(date),
            streak,
            tier: StreakTier::from_streak(streak),
            goal_progress: metrics::goal_progress(habit, date, goal_days),
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Check if output is JSON
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print a single habit with its streak details
    pub fn print_habit(&self, row: &HabitRow<'_>) {
        match self.format {
            OutputFormat::Human => {
                let habit = row.habit;
                println!("ID:          {}", habit.id);
                println!("Name:        {}", habit.name);
                println!("Frequency:   {}", habit.frequency);
                println!("Done:        {}", if row.done { "yes" } else { "no" });
                println!("Streak:      {} day(s) ({})", row.streak, row.tier.label());
                println!(
                    "Goal:        {}  {:.0}%",
                    progress_bar(row.goal_progress, 20),
                    row.goal_progress
                );
                println!("Completions: {}", habit.completed_dates.len());
                if let Some(last) = habit.completed_dates.iter().next_back() {
                    println!("Last done:   {}", last);
                }
            }
            OutputFormat::Json => {
                print_json(row);
            }
            OutputFormat::Quiet => {
                println!("{}", row.habit.id);
            }
        }
    }

    /// Print a list of habits
    pub fn print_habits(&self, rows: &[HabitRow<'_>]) {
        match self.format {
            OutputFormat::Human => {
                if rows.is_empty() {
                    println!("No habits yet. Try `tally suggest` for ideas.");
                    return;
                }
                for row in rows {
                    println!(
                        "{} | {} {} | {:<6} | {:>3}d {:<8} | {:>3.0}%",
                        short_id(&row.habit.id),
                        if row.done { "[x]" } else { "[ ]" },
                        pad(&truncate(&row.habit.name, 30), 30),
                        row.habit.frequency.as_str(),
                        row.streak,
                        row.tier.label(),
                        row.goal_progress
                    );
                }
                println!("\n{} habit(s)", rows.len());
            }
            OutputFormat::Json => {
                print_json(&rows);
            }
            OutputFormat::Quiet => {
                for row in rows {
                    println!("{}", row.habit.id);
                }
            }
        }
    }

    /// Print the aggregate numbers for a day
    pub fn print_summary(&self, date: NaiveDate, summary: &HabitSummary) {
        match self.format {
            OutputFormat::Human => {
                println!("Progress for {}", date.format("%A, %B %-d, %Y"));
                println!("================================");
                println!();
                println!("  Total habits:    {}", summary.total);
                println!("  Completed:       {}", summary.completed);
                println!("  Pending:         {}", summary.pending);
                println!(
                    "  Completion rate: {}  {}%",
                    progress_bar(f64::from(summary.completion_rate), 20),
                    summary.completion_rate
                );
                println!("  Longest streak:  {} day(s)", summary.longest_streak);
            }
            OutputFormat::Json => {
                print_json(&serde_json::json!({
                    "date": date,
                    "total": summary.total,
                    "completed": summary.completed,
                    "pending": summary.pending,
                    "completion_rate": summary.completion_rate,
                    "longest_streak": summary.longest_streak,
                }));
            }
            OutputFormat::Quiet => {
                println!("{}", summary.completion_rate);
            }
        }
    }

    /// Print habit suggestions
    pub fn print_suggestions(&self, suggestions: &[Suggestion]) {
        match self.format {
            OutputFormat::Human => {
                if suggestions.is_empty() {
                    println!("No suggestions found.");
                    return;
                }
                for s in suggestions {
                    println!("{} {:<26} ({})", s.icon, s.name, s.category);
                }
                println!();
                println!("Add one with: tally add \"<name>\"");
            }
            OutputFormat::Json => {
                print_json(&suggestions);
            }
            OutputFormat::Quiet => {
                for s in suggestions {
                    println!("{}", s.name);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to encode JSON output: {}", e),
    }
}

/// First 8 characters of an id
pub fn short_id(id: &uuid::Uuid) -> String {
    id.to_string()[..8].to_string()
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Right-pad to a width in characters
fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{}{}", s, " ".repeat(width.saturating_sub(len)))
}

/// Render a percentage as a fixed-width bar
fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::Frequency;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
        // Multi-byte characters are not split
        assert_eq!(truncate("ééééééééééééé", 6), "ééé...");
    }

    #[test]
    fn test_pad() {
        assert_eq!(pad("abc", 5), "abc  ");
        assert_eq!(pad("abcdef", 3), "abcdef");
        assert_eq!(pad("éé", 3), "éé ");
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0.0, 4), "[----]");
        assert_eq!(progress_bar(50.0, 4), "[##--]");
        assert_eq!(progress_bar(100.0, 4), "[####]");
        assert_eq!(progress_bar(250.0, 4), "[####]");
    }

    #[test]
    fn test_habit_row() {
        let mut habit = Habit::new("Drink water", Frequency::Daily).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
        habit.toggle(today);
        habit.toggle(NaiveDate::from_ymd_opt(2024, 7, 31).unwrap());

        let row = HabitRow::new(&habit, today, 4);
        assert!(row.done);
        assert_eq!(row.streak, 2);
        assert_eq!(row.tier, StreakTier::Starting);
        assert!((row.goal_progress - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_habit_row_json_is_flat() {
        let habit = Habit::new("Take a walk", Frequency::Weekly).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
        let row = HabitRow::new(&habit, today, 30);

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["name"], "Take a walk");
        assert_eq!(json["frequency"], "weekly");
        assert_eq!(json["streak"], 0);
        assert_eq!(json["tier"], "starting");
        assert_eq!(json["done"], false);
    }

    #[test]
    fn test_short_id() {
        let id = uuid::Uuid::parse_str("0b7e7a3c-4a5b-4c1e-8d2f-9a8b7c6d5e4f").unwrap();
        assert_eq!(short_id(&id), "0b7e7a3c");
    }
}
