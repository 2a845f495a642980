//! Derived habit metrics
//!
//! Pure functions over a habits snapshot and an explicit reference date.
//! Nothing here reads the clock or caches results; callers recompute on
//! demand.
//!
//! Streaks are counted in consecutive calendar days for every habit,
//! including weekly ones. A weekly habit done once every seven days shows a
//! streak of 1 at best.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::models::Habit;

/// Streak length that counts as reaching the goal
pub const DEFAULT_GOAL_DAYS: u32 = 30;

/// Consecutive completed days ending at `as_of`
///
/// Zero when `as_of` itself is not completed.
pub fn current_streak(habit: &Habit, as_of: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = Some(as_of);

    while let Some(d) = day {
        if !habit.completed_dates.contains(&d) {
            break;
        }
        streak += 1;
        day = d.checked_sub_days(Days::new(1));
    }

    streak
}

/// Best current streak over all habits, 0 for an empty collection
pub fn longest_streak_across(habits: &[Habit], as_of: NaiveDate) -> u32 {
    habits
        .iter()
        .map(|h| current_streak(h, as_of))
        .max()
        .unwrap_or(0)
}

/// Number of habits completed on `date`
pub fn completed_on(habits: &[Habit], date: NaiveDate) -> usize {
    habits.iter().filter(|h| h.is_completed_on(date)).count()
}

/// Rounded percentage of habits completed on `date`
///
/// Defined as 0 for an empty collection.
pub fn completion_rate(habits: &[Habit], date: NaiveDate) -> u32 {
    let total = habits.len();
    if total == 0 {
        return 0;
    }
    let completed = completed_on(habits, date);
    (100.0 * completed as f64 / total as f64).round() as u32
}

/// Number of habits not yet completed on `date`
pub fn pending_count(habits: &[Habit], date: NaiveDate) -> usize {
    habits.len() - completed_on(habits, date)
}

/// Current streak as a percentage of `goal_days`, capped at 100
///
/// A zero-day goal is always met.
pub fn goal_progress(habit: &Habit, as_of: NaiveDate, goal_days: u32) -> f64 {
    if goal_days == 0 {
        return 100.0;
    }
    let streak = current_streak(habit, as_of);
    (100.0 * f64::from(streak) / f64::from(goal_days)).min(100.0)
}

/// Named band of streak length
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakTier {
    Starting,
    Building,
    Strong,
    Master,
}

impl StreakTier {
    pub fn from_streak(streak: u32) -> Self {
        match streak {
            s if s >= 30 => StreakTier::Master,
            s if s >= 14 => StreakTier::Strong,
            s if s >= 7 => StreakTier::Building,
            _ => StreakTier::Starting,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StreakTier::Starting => "Starting",
            StreakTier::Building => "Building",
            StreakTier::Strong => "Strong",
            StreakTier::Master => "Master!",
        }
    }
}

/// Aggregate numbers for one day across the whole collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HabitSummary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub completion_rate: u32,
    pub longest_streak: u32,
}

impl HabitSummary {
    /// Compute every aggregate for `date`
    pub fn for_date(habits: &[Habit], date: NaiveDate) -> Self {
        Self {
            total: habits.len(),
            completed: completed_on(habits, date),
            pending: pending_count(habits, date),
            completion_rate: completion_rate(habits, date),
            longest_streak: longest_streak_across(habits, date),
        }
    }
}
