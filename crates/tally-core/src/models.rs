//! Data models for Tally
//!
//! Defines the core data structures: Habit, Frequency, and the collection
//! state held by the store.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Minimum habit name length (after trimming)
pub const NAME_MIN_LEN: usize = 3;

/// Maximum habit name length (after trimming)
pub const NAME_MAX_LEN: usize = 50;

/// How often a habit is meant to be done
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            other => Err(ValidationError::UnknownFrequency(other.to_string())),
        }
    }
}

/// A trackable recurring activity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    /// Unique identifier, never reused
    pub id: Uuid,
    /// Display name (trimmed, 3-50 characters)
    pub name: String,
    /// Fixed at creation
    pub frequency: Frequency,
    /// Days the habit was marked done
    #[serde(default)]
    pub completed_dates: BTreeSet<NaiveDate>,
}

impl Habit {
    /// Create a new habit with a fresh id and no completions
    ///
    /// The name is trimmed and checked against the length bounds.
    pub fn new(name: &str, frequency: Frequency) -> Result<Self, ValidationError> {
        Self::with_id(Uuid::new_v4(), name, frequency)
    }

    /// Create a habit with a specific ID (for loading from a source)
    pub fn with_id(id: Uuid, name: &str, frequency: Frequency) -> Result<Self, ValidationError> {
        let name = validate_name(name)?;
        Ok(Self {
            id,
            name,
            frequency,
            completed_dates: BTreeSet::new(),
        })
    }

    /// Whether the habit was done on `date`
    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.completed_dates.contains(&date)
    }

    /// Flip completion for `date`, returning whether it is now completed
    pub fn toggle(&mut self, date: NaiveDate) -> bool {
        if self.completed_dates.remove(&date) {
            false
        } else {
            self.completed_dates.insert(date);
            true
        }
    }
}

/// Trim a habit name and check its length
///
/// Length is counted in characters, not bytes.
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();

    if len == 0 {
        return Err(ValidationError::EmptyName);
    }
    if len < NAME_MIN_LEN {
        return Err(ValidationError::NameTooShort {
            len,
            min: NAME_MIN_LEN,
        });
    }
    if len > NAME_MAX_LEN {
        return Err(ValidationError::NameTooLong {
            len,
            max: NAME_MAX_LEN,
        });
    }

    Ok(trimmed.to_string())
}

/// Snapshot of everything the store holds
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct HabitCollectionState {
    /// Habits in creation order
    pub habits: Vec<Habit>,
    /// True while a load is outstanding
    pub is_loading: bool,
    /// Message from the last failed load
    pub error: Option<String>,
}

impl HabitCollectionState {
    /// Find a habit by id
    pub fn get(&self, id: Uuid) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: Uuid) -> Option<&mut Habit> {
        self.habits.iter_mut().find(|h| h.id == id)
    }
}
