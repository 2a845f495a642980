//! Predefined habit suggestions
//!
//! Starting points offered to users who have not added anything yet.

use serde::Serialize;

/// A ready-made habit idea
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub name: &'static str,
    pub category: &'static str,
    pub icon: &'static str,
}

/// All suggestions, in display order
#[rustfmt::skip]
pub const SUGGESTIONS: &[Suggestion] = &[
    Suggestion { name: "Drink 8 glasses of water", category: "Health", icon: "💧" },
    Suggestion { name: "Read for 30 minutes", category: "Learning", icon: "📚" },
    Suggestion { name: "Exercise for 30 minutes", category: "Fitness", icon: "🏃" },
    Suggestion { name: "Meditate for 10 minutes", category: "Mindfulness", icon: "🧘" },
    Suggestion { name: "Write in journal", category: "Reflection", icon: "✍️" },
    Suggestion { name: "Take a walk", category: "Health", icon: "🚶" },
    Suggestion { name: "Practice gratitude", category: "Mindfulness", icon: "🙏" },
    Suggestion { name: "Learn something new", category: "Learning", icon: "🎓" },
];

/// Suggestions in a category (case-insensitive)
pub fn by_category(category: &str) -> Vec<Suggestion> {
    SUGGESTIONS
        .iter()
        .filter(|s| s.category.eq_ignore_ascii_case(category))
        .copied()
        .collect()
}
