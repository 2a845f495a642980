//! Suggest command handler

use anyhow::Result;

use tally_core::suggestions::{self, SUGGESTIONS};

use crate::output::Output;

/// List predefined habit ideas, optionally for one category
pub fn list(category: Option<String>, output: &Output) -> Result<()> {
    let suggestions = match category {
        Some(ref c) => suggestions::by_category(c),
        None => SUGGESTIONS.to_vec(),
    };

    output.print_suggestions(&suggestions);
    Ok(())
}
