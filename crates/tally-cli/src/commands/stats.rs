//! Stats command handler

use anyhow::Result;
use chrono::NaiveDate;

use tally_core::HabitSummary;

use crate::commands::habit::LocalStore;
use crate::output::Output;

/// Show completion numbers and the longest streak for `date`
pub fn show(store: &LocalStore, date: NaiveDate, output: &Output) -> Result<()> {
    let summary = HabitSummary::for_date(&store.habits(), date);
    output.print_summary(date, &summary);
    Ok(())
}
