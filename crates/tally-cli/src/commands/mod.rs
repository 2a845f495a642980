//! Command handlers

pub mod config;
pub mod habit;
pub mod refresh;
pub mod stats;
pub mod status;
pub mod suggest;
