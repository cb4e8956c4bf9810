//! Seedline Sports - sports seed data
//!
//! Counts how many rows of a collegiate sports table mention each sport and
//! writes `sports.json`, most popular first.

pub mod aggregate;
pub mod config;
pub mod runner;

// Re-exports
pub use aggregate::{SportRecord, aggregate_sports};
pub use config::Config;
pub use runner::{Summary, print_top_sports, run};
