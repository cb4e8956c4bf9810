//! Seedline Colleges - college seed data
//!
//! Loads a college table of unknown schema, locates name/location/website/
//! conference columns by candidate label lists, optionally filters by NCAA
//! division and row limit, and writes `colleges.json`.
//!
//! # Example
//!
//! ```ignore
//! use seedline_colleges::{Config, Division, run};
//!
//! let mut config = Config::local("Colleges.csv");
//! config.division = Some(Division::One);
//! config.limit = Some(20);
//!
//! let (summary, _) = run(&config, &seedline_core::ProgressContext::hidden())?;
//! println!("Wrote {} colleges", summary.written);
//! ```

pub mod columns;
pub mod config;
pub mod division;
pub mod runner;
pub mod transform;

// Re-exports
pub use config::Config;
pub use division::Division;
pub use runner::{Summary, print_summary, run};
pub use transform::{CollegeRecord, transform_colleges};
