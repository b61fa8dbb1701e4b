//! Core module for the grade tracking engine

pub mod config;
pub mod editing;
pub mod forecast;
pub mod grades;
pub mod models;
pub mod organizer;
pub mod parser;
pub mod report;
pub mod store;

/// Returns the current version of the `gradeplan` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
