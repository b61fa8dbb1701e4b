//! Shared library for `gradeplan`
//! Contains the parsing, grading and organizing engine used by the CLI

pub mod core;
pub mod logger;

pub use crate::core::config;
pub use crate::core::get_version;
