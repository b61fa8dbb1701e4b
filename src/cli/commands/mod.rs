//! CLI command handlers for `gradeplan`.
//!
//! Each command is implemented in its own submodule. Handlers print `✓`/`✗`
//! status lines and log failures through the logger macros.

pub mod config;
pub mod course;
pub mod forecast;
pub mod parse;
pub mod report;
pub mod semester;
pub mod summary;

use gradeplan::config::Config;
use gradeplan::core::store::{Gradebook, GradebookStore};
use gradeplan::error;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Read course text from a file, or from stdin when the path is `-`
pub fn read_input(path: &Path) -> Result<String, String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| format!("✗ Failed to read stdin: {e}"))?;
        return Ok(text);
    }
    fs::read_to_string(path).map_err(|e| {
        error!("Failed to read {}: {e}", path.display());
        format!("✗ Failed to read {}: {e}", path.display())
    })
}

/// Read optional course text; no path means no text
pub fn read_optional_input(path: Option<&Path>) -> Result<String, String> {
    path.map_or_else(|| Ok(String::new()), read_input)
}

/// Store for the configured data file
pub fn open_store(config: &Config) -> GradebookStore {
    GradebookStore::new(config.data_file_path())
}

/// Load the gradebook, formatting failures for display
pub fn load_gradebook(store: &GradebookStore) -> Result<Gradebook, String> {
    store.load().map_err(|e| {
        error!("Failed to load {}: {e}", store.path().display());
        format!("✗ Failed to load {}: {e}", store.path().display())
    })
}

/// Convert a 1-based position typed by the user into an index
pub fn to_index(position: usize) -> Result<usize, String> {
    position
        .checked_sub(1)
        .ok_or_else(|| "✗ Positions start at 1".to_string())
}

/// Print a handler error and log it
pub fn report_failure(command: &str, err: &str) {
    error!("{command} failed: {}", err.trim_start_matches("✗ "));
    eprintln!("{err}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_index() {
        assert_eq!(to_index(1), Ok(0));
        assert_eq!(to_index(3), Ok(2));
        assert!(to_index(0).is_err());
    }

    #[test]
    fn test_read_optional_input_none() {
        assert_eq!(read_optional_input(None), Ok(String::new()));
    }
}
