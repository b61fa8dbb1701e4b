//! Forecast command handler

use super::{load_gradebook, open_store, report_failure};
use gradeplan::config::Config;
use gradeplan::core::forecast::forecast;

/// Print the projected GPA band for the remaining terms
pub fn run(json: bool, config: &Config) {
    if let Err(err) = print_forecast(json, config) {
        report_failure("Forecast", &err);
    }
}

fn print_forecast(json: bool, config: &Config) -> Result<(), String> {
    let store = open_store(config);
    let gradebook = load_gradebook(&store)?;
    let result = forecast(gradebook.semesters(), &config.organizer());

    if json {
        let out = serde_json::to_string_pretty(&result)
            .map_err(|e| format!("✗ Failed to serialize forecast: {e}"))?;
        println!("{out}");
        return Ok(());
    }

    if result.is_empty() {
        println!("No remaining terms to project.");
        return Ok(());
    }

    println!(
        "Last semester GPA {:.2}, semester average {:.2}\n",
        result.last_gpa, result.mean_gpa
    );
    println!(
        "{:<12} {:<16} {:>6} {:>8} {:>6}",
        "Term", "Year", "Low", "Expected", "High"
    );
    for term in &result.terms {
        println!(
            "{:<12} {:<16} {:>6.2} {:>8.2} {:>6.2}",
            term.term.to_string(),
            term.year_label,
            term.band.low,
            term.band.avg,
            term.band.high
        );
    }
    Ok(())
}
