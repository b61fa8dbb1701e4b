//! Summary command handler

use super::{load_gradebook, open_store, report_failure};
use gradeplan::config::Config;
use gradeplan::core::organizer::academic_year_labels;

/// Print per-semester and overall totals
pub fn run(config: &Config) {
    let store = open_store(config);
    let gradebook = match load_gradebook(&store) {
        Ok(gradebook) => gradebook,
        Err(err) => {
            report_failure("Summary", &err);
            return;
        }
    };

    let sections = gradebook.sections(&config.organizer());
    let labels = academic_year_labels(&sections);

    println!(
        "{:<24} {:<16} {:>8} {:>8} {:>6}",
        "Semester", "Year", "Credits", "Points", "GPA"
    );
    for semester in gradebook.semesters() {
        let year = labels.get(semester.id.as_str()).map_or("", String::as_str);
        println!(
            "{:<24} {:<16} {:>8.2} {:>8.2} {:>6.2}",
            semester.name, year, semester.total_credits, semester.total_grade_points, semester.gpa
        );
    }

    let overall = gradebook.overall();
    println!(
        "\nOverall: {:.2} credits, {:.2} grade points, GPA {:.2}",
        overall.total_credits, overall.total_grade_points, overall.gpa
    );
}
