//! Parse command handler
//!
//! Runs the course parser on a text file without touching the data file.

use super::{read_input, report_failure};
use gradeplan::config::Config;
use gradeplan::core::grades::aggregate;
use gradeplan::core::models::Course;
use gradeplan::core::parser::ParseMode;
use gradeplan::core::store::GradebookError;
use gradeplan::info;
use std::fmt::Write;
use std::path::Path;

/// Run the parse command.
///
/// # Arguments
/// * `input_file` - Text file, or `-` for stdin
/// * `mode` - Parse mode overriding the config for this call
/// * `json` - Print the courses as a JSON array
/// * `config` - Configuration providing the grading defaults
pub fn run(input_file: &Path, mode: Option<ParseMode>, json: bool, config: &Config) {
    if let Err(err) = parse_file(input_file, mode, json, config) {
        report_failure("Parse", &err);
    }
}

fn parse_file(
    input_file: &Path,
    mode: Option<ParseMode>,
    json: bool,
    config: &Config,
) -> Result<(), String> {
    let text = read_input(input_file)?;

    let mut config = config.clone();
    if let Some(mode) = mode {
        config.grading.parse_mode = mode;
    }
    let parser = config.course_parser();
    let courses = parser.parse(&text);
    info!(
        "Parsed {} course(s) from {} ({} mode)",
        courses.len(),
        input_file.display(),
        parser.mode()
    );

    if courses.is_empty() && !text.trim().is_empty() {
        return Err(format!("✗ {}", GradebookError::NothingParsed));
    }

    if json {
        let out = serde_json::to_string_pretty(&courses)
            .map_err(|e| format!("✗ Failed to serialize courses: {e}"))?;
        println!("{out}");
    } else {
        print!("{}", course_table(&courses));
    }
    Ok(())
}

/// Plain-text table of courses with a totals line
pub fn course_table(courses: &[Course]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<4} {:<10} {:<36} {:>5} {:>7} {:>7}",
        "#", "Course", "Title", "Grade", "Credits", "Points"
    );
    for (idx, course) in courses.iter().enumerate() {
        let grade = if course.grade.is_empty() {
            "-"
        } else {
            course.grade.as_str()
        };
        let _ = writeln!(
            out,
            "{:<4} {:<10} {:<36} {:>5} {:>7.2} {:>7.2}",
            idx + 1,
            course.id,
            truncate(&course.title, 36),
            grade,
            course.credits,
            course.grade_points
        );
    }
    let totals = aggregate(courses);
    let _ = writeln!(
        out,
        "Total: {:.2} credits, {:.2} grade points, GPA {:.2}",
        totals.total_credits, totals.total_grade_points, totals.gpa
    );
    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradeplan::core::parser::parse_course_text;

    #[test]
    fn test_course_table_totals() {
        let courses = parse_course_text("MATH1101 - Calculus I\nA\n4\nPHYS1101");
        let table = course_table(&courses);
        assert!(table.contains("MATH1101"));
        assert!(table.contains("PHYS1101"));
        assert!(table.contains("Total: 7.00 credits, 22.00 grade points, GPA 3.14"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
