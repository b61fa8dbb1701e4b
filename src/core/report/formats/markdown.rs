//! Markdown report generator
//!
//! Renders the transcript as Markdown tables, readable as plain text and on
//! GitHub, GitLab or VS Code.

use crate::core::report::{ReportContext, ReportGenerator, SectionView};
use std::error::Error;
use std::fmt::Write;
use std::fs;
use std::path::Path;

/// Embedded Markdown report template
const MARKDOWN_TEMPLATE: &str = include_str!("../templates/report.md");

/// Markdown report generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the report using template substitution
    #[allow(clippy::unused_self)]
    fn render_template(&self, ctx: &ReportContext) -> String {
        let mut output = MARKDOWN_TEMPLATE.to_string();

        output = output.replace("{{generated_at}}", &ctx.generated_at);
        output = output.replace("{{semester_count}}", &ctx.semester_count().to_string());
        output = output.replace("{{course_count}}", &ctx.course_count().to_string());
        output = output.replace(
            "{{total_credits}}",
            &format!("{:.2}", ctx.overall.total_credits),
        );
        output = output.replace(
            "{{total_grade_points}}",
            &format!("{:.2}", ctx.overall.total_grade_points),
        );
        output = output.replace("{{overall_gpa}}", &format!("{:.2}", ctx.overall.gpa));

        let forecast = Self::generate_forecast_table(ctx);
        output = output.replace("{{forecast}}", &forecast);

        // Semester names and course titles are user text: substitute them last
        let sections = Self::generate_sections(&ctx.section_views());
        output = output.replace("{{sections}}", &sections);

        output
    }

    /// One heading per section, one course table per semester
    fn generate_sections(sections: &[SectionView]) -> String {
        if sections.is_empty() {
            return "_No semesters recorded._\n".to_string();
        }

        let mut out = String::new();
        for section in sections {
            let _ = writeln!(out, "### {}\n", section.label);
            for semester in &section.semesters {
                let _ = writeln!(
                    out,
                    "#### {} (GPA {}, {} credits)\n",
                    semester.name, semester.gpa, semester.credits
                );
                if semester.courses.is_empty() {
                    out.push_str("_No courses_\n\n");
                    continue;
                }
                out.push_str("| Course | Title | Grade | Credits | Grade Points |\n");
                out.push_str("|---|---|---|---|---|\n");
                for course in &semester.courses {
                    let _ = writeln!(
                        out,
                        "| {} | {} | {} | {} | {} |",
                        course.code,
                        escape_cell(&course.title),
                        course.grade,
                        course.credits,
                        course.grade_points
                    );
                }
                out.push('\n');
            }
        }
        out
    }

    fn generate_forecast_table(ctx: &ReportContext) -> String {
        let rows = ctx.forecast_rows();
        if rows.is_empty() {
            return "No remaining terms to project.\n".to_string();
        }

        let mut table = String::new();
        let _ = writeln!(
            table,
            "Last semester GPA {:.2}, semester average {:.2}.\n",
            ctx.forecast.last_gpa, ctx.forecast.mean_gpa
        );
        table.push_str("| Term | Year | Low | Expected | High |\n");
        table.push_str("|---|---|---|---|---|\n");
        for row in rows {
            let _ = writeln!(
                table,
                "| {} | {} | {} | {} | {} |",
                row.term, row.year, row.low, row.avg, row.high
            );
        }
        table
    }
}

/// Pipes would split a table cell
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for MarkdownReporter {
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let report_content = self.render(ctx)?;
        fs::write(output_path, report_content)?;
        Ok(())
    }

    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
        Ok(self.render_template(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Semester;
    use crate::core::organizer::Organizer;
    use crate::core::parser::parse_course_text;

    #[test]
    fn test_render_lists_sections_and_courses() {
        let semesters = vec![
            Semester::new(
                "1".to_string(),
                "Fall 2023",
                parse_course_text("MATH1101 - Calculus I\nA\n4"),
            ),
            Semester::new("2".to_string(), "Transfer", Vec::new()),
        ];
        let ctx = ReportContext::new(&semesters, &Organizer::default());
        let report = MarkdownReporter::new().render(&ctx).unwrap();

        assert!(report.contains("### Freshman Year"));
        assert!(report.contains("#### Fall 2023 (GPA 4.00, 4.00 credits)"));
        assert!(report.contains("| MATH1101 | Calculus I | A | 4.00 | 16.00 |"));
        assert!(report.contains("### Miscellaneous"));
        assert!(report.contains("_No courses_"));
        assert!(report.contains("| Spring 2024 | Freshman Year |"));
        assert!(!report.contains("{{"));
    }

    #[test]
    fn test_placeholder_text_in_titles_is_kept() {
        let semesters = vec![Semester::new(
            "1".to_string(),
            "Fall 2023 {{overall_gpa}}",
            parse_course_text("MATH1101 - {{forecast}}\nA\n4"),
        )];
        let ctx = ReportContext::new(&semesters, &Organizer::default());
        let report = MarkdownReporter::new().render(&ctx).unwrap();

        assert!(report.contains("| MATH1101 | {{forecast}} | A | 4.00 | 16.00 |"));
        assert!(report.contains("#### Fall 2023 {{overall_gpa}} (GPA 4.00"));
    }

    #[test]
    fn test_empty_gradebook() {
        let ctx = ReportContext::new(&[], &Organizer::default());
        let report = MarkdownReporter::new().render(&ctx).unwrap();
        assert!(report.contains("_No semesters recorded._"));
        assert!(report.contains("No remaining terms to project."));
    }
}
