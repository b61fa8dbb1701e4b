//! HTML report generator
//!
//! Renders a self-contained page (inline CSS, no scripts) through the askama
//! template `templates/transcript.html`. Values are HTML-escaped by askama.

use crate::core::report::{ForecastRow, ReportContext, ReportGenerator, SectionView};
use askama::Template;
use std::error::Error;
use std::fs;
use std::path::Path;

#[derive(Template)]
#[template(path = "transcript.html")]
struct TranscriptTemplate {
    generated_at: String,
    semester_count: usize,
    course_count: usize,
    total_credits: String,
    total_grade_points: String,
    overall_gpa: String,
    sections: Vec<SectionView>,
    last_gpa: String,
    mean_gpa: String,
    forecast: Vec<ForecastRow>,
}

impl TranscriptTemplate {
    fn from_context(ctx: &ReportContext) -> Self {
        Self {
            generated_at: ctx.generated_at.clone(),
            semester_count: ctx.semester_count(),
            course_count: ctx.course_count(),
            total_credits: format!("{:.2}", ctx.overall.total_credits),
            total_grade_points: format!("{:.2}", ctx.overall.total_grade_points),
            overall_gpa: format!("{:.2}", ctx.overall.gpa),
            sections: ctx.section_views(),
            last_gpa: format!("{:.2}", ctx.forecast.last_gpa),
            mean_gpa: format!("{:.2}", ctx.forecast.mean_gpa),
            forecast: ctx.forecast_rows(),
        }
    }
}

/// HTML report generator
pub struct HtmlReporter;

impl HtmlReporter {
    /// Create a new HTML reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for HtmlReporter {
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let report_content = self.render(ctx)?;
        fs::write(output_path, report_content)?;
        Ok(())
    }

    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
        Ok(TranscriptTemplate::from_context(ctx).render()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Semester;
    use crate::core::organizer::Organizer;
    use crate::core::parser::parse_course_text;

    #[test]
    fn test_render_escapes_titles() {
        let semesters = vec![Semester::new(
            "1".to_string(),
            "Spring 2024",
            parse_course_text("CSCI1301 - Data <Structures> & Algorithms\nB+\n3"),
        )];
        let ctx = ReportContext::new(&semesters, &Organizer::default());
        let html = HtmlReporter::new().render(&ctx).unwrap();

        assert!(html.contains("<h3>Freshman Year</h3>"));
        assert!(html.contains("CSCI1301"));
        assert!(html.contains("Data &lt;Structures&gt; &amp; Algorithms"));
        assert!(!html.contains("<Structures>"));
        assert!(html.contains("9.99"));
    }

    #[test]
    fn test_render_empty() {
        let ctx = ReportContext::new(&[], &Organizer::default());
        let html = HtmlReporter::new().render(&ctx).unwrap();
        assert!(html.contains("No semesters recorded."));
        assert!(html.contains("No remaining terms to project."));
    }
}
