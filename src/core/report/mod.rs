//! Transcript report generation
//!
//! A report lists every section of the organized view with per-semester
//! course tables, the overall totals and the GPA forecast. Markdown output
//! fills an embedded template by placeholder substitution; HTML output goes
//! through an askama template.

pub mod formats;
pub mod view;

use crate::core::forecast::{forecast, Forecast};
use crate::core::grades::{overall, SemesterTotals};
use crate::core::models::Semester;
use crate::core::organizer::{Organizer, SemesterSection};
use std::error::Error;
use std::path::Path;

pub use formats::{HtmlReporter, MarkdownReporter, ReportFormat};
pub use view::{CourseRow, ForecastRow, SectionView, SemesterView};

/// Data context for report generation
///
/// Everything a template needs, computed once from the semester list.
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    /// Semesters in user order
    pub semesters: &'a [Semester],
    /// Organized sections
    pub sections: Vec<SemesterSection<'a>>,
    /// Totals across all semesters
    pub overall: SemesterTotals,
    /// Remaining-term projection
    pub forecast: Forecast,
    /// Local time the context was built, preformatted
    pub generated_at: String,
}

impl<'a> ReportContext<'a> {
    /// Build a report context
    #[must_use]
    pub fn new(semesters: &'a [Semester], organizer: &Organizer) -> Self {
        Self {
            semesters,
            sections: organizer.organize(semesters),
            overall: overall(semesters),
            forecast: forecast(semesters, organizer),
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M").to_string(),
        }
    }

    /// Number of semesters
    #[must_use]
    pub const fn semester_count(&self) -> usize {
        self.semesters.len()
    }

    /// Number of courses across all semesters
    #[must_use]
    pub fn course_count(&self) -> usize {
        self.semesters.iter().map(|s| s.courses.len()).sum()
    }

    /// Sections flattened into display rows
    #[must_use]
    pub fn section_views(&self) -> Vec<SectionView> {
        self.sections.iter().map(SectionView::from_section).collect()
    }

    /// Forecast flattened into display rows
    #[must_use]
    pub fn forecast_rows(&self) -> Vec<ForecastRow> {
        self.forecast
            .terms
            .iter()
            .map(ForecastRow::from_term)
            .collect()
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate a report to a file
    ///
    /// # Errors
    /// Returns an error if report generation or file writing fails
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>>;

    /// Generate report content as a string
    ///
    /// # Errors
    /// Returns an error if report generation fails
    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>>;
}
