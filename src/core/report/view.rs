//! Display rows shared by the report formats
//!
//! Numbers are preformatted to two decimals so that every format prints them
//! the same way.

use crate::core::forecast::ProjectedTerm;
use crate::core::models::{Course, Semester};
use crate::core::organizer::SemesterSection;

/// One course line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRow {
    /// Course code
    pub code: String,
    /// Course title
    pub title: String,
    /// Letter grade, `-` when ungraded
    pub grade: String,
    /// Credit hours
    pub credits: String,
    /// Grade points
    pub grade_points: String,
}

impl CourseRow {
    /// Row for `course`
    #[must_use]
    pub fn from_course(course: &Course) -> Self {
        let grade = if course.grade.is_empty() {
            "-".to_string()
        } else {
            course.grade.clone()
        };
        Self {
            code: course.id.clone(),
            title: course.title.clone(),
            grade,
            credits: format!("{:.2}", course.credits),
            grade_points: format!("{:.2}", course.grade_points),
        }
    }
}

/// One semester with its course lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemesterView {
    /// Semester name
    pub name: String,
    /// Semester GPA
    pub gpa: String,
    /// Total credits
    pub credits: String,
    /// Total grade points
    pub grade_points: String,
    /// Courses in display order
    pub courses: Vec<CourseRow>,
}

impl SemesterView {
    /// View of `semester`
    #[must_use]
    pub fn from_semester(semester: &Semester) -> Self {
        Self {
            name: semester.name.clone(),
            gpa: format!("{:.2}", semester.gpa),
            credits: format!("{:.2}", semester.total_credits),
            grade_points: format!("{:.2}", semester.total_grade_points),
            courses: semester.courses.iter().map(CourseRow::from_course).collect(),
        }
    }
}

/// One organized section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionView {
    /// Section label
    pub label: String,
    /// Semesters of the section
    pub semesters: Vec<SemesterView>,
}

impl SectionView {
    /// View of `section`
    #[must_use]
    pub fn from_section(section: &SemesterSection<'_>) -> Self {
        Self {
            label: section.label.clone(),
            semesters: section
                .semesters
                .iter()
                .map(|semester| SemesterView::from_semester(semester))
                .collect(),
        }
    }
}

/// One projected term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRow {
    /// Term name, e.g. "Spring 2025"
    pub term: String,
    /// Academic-year label
    pub year: String,
    /// Lower bound
    pub low: String,
    /// Expected GPA
    pub avg: String,
    /// Upper bound
    pub high: String,
}

impl ForecastRow {
    /// Row for `term`
    #[must_use]
    pub fn from_term(term: &ProjectedTerm) -> Self {
        Self {
            term: term.term.to_string(),
            year: term.year_label.clone(),
            low: format!("{:.2}", term.band.low),
            avg: format!("{:.2}", term.band.avg),
            high: format!("{:.2}", term.band.high),
        }
    }
}
