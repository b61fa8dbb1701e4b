//! Semester model

use crate::core::grades::{aggregate, SemesterTotals};
use crate::core::models::{Course, TermTag};
use serde::{Deserialize, Deserializer, Serialize};

/// Name used when a semester is created without one
pub const DEFAULT_SEMESTER_NAME: &str = "New Semester";

/// A named academic term holding an ordered list of courses
///
/// Records saved before the term tag existed carry no `term` key; their tag is
/// inferred from the name once, when they are read. A `term` of `null` marks a
/// semester that was explicitly left undated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "SemesterRecord")]
pub struct Semester {
    /// Opaque identifier derived from the creation timestamp
    pub id: String,

    /// Free-text label (e.g., "Fall 2023")
    pub name: String,

    /// Structured term tag, inferred from the name at creation time
    pub term: Option<TermTag>,

    /// Courses in display order
    #[serde(default)]
    pub courses: Vec<Course>,

    /// Sum of course credits
    #[serde(default)]
    pub total_credits: f64,

    /// Sum of course grade points
    #[serde(default)]
    pub total_grade_points: f64,

    /// Semester GPA, rounded to two decimals
    #[serde(default)]
    pub gpa: f64,
}

impl Semester {
    /// Create a semester and infer its term tag from `name`
    ///
    /// An empty name is replaced by [`DEFAULT_SEMESTER_NAME`].
    #[must_use]
    pub fn new(id: String, name: &str, courses: Vec<Course>) -> Self {
        let name = if name.trim().is_empty() {
            DEFAULT_SEMESTER_NAME.to_string()
        } else {
            name.trim().to_string()
        };
        let mut semester = Self {
            id,
            term: TermTag::infer(&name),
            name,
            courses,
            total_credits: 0.0,
            total_grade_points: 0.0,
            gpa: 0.0,
        };
        semester.recompute_totals();
        semester
    }

    /// Term tag used for ordering; `None` files the semester as undated
    #[must_use]
    pub const fn term_tag(&self) -> Option<TermTag> {
        self.term
    }

    /// Rename the semester
    ///
    /// The stored term tag stays frozen unless `retag` is set, in which case it
    /// is inferred again from the new name.
    pub fn rename(&mut self, name: &str, retag: bool) {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return;
        }
        self.name = trimmed.to_string();
        if retag {
            self.term = TermTag::infer(&self.name);
        }
    }

    /// Recompute the derived totals from the course list
    pub fn recompute_totals(&mut self) {
        let SemesterTotals {
            total_credits,
            total_grade_points,
            gpa,
        } = aggregate(&self.courses);
        self.total_credits = total_credits;
        self.total_grade_points = total_grade_points;
        self.gpa = gpa;
    }

    /// Current totals as a value
    #[must_use]
    pub const fn totals(&self) -> SemesterTotals {
        SemesterTotals {
            total_credits: self.total_credits,
            total_grade_points: self.total_grade_points,
            gpa: self.gpa,
        }
    }
}

/// On-disk shape of a semester, where a missing `term` differs from `null`
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SemesterRecord {
    id: String,
    name: String,
    #[serde(default, deserialize_with = "present")]
    term: Option<Option<TermTag>>,
    #[serde(default)]
    courses: Vec<Course>,
    #[serde(default)]
    total_credits: f64,
    #[serde(default)]
    total_grade_points: f64,
    #[serde(default)]
    gpa: f64,
}

/// Wrap a value that is present in the input, `null` included
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl From<SemesterRecord> for Semester {
    fn from(record: SemesterRecord) -> Self {
        let term = record
            .term
            .unwrap_or_else(|| TermTag::infer(&record.name));
        Self {
            id: record.id,
            name: record.name,
            term,
            courses: record.courses,
            total_credits: record.total_credits,
            total_grade_points: record.total_grade_points,
            gpa: record.gpa,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grades::GradeScale;
    use crate::core::models::Season;

    fn course(code: &str, grade: &str, credits: f64) -> Course {
        Course::new(
            code.to_string(),
            String::new(),
            grade.to_string(),
            credits,
            &GradeScale::standard(),
        )
    }

    #[test]
    fn test_new_infers_term() {
        let semester = Semester::new("1".to_string(), "Fall 2023", Vec::new());
        assert_eq!(semester.term, Some(TermTag::new(Season::Fall, 2023)));
        assert!(semester.courses.is_empty());
        assert!(semester.gpa.abs() < f64::EPSILON);
    }

    #[test]
    fn test_default_name() {
        let semester = Semester::new("1".to_string(), "   ", Vec::new());
        assert_eq!(semester.name, DEFAULT_SEMESTER_NAME);
        assert!(semester.term.is_none());
    }

    #[test]
    fn test_totals_computed_on_creation() {
        let semester = Semester::new(
            "1".to_string(),
            "Spring 2024",
            vec![course("MATH1101", "A", 4.0), course("ENGL1101", "B", 3.0)],
        );
        assert!((semester.total_credits - 7.0).abs() < f64::EPSILON);
        assert!((semester.total_grade_points - 25.0).abs() < f64::EPSILON);
        assert!((semester.gpa - 3.57).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rename_keeps_tag_unless_retagged() {
        let mut semester = Semester::new("1".to_string(), "Fall 2023", Vec::new());
        semester.rename("First semester", false);
        assert_eq!(semester.name, "First semester");
        assert_eq!(semester.term_tag(), Some(TermTag::new(Season::Fall, 2023)));

        semester.rename("Spring 2024", true);
        assert_eq!(semester.term, Some(TermTag::new(Season::Spring, 2024)));
    }

    #[test]
    fn test_legacy_record_without_tag() {
        let json = r#"{
            "id": "1700000000000",
            "name": "Summer 2024",
            "courses": [],
            "totalCredits": 0,
            "totalGradePoints": 0,
            "gpa": 0,
            "academicYear": "Freshman"
        }"#;
        let semester: Semester = serde_json::from_str(json).unwrap();
        assert_eq!(semester.term, Some(TermTag::new(Season::Summer, 2024)));
    }

    #[test]
    fn test_null_term_stays_undated() {
        let json = r#"{"id": "1", "name": "Fall 2023", "term": null, "courses": []}"#;
        let semester: Semester = serde_json::from_str(json).unwrap();
        assert!(semester.term_tag().is_none());

        let saved = serde_json::to_value(&semester).unwrap();
        assert!(saved["term"].is_null());
    }

    #[test]
    fn test_rename_does_not_date_untagged_semester() {
        let mut semester = Semester::new("1".to_string(), "", Vec::new());
        semester.rename("Fall 2024", false);
        assert!(semester.term_tag().is_none());

        semester.rename("Fall 2024", true);
        assert_eq!(semester.term_tag(), Some(TermTag::new(Season::Fall, 2024)));
    }
}
