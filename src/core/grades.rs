//! Grade-point calculator
//!
//! Pure functions mapping letter grades to grade points and aggregating
//! courses into semester totals. Nothing here fails: unknown grades fall back
//! to the scale's default point value and zero credits yield a GPA of `0`.

use crate::core::models::{Course, Semester};
use serde::Serialize;

/// Point value used for unknown or empty grades (a "C equivalent")
pub const DEFAULT_GRADE_POINT: f64 = 2.0;

/// Highest point value on the standard scale
pub const MAX_GPA: f64 = 4.0;

/// Letter grades recognized by the standard scale, best first
pub const LETTER_GRADES: [&str; 12] = [
    "A", "A-", "B+", "B", "B-", "C+", "C", "C-", "D+", "D", "D-", "F",
];

/// Standard four-point table; `E` is an alias of `F`
const STANDARD_TABLE: [(&str, f64); 13] = [
    ("A", 4.0),
    ("A-", 3.67),
    ("B+", 3.33),
    ("B", 3.0),
    ("B-", 2.67),
    ("C+", 2.33),
    ("C", 2.0),
    ("C-", 1.67),
    ("D+", 1.33),
    ("D", 1.0),
    ("D-", 0.67),
    ("F", 0.0),
    ("E", 0.0),
];

/// Round to two decimal places
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Letter-grade to point-value table with a fallback for unknown grades
#[derive(Debug, Clone, PartialEq)]
pub struct GradeScale {
    default_point: f64,
}

impl GradeScale {
    /// The standard scale with the default fallback of 2.00
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            default_point: DEFAULT_GRADE_POINT,
        }
    }

    /// The standard scale with a custom fallback for unknown grades
    #[must_use]
    pub const fn with_default_point(default_point: f64) -> Self {
        Self { default_point }
    }

    /// Fallback point value for unknown grades
    #[must_use]
    pub const fn default_point(&self) -> f64 {
        self.default_point
    }

    /// Point value of a known grade, `None` when the grade is not on the scale
    ///
    /// Lookup ignores surrounding whitespace and letter case.
    #[must_use]
    pub fn lookup(grade: &str) -> Option<f64> {
        let normalized = grade.trim().to_ascii_uppercase();
        STANDARD_TABLE
            .iter()
            .find(|(letter, _)| *letter == normalized)
            .map(|(_, points)| *points)
    }

    /// Point value of a grade, falling back to the scale default
    #[must_use]
    pub fn point_value(&self, grade: &str) -> f64 {
        Self::lookup(grade).unwrap_or(self.default_point)
    }

    /// `credits x point_value(grade)`, rounded to two decimals
    #[must_use]
    pub fn grade_points(&self, credits: f64, grade: &str) -> f64 {
        round2(credits * self.point_value(grade))
    }
}

impl Default for GradeScale {
    fn default() -> Self {
        Self::standard()
    }
}

/// Derived totals of a set of courses
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SemesterTotals {
    /// Sum of credits
    pub total_credits: f64,
    /// Sum of grade points
    pub total_grade_points: f64,
    /// `total_grade_points / total_credits` rounded to two decimals, or `0`
    pub gpa: f64,
}

impl SemesterTotals {
    /// Build totals from sums, deriving the GPA
    #[must_use]
    pub fn from_sums(total_credits: f64, total_grade_points: f64) -> Self {
        Self {
            total_credits,
            total_grade_points,
            gpa: gpa(total_credits, total_grade_points),
        }
    }
}

/// GPA from summed credits and grade points, guarded against zero credits
#[must_use]
pub fn gpa(total_credits: f64, total_grade_points: f64) -> f64 {
    if total_credits <= 0.0 {
        return 0.0;
    }
    round2(total_grade_points / total_credits)
}

/// Point value of a grade on the standard scale
#[must_use]
pub fn point_value(grade: &str) -> f64 {
    GradeScale::standard().point_value(grade)
}

/// Grade points of a course on the standard scale
#[must_use]
pub fn grade_points(credits: f64, grade: &str) -> f64 {
    GradeScale::standard().grade_points(credits, grade)
}

/// Sum credits and grade points across `courses`
///
/// Always a full re-sum; there is no incremental update.
#[must_use]
pub fn aggregate(courses: &[Course]) -> SemesterTotals {
    let total_credits = courses.iter().map(|c| c.credits).sum();
    let total_grade_points = courses.iter().map(|c| c.grade_points).sum();
    SemesterTotals::from_sums(total_credits, total_grade_points)
}

/// Totals across all semesters, built from the stored semester totals
#[must_use]
pub fn overall(semesters: &[Semester]) -> SemesterTotals {
    let total_credits = semesters.iter().map(|s| s.total_credits).sum();
    let total_grade_points = semesters.iter().map(|s| s.total_grade_points).sum();
    SemesterTotals::from_sums(total_credits, total_grade_points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(grade: &str, credits: f64) -> Course {
        Course::new(
            "TEST1000".to_string(),
            String::new(),
            grade.to_string(),
            credits,
            &GradeScale::standard(),
        )
    }

    #[test]
    fn test_point_values() {
        assert!((point_value("A") - 4.0).abs() < f64::EPSILON);
        assert!((point_value("A-") - 3.67).abs() < f64::EPSILON);
        assert!((point_value("b+") - 3.33).abs() < f64::EPSILON);
        assert!((point_value("D-") - 0.67).abs() < f64::EPSILON);
        assert!(point_value("F").abs() < f64::EPSILON);
        assert!(point_value("E").abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_grade_uses_default() {
        assert!((point_value("P") - DEFAULT_GRADE_POINT).abs() < f64::EPSILON);
        assert!((point_value("") - DEFAULT_GRADE_POINT).abs() < f64::EPSILON);

        let lenient = GradeScale::with_default_point(0.0);
        assert!(lenient.point_value("W").abs() < f64::EPSILON);
    }

    #[test]
    fn test_grade_points_rounding() {
        assert!((grade_points(3.0, "B+") - 9.99).abs() < f64::EPSILON);
        assert!((grade_points(2.0, "A-") - 7.34).abs() < f64::EPSILON);
        assert!((grade_points(4.0, "A") - 16.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_monotonic_in_grade() {
        for credits in [0.5, 1.0, 3.0, 4.0, 5.0] {
            for pair in LETTER_GRADES.windows(2) {
                let (better, worse) = (pair[0], pair[1]);
                assert!(
                    grade_points(credits, better) > grade_points(credits, worse),
                    "{better} should beat {worse} at {credits} credits"
                );
            }
        }
    }

    #[test]
    fn test_aggregate_empty() {
        let totals = aggregate(&[]);
        assert_eq!(totals, SemesterTotals::default());
    }

    #[test]
    fn test_aggregate_invariant() {
        let courses = vec![course("A", 4.0), course("B-", 3.0), course("C+", 1.5)];
        let totals = aggregate(&courses);

        let credits: f64 = courses.iter().map(|c| c.credits).sum();
        let points: f64 = courses.iter().map(|c| c.grade_points).sum();
        assert!((totals.total_credits - credits).abs() < f64::EPSILON);
        assert!((totals.total_grade_points - points).abs() < f64::EPSILON);
        assert!((totals.gpa - round2(points / credits)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_credit_gpa() {
        let totals = aggregate(&[course("A", 0.0)]);
        assert!(totals.gpa.abs() < f64::EPSILON);
        assert!(!totals.gpa.is_nan());
    }
}
