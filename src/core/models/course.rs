//! Course model

use crate::core::grades::GradeScale;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents one graded course inside a semester
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Course code (e.g., "MATH1101")
    pub id: String,

    /// Course title; falls back to the course code when none was given
    pub title: String,

    /// Letter grade (e.g., "A-", "B+"); empty when not yet assigned
    pub grade: String,

    /// Credit hours (can be fractional)
    pub credits: f64,

    /// Derived `credits x point value(grade)`, rounded to two decimals
    pub grade_points: f64,

    /// Internal identity key, stable across reorders
    #[serde(rename = "_uid", default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

impl Course {
    /// Create a course and derive its grade points from `scale`
    ///
    /// # Arguments
    /// * `id` - Course code
    /// * `title` - Course title (the code is used when empty)
    /// * `grade` - Letter grade
    /// * `credits` - Credit hours
    /// * `scale` - Grade scale used to derive grade points
    #[must_use]
    pub fn new(id: String, title: String, grade: String, credits: f64, scale: &GradeScale) -> Self {
        let title = if title.is_empty() { id.clone() } else { title };
        let grade_points = scale.grade_points(credits, &grade);
        Self {
            id,
            title,
            grade,
            credits,
            grade_points,
            uid: None,
        }
    }

    /// Create an empty course row awaiting inline edits
    ///
    /// Every visible field is empty or zero; only the internal key is set.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            grade: String::new(),
            credits: 0.0,
            grade_points: 0.0,
            uid: Some(Uuid::new_v4().to_string()),
        }
    }

    /// Whether every visible field is still empty
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.id.is_empty()
            && self.title.is_empty()
            && self.grade.is_empty()
            && self.credits.abs() < f64::EPSILON
    }

    /// Replace the grade and rederive grade points
    pub fn set_grade(&mut self, grade: &str, scale: &GradeScale) {
        self.grade = grade.trim().to_uppercase();
        self.refresh_grade_points(scale);
    }

    /// Replace the credit hours and rederive grade points
    pub fn set_credits(&mut self, credits: f64, scale: &GradeScale) {
        self.credits = credits;
        self.refresh_grade_points(scale);
    }

    /// Recompute grade points from the current credits and grade
    pub fn refresh_grade_points(&mut self, scale: &GradeScale) {
        self.grade_points = scale.grade_points(self.credits, &self.grade);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_creation() {
        let scale = GradeScale::standard();
        let course = Course::new(
            "MATH1101".to_string(),
            "Calculus I".to_string(),
            "A".to_string(),
            4.0,
            &scale,
        );

        assert_eq!(course.id, "MATH1101");
        assert_eq!(course.title, "Calculus I");
        assert!((course.grade_points - 16.0).abs() < f64::EPSILON);
        assert!(course.uid.is_none());
    }

    #[test]
    fn test_title_defaults_to_code() {
        let scale = GradeScale::standard();
        let course = Course::new(
            "PHYS1101".to_string(),
            String::new(),
            "C".to_string(),
            3.0,
            &scale,
        );
        assert_eq!(course.title, "PHYS1101");
    }

    #[test]
    fn test_blank_course() {
        let course = Course::blank();
        assert!(course.is_blank());
        assert!(course.uid.is_some());
        assert_ne!(Course::blank().uid, course.uid);

        let mut with_credits = Course::blank();
        with_credits.credits = 3.0;
        assert!(!with_credits.is_blank());
        let mut with_grade = Course::blank();
        with_grade.grade = "A".to_string();
        assert!(!with_grade.is_blank());
    }

    #[test]
    fn test_edits_keep_grade_points_consistent() {
        let scale = GradeScale::standard();
        let mut course = Course::new(
            "CHEM1211".to_string(),
            "Chemistry".to_string(),
            "B".to_string(),
            3.0,
            &scale,
        );
        assert!((course.grade_points - 9.0).abs() < f64::EPSILON);

        course.set_grade(" a- ", &scale);
        assert_eq!(course.grade, "A-");
        assert!((course.grade_points - 11.01).abs() < 1e-9);

        course.set_credits(4.0, &scale);
        assert!((course.grade_points - 14.68).abs() < 1e-9);
    }

    #[test]
    fn test_json_field_names() {
        let scale = GradeScale::standard();
        let course = Course::new(
            "MATH1101".to_string(),
            "Calculus I".to_string(),
            "A".to_string(),
            4.0,
            &scale,
        );
        let json = serde_json::to_value(&course).unwrap();
        assert_eq!(json["gradePoints"], 16.0);
        assert!(json.get("_uid").is_none());

        let blank = serde_json::to_value(Course::blank()).unwrap();
        assert!(blank.get("_uid").is_some());
    }
}
