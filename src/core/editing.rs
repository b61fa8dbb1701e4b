//! Inline course edits
//!
//! An edit names one field of one course together with the pending value.
//! Applying it goes through [`crate::core::store::Gradebook::apply_edit`],
//! which validates the value and recomputes derived totals.

use std::fmt;
use std::str::FromStr;

/// Position of a course: owning semester id and index within that semester
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRef {
    /// Id of the owning semester
    pub semester_id: String,
    /// Zero-based index of the course inside the semester
    pub index: usize,
}

impl CourseRef {
    /// Create a course reference
    #[must_use]
    pub fn new(semester_id: impl Into<String>, index: usize) -> Self {
        Self {
            semester_id: semester_id.into(),
            index,
        }
    }
}

/// Editable course fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseField {
    /// Course code
    Code,
    /// Course title
    Title,
    /// Letter grade
    Grade,
    /// Credit hours
    Credits,
}

impl FromStr for CourseField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" | "code" => Ok(Self::Code),
            "title" | "name" => Ok(Self::Title),
            "grade" => Ok(Self::Grade),
            "credits" | "credit" | "hours" => Ok(Self::Credits),
            _ => Err(format!(
                "Unknown course field: '{s}' (expected id, title, grade or credits)"
            )),
        }
    }
}

impl fmt::Display for CourseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Code => "id",
            Self::Title => "title",
            Self::Grade => "grade",
            Self::Credits => "credits",
        };
        f.write_str(name)
    }
}

/// A pending edit of one course field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseEdit {
    /// Replace the course code
    Code {
        /// Target course
        at: CourseRef,
        /// New code
        value: String,
    },
    /// Replace the title
    Title {
        /// Target course
        at: CourseRef,
        /// New title
        value: String,
    },
    /// Replace the grade; stored upper-cased
    Grade {
        /// Target course
        at: CourseRef,
        /// New grade
        value: String,
    },
    /// Replace the credits; must parse as a non-negative number
    Credits {
        /// Target course
        at: CourseRef,
        /// Raw credits text
        value: String,
    },
}

impl CourseEdit {
    /// Build an edit from a field selector
    #[must_use]
    pub fn new(at: CourseRef, field: CourseField, value: impl Into<String>) -> Self {
        let value = value.into();
        match field {
            CourseField::Code => Self::Code { at, value },
            CourseField::Title => Self::Title { at, value },
            CourseField::Grade => Self::Grade { at, value },
            CourseField::Credits => Self::Credits { at, value },
        }
    }

    /// Target of the edit
    #[must_use]
    pub const fn target(&self) -> &CourseRef {
        match self {
            Self::Code { at, .. }
            | Self::Title { at, .. }
            | Self::Grade { at, .. }
            | Self::Credits { at, .. } => at,
        }
    }

    /// Edited field
    #[must_use]
    pub const fn field(&self) -> CourseField {
        match self {
            Self::Code { .. } => CourseField::Code,
            Self::Title { .. } => CourseField::Title,
            Self::Grade { .. } => CourseField::Grade,
            Self::Credits { .. } => CourseField::Credits,
        }
    }

    /// Pending value as typed
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Code { value, .. }
            | Self::Title { value, .. }
            | Self::Grade { value, .. }
            | Self::Credits { value, .. } => value,
        }
    }
}

/// Parse a credits value typed by the user
///
/// Returns `None` unless the text is a finite, non-negative number.
#[must_use]
pub fn parse_credits(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|credits| credits.is_finite() && *credits >= 0.0)
}
