//! Data models for `gradeplan`

pub mod course;
pub mod semester;
pub mod term;

pub use course::Course;
pub use semester::{Semester, DEFAULT_SEMESTER_NAME};
pub use term::{Season, TermTag};
