//! Parsers turning pasted text into course records

pub mod course_text;

pub use course_text::{
    parse_course_text, CourseParser, ParseMode, DEFAULT_CREDITS, DEFAULT_GRADE,
};
