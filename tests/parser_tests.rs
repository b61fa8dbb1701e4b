//! Integration tests for the course text parser

use gradeplan::core::grades::GradeScale;
use gradeplan::core::parser::{parse_course_text, CourseParser, ParseMode, DEFAULT_CREDITS};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_canonical_course() {
    let courses = parse_course_text("MATH1101 - Calculus I\nA\n4");

    assert_eq!(courses.len(), 1);
    let course = &courses[0];
    assert_eq!(course.id, "MATH1101");
    assert_eq!(course.title, "Calculus I");
    assert_eq!(course.grade, "A");
    assert!(approx(course.credits, 4.0));
    assert!(approx(course.grade_points, 16.0));
}

#[test]
fn test_code_only_uses_defaults() {
    let courses = parse_course_text("PHYS1101");

    assert_eq!(courses.len(), 1);
    let course = &courses[0];
    assert_eq!(course.id, "PHYS1101");
    assert_eq!(course.title, "PHYS1101");
    assert_eq!(course.grade, "C");
    assert!(approx(course.credits, DEFAULT_CREDITS));
    assert!(approx(course.grade_points, 6.0));
}

#[test]
fn test_empty_and_noise_inputs() {
    assert!(parse_course_text("").is_empty());
    assert!(parse_course_text("   \n\n  ").is_empty());
    assert!(parse_course_text("Unofficial transcript\nTerm GPA 3.50").is_empty());
}

#[test]
fn test_portal_paste() {
    let text = "\
Student Course History
Fall 2023

MATH1101 (01) - Calculus I
A
4.00 16.00
CSE1321: Programming and Problem Solving I
B+
3 9.99
ENGL1101
--
3
Term totals 10.00
";
    let courses = parse_course_text(text);
    assert_eq!(courses.len(), 3);

    assert_eq!(courses[0].title, "Calculus I");
    assert!(approx(courses[0].credits, 4.0));

    assert_eq!(courses[1].id, "CSE1321");
    assert_eq!(courses[1].title, "Programming and Problem Solving I");
    assert_eq!(courses[1].grade, "B+");
    assert!(approx(courses[1].grade_points, 9.99));

    // Ungraded placeholder: empty grade, default point value
    assert_eq!(courses[2].grade, "");
    assert!(approx(courses[2].credits, 3.0));
    assert!(approx(courses[2].grade_points, 6.0));
}

#[test]
fn test_title_on_next_line_and_lowercase_grade() {
    let courses = parse_course_text("BIOL1107\nPrinciples of Biology\nb-\n4");
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].title, "Principles of Biology");
    assert_eq!(courses[0].grade, "B-");
    assert!(approx(courses[0].grade_points, 10.68));
}

#[test]
fn test_crlf_input() {
    let courses = parse_course_text("MATH1101 - Calculus I\r\nA\r\n4\r\n");
    assert_eq!(courses.len(), 1);
    assert!(approx(courses[0].grade_points, 16.0));
}

#[test]
fn test_template_mode() {
    let parser = CourseParser::new(ParseMode::Template, GradeScale::standard(), DEFAULT_CREDITS);
    let text = "MATH1101\nCalculus I\nA\n4\n\nENGL1101\nComposition\nB+\n3\n";
    let courses = parser.parse(text);

    assert_eq!(courses.len(), 2);
    assert_eq!(courses[1].id, "ENGL1101");
    assert_eq!(courses[1].title, "Composition");
    assert!(approx(courses[1].grade_points, 9.99));
}

#[test]
fn test_template_mode_fills_defaults() {
    let parser = CourseParser::new(ParseMode::Template, GradeScale::standard(), 2.0);
    let courses = parser.parse("HIST2111\nUS History\n");

    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].grade, "C");
    assert!(approx(courses[0].credits, 2.0));
}

#[test]
fn test_custom_default_point_applies_to_unknown_grades() {
    let parser = CourseParser::new(
        ParseMode::Heuristic,
        GradeScale::with_default_point(0.0),
        DEFAULT_CREDITS,
    );
    let courses = parser.parse("ARTS1000 - Studio\n--\n3");
    assert!(approx(courses[0].grade_points, 0.0));
}
