//! Free-text course parser
//!
//! Recovers course records from text pasted out of a university portal. The
//! heuristic mode classifies lines one by one:
//! 1. A line containing a course code (`MATH1101`) starts a record
//! 2. The next line becomes the title unless it looks like a grade or a number
//! 3. The first grade-looking line becomes the grade (default `C`)
//! 4. Numbers up to the next course code decide the credits, preferring an
//!    integer in `[1, 5]`, then the last number seen (default 3.0). Numbers
//!    may sit inside labels such as `Credits:4`, `(4)` or `4cr`
//!
//! The template mode reads fixed four-line blocks (ID, title, grade, credits)
//! separated by blank lines, falling back to the same defaults.

use crate::core::grades::GradeScale;
use crate::core::models::Course;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Grade assigned when a record carries no grade line
pub const DEFAULT_GRADE: &str = "C";

/// Credits assigned when a record carries no numeric token
pub const DEFAULT_CREDITS: f64 = 3.0;

/// Three or four capital letters followed by four digits
static COURSE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z]{3,4}\d{4}\b").expect("valid course code regex"));

/// Parenthesized section number directly after a course code, e.g. `(02)`
static SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\(\s*\d+\s*\)").expect("valid section regex"));

/// Leading `-` or `:` separator between a code and its title
static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-:]\s*").expect("valid separator regex"));

/// A grade token alone, or followed only by numeric tokens (`B+ 3 9.99`)
static GRADE_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(A-|A|B\+|B-|B|C\+|C-|C|D\+|D-|D|F|E|--)((?:\s+[-+]?\d+(?:\.\d+)?)*)\s*$")
        .expect("valid grade regex")
});

/// Lines that open with a number (credits, points, section counts)
static LEADING_NUMERAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]?\d").expect("valid numeral regex"));

/// An unsigned decimal not glued to a preceding word character, dot or sign
static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\w.+-])(\d+(?:\.\d+)?)").expect("valid number regex")
});

/// How pasted text is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Line-by-line heuristic scan tolerant of portal noise
    #[default]
    Heuristic,
    /// Strict four-line blocks: ID, title, grade, credits
    Template,
}

impl ParseMode {
    /// Config/CLI spelling of the mode
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Heuristic => "heuristic",
            Self::Template => "template",
        }
    }
}

impl FromStr for ParseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heuristic" | "auto" => Ok(Self::Heuristic),
            "template" | "strict" => Ok(Self::Template),
            _ => Err(format!("Unknown parse mode: '{s}'")),
        }
    }
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configured course parser
#[derive(Debug, Clone)]
pub struct CourseParser {
    mode: ParseMode,
    scale: GradeScale,
    default_credits: f64,
}

impl Default for CourseParser {
    fn default() -> Self {
        Self::new(ParseMode::Heuristic, GradeScale::standard(), DEFAULT_CREDITS)
    }
}

impl CourseParser {
    /// Create a parser
    ///
    /// # Arguments
    /// * `mode` - Input layout
    /// * `scale` - Grade scale used to derive grade points
    /// * `default_credits` - Credits for records without a numeric token
    #[must_use]
    pub const fn new(mode: ParseMode, scale: GradeScale, default_credits: f64) -> Self {
        Self {
            mode,
            scale,
            default_credits,
        }
    }

    /// The configured mode
    #[must_use]
    pub const fn mode(&self) -> ParseMode {
        self.mode
    }

    /// Parse raw text into courses
    ///
    /// Never fails: text without any course code yields an empty list.
    #[must_use]
    pub fn parse(&self, raw: &str) -> Vec<Course> {
        match self.mode {
            ParseMode::Heuristic => self.parse_heuristic(raw),
            ParseMode::Template => self.parse_template(raw),
        }
    }

    fn parse_heuristic(&self, raw: &str) -> Vec<Course> {
        let lines: Vec<String> = normalize_lines(raw)
            .into_iter()
            .filter(|line| !line.is_empty())
            .collect();
        let lines: Vec<&str> = lines.iter().map(String::as_str).collect();

        let mut courses = Vec::new();
        let mut cursor = 0;

        while cursor < lines.len() {
            // Discard everything up to the next course code
            while cursor < lines.len() && !has_course_code(lines[cursor]) {
                cursor += 1;
            }
            let Some(code_line) = lines.get(cursor) else {
                break;
            };
            cursor += 1;

            let Some((id, same_line_title)) = split_code_line(code_line) else {
                continue;
            };

            let mut title = same_line_title;
            if cursor < lines.len() && is_plain_text(lines[cursor]) {
                title = lines[cursor].to_string();
                cursor += 1;
            }

            while cursor < lines.len() && is_plain_text(lines[cursor]) {
                cursor += 1;
            }

            let mut grade = DEFAULT_GRADE.to_string();
            let mut numbers = Vec::new();
            if let Some((token, rest)) = lines.get(cursor).and_then(|line| grade_line(line)) {
                grade = token;
                numbers.extend(numbers_in(rest));
                cursor += 1;
            }

            while cursor < lines.len() && !has_course_code(lines[cursor]) {
                numbers.extend(numbers_in(lines[cursor]));
                cursor += 1;
            }

            let credits = pick_credits(&numbers).unwrap_or(self.default_credits);
            courses.push(Course::new(id, title, grade, credits, &self.scale));
        }

        courses
    }

    fn parse_template(&self, raw: &str) -> Vec<Course> {
        let mut courses = Vec::new();
        let mut block = TemplateBlock::default();

        for line in &normalize_lines(raw) {
            if line.is_empty() {
                if let Some(course) = block.finish(self) {
                    courses.push(course);
                }
                block = TemplateBlock::default();
                continue;
            }
            block.feed(line);
        }
        if let Some(course) = block.finish(self) {
            courses.push(course);
        }

        courses
    }
}

/// Slot the next line of a template block fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Slot {
    #[default]
    Id,
    Title,
    Grade,
    Credits,
    Done,
}

#[derive(Debug, Default)]
struct TemplateBlock {
    slot: Slot,
    id: Option<String>,
    same_line_title: String,
    title: Option<String>,
    grade: Option<String>,
    credits: Option<f64>,
}

impl TemplateBlock {
    fn feed(&mut self, line: &str) {
        self.slot = match self.slot {
            Slot::Id => {
                if let Some((id, rest)) = split_code_line(line) {
                    self.id = Some(id);
                    self.same_line_title = rest;
                }
                Slot::Title
            }
            Slot::Title => {
                self.title = Some(line.to_string());
                Slot::Grade
            }
            Slot::Grade => {
                self.grade = grade_line(line).map(|(token, _)| token);
                Slot::Credits
            }
            Slot::Credits => {
                self.credits = numbers_in(line).next();
                Slot::Done
            }
            Slot::Done => Slot::Done,
        };
    }

    fn finish(self, parser: &CourseParser) -> Option<Course> {
        let id = self.id?;
        let title = self.title.unwrap_or(self.same_line_title);
        let grade = self.grade.unwrap_or_else(|| DEFAULT_GRADE.to_string());
        let credits = self.credits.unwrap_or(parser.default_credits);
        Some(Course::new(id, title, grade, credits, &parser.scale))
    }
}

/// Parse text with the default heuristic parser and the standard scale
#[must_use]
pub fn parse_course_text(raw: &str) -> Vec<Course> {
    CourseParser::default().parse(raw)
}

/// Unify line endings and trim every line; blank lines are kept as `""`
fn normalize_lines(raw: &str) -> Vec<String> {
    raw.replace("\r\n", "\n")
        .replace('\r', "\n")
        .split('\n')
        .map(|line| line.trim().to_string())
        .collect()
}

fn has_course_code(line: &str) -> bool {
    COURSE_CODE_RE.is_match(line)
}

/// Split a code line into the code and the candidate title after it
fn split_code_line(line: &str) -> Option<(String, String)> {
    let found = COURSE_CODE_RE.find(line)?;
    let rest = &line[found.end()..];
    let rest = SECTION_RE.replace(rest, "");
    let rest = SEPARATOR_RE.replace(rest.trim(), "");
    Some((found.as_str().to_string(), rest.trim().to_string()))
}

/// A grade line yields the upper-cased grade and any trailing numeric text
///
/// The `--` placeholder means "not graded yet" and yields an empty grade.
fn grade_line(line: &str) -> Option<(String, &str)> {
    let caps = GRADE_LINE_RE.captures(line)?;
    let token = caps.get(1)?.as_str();
    let rest = caps.get(2).map_or("", |m| m.as_str());
    let grade = if token == "--" {
        String::new()
    } else {
        token.to_ascii_uppercase()
    };
    Some((grade, rest))
}

/// Neither a grade, a leading number, nor a new course code
fn is_plain_text(line: &str) -> bool {
    !GRADE_LINE_RE.is_match(line) && !LEADING_NUMERAL_RE.is_match(line) && !has_course_code(line)
}

fn numbers_in(line: &str) -> impl Iterator<Item = f64> + '_ {
    NUMBER_RE
        .captures_iter(line)
        .filter_map(|caps| caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok()))
}

/// Credit-hour pick: first integer in `[1, 5]`, otherwise the last number
fn pick_credits(numbers: &[f64]) -> Option<f64> {
    numbers
        .iter()
        .copied()
        .find(|n| n.fract() == 0.0 && (1.0..=5.0).contains(n))
        .or_else(|| numbers.last().copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_code_line() {
        assert_eq!(
            split_code_line("MATH1101 - Calculus I"),
            Some(("MATH1101".to_string(), "Calculus I".to_string()))
        );
        assert_eq!(
            split_code_line("CSE1321 (02): Programming I"),
            Some(("CSE1321".to_string(), "Programming I".to_string()))
        );
        assert_eq!(
            split_code_line("PHYS1101"),
            Some(("PHYS1101".to_string(), String::new()))
        );
        assert_eq!(split_code_line("MA1101 Calculus"), None);
        assert_eq!(split_code_line("MATHS1101"), None);
    }

    #[test]
    fn test_grade_line() {
        assert_eq!(grade_line("A"), Some(("A".to_string(), "")));
        assert_eq!(grade_line("b+"), Some(("B+".to_string(), "")));
        assert_eq!(grade_line("A-"), Some(("A-".to_string(), "")));
        assert_eq!(grade_line("--"), Some((String::new(), "")));
        let (grade, rest) = grade_line("C+ 3 6.99").unwrap();
        assert_eq!(grade, "C+");
        assert_eq!(rest.trim(), "3 6.99");
        assert_eq!(grade_line("A Survey of Art"), None);
        assert_eq!(grade_line("B++"), None);
        assert_eq!(grade_line("Biology"), None);
    }

    #[test]
    fn test_numbers_in() {
        let found: Vec<f64> = numbers_in("Credits 4.00 of 120").collect();
        assert_eq!(found, vec![4.0, 120.0]);
        assert_eq!(numbers_in("3 9.99").collect::<Vec<_>>(), vec![3.0, 9.99]);
        assert_eq!(numbers_in("Credits:4").collect::<Vec<_>>(), vec![4.0]);
        assert_eq!(numbers_in("(4)").collect::<Vec<_>>(), vec![4.0]);
        assert_eq!(numbers_in("4cr").collect::<Vec<_>>(), vec![4.0]);
        assert_eq!(numbers_in("-2 Section A01").count(), 0);
    }

    #[test]
    fn test_credits_inside_labels() {
        for text in [
            "MATH1101 Calculus\nA\nCredits:4",
            "MATH1101 - Calc\nA\n(4)",
            "MATH1101 - Calc\nA\n4cr",
        ] {
            let courses = parse_course_text(text);
            assert_eq!(courses.len(), 1, "{text}");
            assert!((courses[0].credits - 4.0).abs() < f64::EPSILON, "{text}");
            assert!((courses[0].grade_points - 16.0).abs() < f64::EPSILON, "{text}");
        }
    }

    #[test]
    fn test_pick_credits_prefers_small_integer() {
        assert_eq!(pick_credits(&[16.0, 4.0, 120.0]), Some(4.0));
        assert_eq!(pick_credits(&[12.0, 1.5]), Some(1.5));
        assert_eq!(pick_credits(&[]), None);
    }

    #[test]
    fn test_normalize_line_endings() {
        let lines = normalize_lines("A\r\nB\rC\n  D  ");
        assert_eq!(lines, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_parse_mode_from_str() {
        assert_eq!("Template".parse::<ParseMode>(), Ok(ParseMode::Template));
        assert_eq!("heuristic".parse::<ParseMode>(), Ok(ParseMode::Heuristic));
        assert!("regex".parse::<ParseMode>().is_err());
    }
}
