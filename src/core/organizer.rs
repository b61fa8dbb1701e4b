//! Semester organizer
//!
//! Groups semesters into display sections: one per academic year
//! ("Freshman Year", "Sophomore Year", ...), one per summer ("Summer 2024"),
//! and a trailing "Miscellaneous" bucket for semesters without a term.
//!
//! Academic years are anchored on Fall. Fall Y opens academic year Y and the
//! following Spring joins it, so a Fall/Spring pair always lands in the same
//! section regardless of how many terms came before. Distinct academic years
//! are ranked from the earliest one the student has taken a regular term in.
//!
//! The organizer is pure and keeps no state; it is meant to be re-run on every
//! display.

use crate::core::models::{Semester, TermTag};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Labels for the first four academic years
pub const YEAR_LABELS: [&str; 4] = [
    "Freshman Year",
    "Sophomore Year",
    "Junior Year",
    "Senior Year",
];

/// Label of the catch-all section
pub const MISC_LABEL: &str = "Miscellaneous";

/// Where summer sections go relative to the academic years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummerPlacement {
    /// Each summer follows the academic year it closes
    #[default]
    Interleaved,
    /// All summers follow the last academic year, by ascending year
    AfterAcademicYears,
}

impl SummerPlacement {
    /// Config/CLI spelling
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Interleaved => "interleaved",
            Self::AfterAcademicYears => "after_academic_years",
        }
    }
}

impl FromStr for SummerPlacement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "interleaved" | "chronological" => Ok(Self::Interleaved),
            "after_academic_years" | "after" | "last" => Ok(Self::AfterAcademicYears),
            _ => Err(format!("Unknown summer placement: '{s}'")),
        }
    }
}

impl fmt::Display for SummerPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a section groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// Regular terms of one academic year; `index` 0 is the freshman year
    AcademicYear {
        /// Rank of the academic year, starting at 0
        index: usize,
        /// Calendar year the academic year starts in (its Fall)
        start_year: i32,
    },
    /// Summer terms of one calendar year
    Summer {
        /// Calendar year of the summer
        year: i32,
    },
    /// Semesters whose term could not be determined
    Miscellaneous,
}

/// A display-only group of semesters
///
/// Holds references into the organized slice; nothing is copied.
#[derive(Debug, Clone, PartialEq)]
pub struct SemesterSection<'a> {
    /// Display label (e.g., "Junior Year", "Summer 2024")
    pub label: String,
    /// Kind of grouping
    pub kind: SectionKind,
    /// Semesters in chronological order (input order for Miscellaneous)
    pub semesters: Vec<&'a Semester>,
}

/// Label of the academic year with rank `index`
#[must_use]
pub fn year_label(index: usize) -> String {
    YEAR_LABELS
        .get(index)
        .map_or_else(|| format!("Year {}", index + 1), ToString::to_string)
}

/// Label of a summer section
#[must_use]
pub fn summer_label(year: i32) -> String {
    format!("Summer {year}")
}

/// Semester organizer
#[derive(Debug, Clone, Copy, Default)]
pub struct Organizer {
    summer_placement: SummerPlacement,
}

impl Organizer {
    /// Create an organizer
    #[must_use]
    pub const fn new(summer_placement: SummerPlacement) -> Self {
        Self { summer_placement }
    }

    /// Group `semesters` into ordered sections
    #[must_use]
    pub fn organize<'a>(&self, semesters: &'a [Semester]) -> Vec<SemesterSection<'a>> {
        let mut dated: Vec<(TermTag, &Semester)> = Vec::new();
        let mut misc: Vec<&Semester> = Vec::new();
        for semester in semesters {
            match semester.term_tag() {
                Some(tag) => dated.push((tag, semester)),
                None => misc.push(semester),
            }
        }
        // Stable: equal tags keep their input order
        dated.sort_by_key(|(tag, _)| *tag);

        let academic_years: BTreeSet<i32> = dated
            .iter()
            .filter(|(tag, _)| !tag.is_summer())
            .map(|(tag, _)| tag.academic_year())
            .collect();
        let rank: BTreeMap<i32, usize> = academic_years
            .iter()
            .enumerate()
            .map(|(index, year)| (*year, index))
            .collect();

        let mut years: BTreeMap<i32, Vec<&Semester>> = BTreeMap::new();
        let mut summers: BTreeMap<i32, Vec<&Semester>> = BTreeMap::new();
        for (tag, semester) in dated {
            if tag.is_summer() {
                summers.entry(tag.year).or_default().push(semester);
            } else {
                years.entry(tag.academic_year()).or_default().push(semester);
            }
        }

        let mut keyed: Vec<((i32, i32), SemesterSection<'a>)> = Vec::new();
        for (start_year, members) in years {
            let index = rank.get(&start_year).copied().unwrap_or_default();
            let key = match self.summer_placement {
                SummerPlacement::Interleaved => (start_year, 0),
                SummerPlacement::AfterAcademicYears => (0, start_year),
            };
            keyed.push((
                key,
                SemesterSection {
                    label: year_label(index),
                    kind: SectionKind::AcademicYear { index, start_year },
                    semesters: members,
                },
            ));
        }
        for (year, members) in summers {
            // Summer Y closes the academic year that started in Fall Y - 1
            let key = match self.summer_placement {
                SummerPlacement::Interleaved => (year - 1, 1),
                SummerPlacement::AfterAcademicYears => (1, year),
            };
            keyed.push((
                key,
                SemesterSection {
                    label: summer_label(year),
                    kind: SectionKind::Summer { year },
                    semesters: members,
                },
            ));
        }
        keyed.sort_by_key(|(key, _)| *key);

        let mut sections: Vec<SemesterSection<'a>> =
            keyed.into_iter().map(|(_, section)| section).collect();
        if !misc.is_empty() {
            sections.push(SemesterSection {
                label: MISC_LABEL.to_string(),
                kind: SectionKind::Miscellaneous,
                semesters: misc,
            });
        }
        sections
    }
}

/// Organize with the default (interleaved) summer placement
#[must_use]
pub fn organize(semesters: &[Semester]) -> Vec<SemesterSection<'_>> {
    Organizer::default().organize(semesters)
}

/// Transient academic-year label of every semester, keyed by semester id
///
/// This is the display-only counterpart of a stored academic-year tag: it
/// always reflects the current semester list.
#[must_use]
pub fn academic_year_labels<'a>(sections: &[SemesterSection<'a>]) -> BTreeMap<&'a str, String> {
    sections
        .iter()
        .flat_map(|section| {
            section
                .semesters
                .iter()
                .map(move |semester| (semester.id.as_str(), section.label.clone()))
        })
        .collect()
}
