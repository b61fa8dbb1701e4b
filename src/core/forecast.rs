//! GPA forecast over the remaining regular terms
//!
//! Starting after the latest Fall or Spring semester, alternating Fall/Spring
//! terms are projected until the Spring of the senior year. Each projected
//! term carries a band: the average drifts from the last semester GPA toward
//! the mean semester GPA over [`FORECAST_HORIZON`] terms, and the high/low
//! bounds narrow around the last GPA as the forecast advances.

use crate::core::grades::{round2, MAX_GPA};
use crate::core::models::{Season, Semester, TermTag};
use crate::core::organizer::{year_label, Organizer, SectionKind, SemesterSection};
use serde::Serialize;

/// Number of projected terms over which the average reaches the mean GPA
pub const FORECAST_HORIZON: usize = 6;

/// Initial distance of the high/low bounds from the last GPA
const BAND_SPREAD: f64 = 0.4;

/// How much the bounds tighten over the full horizon
const BAND_NARROWING: f64 = 0.1;

/// Academic-year index of the senior year
const SENIOR_INDEX: usize = 3;

/// Projected GPA range for one term
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GpaBand {
    /// Lower bound
    pub low: f64,
    /// Expected GPA
    pub avg: f64,
    /// Upper bound
    pub high: f64,
}

impl GpaBand {
    /// Band `step` terms into the forecast
    #[must_use]
    pub fn at_step(step: usize, last_gpa: f64, mean_gpa: f64) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let progress = (step as f64 / FORECAST_HORIZON as f64).min(1.0);
        Self {
            low: round2((last_gpa - BAND_SPREAD + BAND_NARROWING * progress).max(0.0)),
            avg: round2((mean_gpa - last_gpa).mul_add(progress, last_gpa)),
            high: round2((last_gpa + BAND_SPREAD - BAND_NARROWING * progress).min(MAX_GPA)),
        }
    }
}

/// One future term
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedTerm {
    /// Season and year of the term
    pub term: TermTag,
    /// Academic-year label the term falls in
    pub year_label: String,
    /// Projected GPA range
    pub band: GpaBand,
}

/// Result of a forecast run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Forecast {
    /// GPA of the latest dated, graded semester
    pub last_gpa: f64,
    /// Mean of the dated, graded semester GPAs
    pub mean_gpa: f64,
    /// Terms left until graduation, in order
    pub terms: Vec<ProjectedTerm>,
}

impl Forecast {
    /// Whether nothing is left to project
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Project the remaining terms for `semesters`
///
/// The GPAs come from dated semesters with credits, taken in term order;
/// undated semesters never count. An empty forecast is returned when nothing
/// dated is graded, when no Fall or Spring semester can be dated, or when the
/// latest one is already a senior Spring.
#[must_use]
pub fn forecast(semesters: &[Semester], organizer: &Organizer) -> Forecast {
    let mut dated: Vec<(TermTag, f64)> = semesters
        .iter()
        .filter(|semester| semester.total_credits > 0.0)
        .filter_map(|semester| semester.term_tag().map(|tag| (tag, semester.gpa)))
        .collect();
    dated.sort_by_key(|&(tag, _)| tag);
    let graded: Vec<f64> = dated.into_iter().map(|(_, gpa)| gpa).collect();

    let Some(&last_gpa) = graded.last() else {
        return Forecast::default();
    };
    #[allow(clippy::cast_precision_loss)]
    let mean_gpa = round2(graded.iter().sum::<f64>() / graded.len() as f64);

    let mut result = Forecast {
        last_gpa,
        mean_gpa,
        terms: Vec::new(),
    };

    let sections = organizer.organize(semesters);
    let Some((mut term, mut index)) = anchor(&sections) else {
        return result;
    };

    while !(term.season == Season::Spring && index >= SENIOR_INDEX) {
        (term, index) = next_regular_term(term, index);
        let band = GpaBand::at_step(result.terms.len(), last_gpa, mean_gpa);
        result.terms.push(ProjectedTerm {
            term,
            year_label: year_label(index),
            band,
        });
    }

    result
}

/// Latest Fall or Spring term and the rank of its academic year
fn anchor(sections: &[SemesterSection<'_>]) -> Option<(TermTag, usize)> {
    sections
        .iter()
        .filter_map(|section| match section.kind {
            SectionKind::AcademicYear { index, .. } => Some((section, index)),
            _ => None,
        })
        .flat_map(|(section, index)| {
            section
                .semesters
                .iter()
                .filter_map(|semester| semester.term_tag())
                .filter(|tag| matches!(tag.season, Season::Fall | Season::Spring))
                .map(move |tag| (tag, index))
        })
        .max_by_key(|(tag, _)| *tag)
}

/// Fall Y is followed by Spring Y+1 in the same academic year; Spring Y by
/// Fall Y in the next one
const fn next_regular_term(term: TermTag, index: usize) -> (TermTag, usize) {
    match term.season {
        Season::Fall => (TermTag::new(Season::Spring, term.year + 1), index),
        _ => (TermTag::new(Season::Fall, term.year), index + 1),
    }
}
