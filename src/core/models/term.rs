//! Term tag model
//!
//! A semester's chronological position is a `(season, year)` pair. The tag is
//! inferred once from the free-text semester name and stored on the record, so
//! later renames do not move the semester around.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Matches a season word followed by a four-digit year ("Fall 2023", "spring  2024")
static TERM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(spring|summer|fall|winter)\s+(\d{4})\b").expect("valid term regex")
});

/// Season of an academic term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    /// Spring term (January to May)
    Spring,
    /// Summer term
    Summer,
    /// Fall term, the start of an academic year
    Fall,
    /// Winter term, sorted after Fall of the same calendar year
    Winter,
}

impl Season {
    /// Position of the season inside one calendar year
    #[must_use]
    pub const fn calendar_rank(self) -> u8 {
        match self {
            Self::Spring => 1,
            Self::Summer => 2,
            Self::Fall => 3,
            Self::Winter => 4,
        }
    }

    /// Display name ("Spring", "Fall", ...)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spring => "Spring",
            Self::Summer => "Summer",
            Self::Fall => "Fall",
            Self::Winter => "Winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spring" => Ok(Self::Spring),
            "summer" => Ok(Self::Summer),
            "fall" | "autumn" => Ok(Self::Fall),
            "winter" => Ok(Self::Winter),
            _ => Err(format!("Unknown season: '{s}'")),
        }
    }
}

/// Structured `(season, year)` tag of a semester
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TermTag {
    /// Season of the term
    pub season: Season,
    /// Calendar year the term takes place in
    pub year: i32,
}

impl TermTag {
    /// Create a new term tag
    #[must_use]
    pub const fn new(season: Season, year: i32) -> Self {
        Self { season, year }
    }

    /// Extract a term tag from free text such as "Fall 2023 (co-op)"
    ///
    /// Returns `None` when the text holds no season word followed by a year.
    #[must_use]
    pub fn infer(text: &str) -> Option<Self> {
        let caps = TERM_RE.captures(text)?;
        let season = caps.get(1)?.as_str().parse().ok()?;
        let year = caps.get(2)?.as_str().parse().ok()?;
        Some(Self { season, year })
    }

    /// Whether this is a summer term
    #[must_use]
    pub fn is_summer(self) -> bool {
        self.season == Season::Summer
    }

    /// Start year of the academic year this term belongs to
    ///
    /// Academic years are anchored on Fall: Fall Y and Winter Y open year Y,
    /// while Spring Y and Summer Y close year Y - 1.
    #[must_use]
    pub const fn academic_year(self) -> i32 {
        match self.season {
            Season::Fall | Season::Winter => self.year,
            Season::Spring | Season::Summer => self.year - 1,
        }
    }

    /// Chronological sort key
    #[must_use]
    pub const fn sort_key(self) -> (i32, u8) {
        (self.year, self.season.calendar_rank())
    }
}

impl Ord for TermTag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for TermTag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TermTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.season, self.year)
    }
}
