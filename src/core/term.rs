//! Term-code and cohort-label arithmetic
//!
//! A term code is six digits: a four-digit calendar year followed by a
//! two-digit season suffix (`202580` is fall 2025). Every cohort label used to
//! filter the cohort table is built here and nowhere else.

use super::errors::{MetricsError, Result};
use std::fmt;
use std::str::FromStr;

/// Literal suffix of a first-time, full-time fall cohort label
pub const COHORT_SUFFIX: &str = "Fall, Full-Time";

/// Literal suffix of an incoming-transfer, full-time fall cohort label
pub const TRANSFER_COHORT_SUFFIX: &str = "Fall, Transfer, Full-Time";

/// Season encoded by the last two digits of a term code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    /// Suffix `10`
    Spring,
    /// Suffix `50`
    Summer,
    /// Suffix `80`
    Fall,
}

impl Season {
    /// Parse a two-digit term suffix
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "10" => Some(Self::Spring),
            "50" => Some(Self::Summer),
            "80" => Some(Self::Fall),
            _ => None,
        }
    }

    /// Two-digit suffix used in term codes
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Spring => "10",
            Self::Summer => "50",
            Self::Fall => "80",
        }
    }

    /// Offset from the term's calendar year to the year its academic year
    /// starts in. Fall opens an academic year; spring and summer close the
    /// one that opened the previous fall.
    #[must_use]
    pub const fn academic_year_offset(self) -> i32 {
        match self {
            Self::Fall => 0,
            Self::Spring | Self::Summer => -1,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spring => write!(f, "Spring"),
            Self::Summer => write!(f, "Summer"),
            Self::Fall => write!(f, "Fall"),
        }
    }
}

/// A validated six-digit term code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Term {
    year: u16,
    season: Season,
}

impl Term {
    /// Build a term from its parts
    ///
    /// # Errors
    /// Returns `InvalidTerm` if the year needs more than four digits.
    pub fn new(year: i32, season: Season) -> Result<Self> {
        let year = u16::try_from(year)
            .ok()
            .filter(|y| *y <= 9999)
            .ok_or_else(|| {
                MetricsError::invalid_term(
                    format!("{year}{}", season.suffix()),
                    "year must be between 0000 and 9999",
                )
            })?;
        Ok(Self { year, season })
    }

    /// Calendar year (the leading four digits)
    #[must_use]
    pub const fn calendar_year(&self) -> u16 {
        self.year
    }

    /// Season encoded by the suffix
    #[must_use]
    pub const fn season(&self) -> Season {
        self.season
    }

    /// Two-digit suffix
    #[must_use]
    pub const fn suffix(&self) -> &'static str {
        self.season.suffix()
    }

    /// Calendar year in which this term's academic year starts
    #[must_use]
    pub fn academic_start_year(&self) -> i32 {
        i32::from(self.year) + self.season.academic_year_offset()
    }

    /// Academic year this term belongs to, e.g. `2025-2026` for `202580`
    /// and for `202610`
    #[must_use]
    pub fn academic_year(&self) -> AcademicYear {
        AcademicYear {
            start: self.academic_start_year(),
        }
    }

    /// Shift by whole academic years, keeping the season
    ///
    /// # Errors
    /// Returns `InvalidTerm` if the shifted year leaves `0000..=9999`.
    pub fn shifted(&self, years: i32) -> Result<Self> {
        Self::new(i32::from(self.year) + years, self.season)
    }
}

impl FromStr for Term {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim();
        if code.len() != 6 || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MetricsError::invalid_term(s, "expected six digits (YYYYSS)"));
        }
        let (year, suffix) = code.split_at(4);
        let season = Season::from_suffix(suffix).ok_or_else(|| {
            MetricsError::invalid_term(
                s,
                format!("unknown term suffix '{suffix}' (expected 10, 50 or 80)"),
            )
        })?;
        let year = year
            .parse::<i32>()
            .map_err(|e| MetricsError::invalid_term(s, e.to_string()))?;
        Self::new(year, season)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{}", self.year, self.season.suffix())
    }
}

/// An academic year such as `2025-2026`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AcademicYear {
    start: i32,
}

impl AcademicYear {
    /// First calendar year of the span
    #[must_use]
    pub const fn start_year(&self) -> i32 {
        self.start
    }

    /// Fiscal year label, the trailing calendar year (`2026` for `2025-2026`)
    #[must_use]
    pub fn fiscal_year(&self) -> String {
        format!("{:04}", self.start + 1)
    }
}

impl FromStr for AcademicYear {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || MetricsError::InvalidAcademicYear(s.to_string());
        let (first, second) = s.trim().split_once('-').ok_or_else(invalid)?;
        if first.len() != 4 || second.len() != 4 {
            return Err(invalid());
        }
        let start = first.parse::<i32>().map_err(|_| invalid())?;
        let end = second.parse::<i32>().map_err(|_| invalid())?;
        if end != start + 1 {
            return Err(invalid());
        }
        Ok(Self { start })
    }
}

impl fmt::Display for AcademicYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:04}", self.start, self.start + 1)
    }
}

/// Academic (aid) year label for a term.
///
/// Returns the year the term's academic year starts in, either as four
/// digits (`"2025"`) or as a two-digit shorthand (`"25"`).
///
/// | suffix | label for `YYYY` + suffix |
/// |---|---|
/// | `80` fall | `YYYY` |
/// | `10` spring | `YYYY - 1` |
/// | `50` summer | `YYYY - 1` |
#[must_use]
pub fn academic_year_from_term(term: &Term, two_digit: bool) -> String {
    let year = term.academic_start_year();
    if two_digit {
        format!("{:02}", year.rem_euclid(100))
    } else {
        format!("{year:04}")
    }
}

/// First-time, full-time cohort label for the term's leading year,
/// e.g. `"2025 Fall, Full-Time"`
#[must_use]
pub fn construct_cohort(term: &Term) -> String {
    format!("{:04} {COHORT_SUFFIX}", term.calendar_year())
}

/// Incoming-transfer cohort label for the term's leading year,
/// e.g. `"2025 Fall, Transfer, Full-Time"`
#[must_use]
pub fn construct_transfer_cohort(term: &Term) -> String {
    format!("{:04} {TRANSFER_COHORT_SUFFIX}", term.calendar_year())
}

/// Shift a term by `years` academic years, preserving its suffix
///
/// # Errors
/// Returns `InvalidTerm` if the shifted year leaves `0000..=9999`.
pub fn adjust_term(term: &Term, years: i32) -> Result<Term> {
    term.shifted(years)
}
