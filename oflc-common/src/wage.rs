//! Wage levels and hourly/annual unit conversion
//!
//! The reference store keeps every wage figure as an hourly rate. Anything shown
//! to a caller, or supplied by a caller, is an annual salary based on a fixed
//! 2080-hour work year:
//!
//! - hourly → annual: `round(hourly * 2080, 2)`
//! - annual → hourly: `annual / 2080`
//!
//! An absent hourly figure stays absent in annual form; it never becomes zero.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Work hours in a standard year
pub const WORK_HOURS_PER_YEAR: f64 = 2080.0;

/// Round to two decimal places
///
/// Rounds from the exact binary value of `value` to the nearest cent (ties to even),
/// then returns the closest `f64` to that decimal.
pub fn round_cents(value: f64) -> f64 {
    // `{:.2}` rounds the exact binary value; `(v * 100.0).round()` would round the
    // already-inexact product. The formatted text of a finite value always parses,
    // and a non-finite value passes through unchanged.
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Convert a stored hourly figure to an annual salary
pub fn to_annual(hourly: Option<f64>) -> Option<f64> {
    hourly.map(|h| round_cents(h * WORK_HOURS_PER_YEAR))
}

/// Convert a caller-supplied annual salary to an hourly rate for comparison
pub fn to_hourly(annual: f64) -> f64 {
    annual / WORK_HOURS_PER_YEAR
}

/// Survey wage level (entry = One, fully experienced = Four)
///
/// A closed set: every lookup of a level's value goes through [`WageLevel::hourly`],
/// so there is no way to name a column outside `level1..level4`.
///
/// Serializes as the integer 1-4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum WageLevel {
    One,
    Two,
    Three,
    Four,
}

impl WageLevel {
    /// Numeric level (1-4)
    pub fn number(self) -> u8 {
        match self {
            WageLevel::One => 1,
            WageLevel::Two => 2,
            WageLevel::Three => 3,
            WageLevel::Four => 4,
        }
    }

    /// Hourly wage reported for this level, if any
    pub fn hourly(self, levels: &HourlyLevels) -> Option<f64> {
        match self {
            WageLevel::One => levels.level1,
            WageLevel::Two => levels.level2,
            WageLevel::Three => levels.level3,
            WageLevel::Four => levels.level4,
        }
    }
}

impl From<WageLevel> for u8 {
    fn from(level: WageLevel) -> Self {
        level.number()
    }
}

impl TryFrom<u8> for WageLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(WageLevel::One),
            2 => Ok(WageLevel::Two),
            3 => Ok(WageLevel::Three),
            4 => Ok(WageLevel::Four),
            other => Err(format!("wage level must be between 1 and 4, got {}", other)),
        }
    }
}

impl fmt::Display for WageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Level {}", self.number())
    }
}

/// The four hourly level columns of a wage record
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct HourlyLevels {
    pub level1: Option<f64>,
    pub level2: Option<f64>,
    pub level3: Option<f64>,
    pub level4: Option<f64>,
}

impl HourlyLevels {
    /// Convert all four levels to annual salaries
    pub fn to_annual(&self) -> AnnualLevels {
        AnnualLevels {
            level1: to_annual(self.level1),
            level2: to_annual(self.level2),
            level3: to_annual(self.level3),
            level4: to_annual(self.level4),
        }
    }
}

/// The four level columns converted to annual salaries
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnualLevels {
    pub level1: Option<f64>,
    pub level2: Option<f64>,
    pub level3: Option<f64>,
    pub level4: Option<f64>,
}
