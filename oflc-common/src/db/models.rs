//! Reference store record models
//!
//! All three record kinds are bulk-loaded once from CSV and read-only afterwards.

use crate::wage::HourlyLevels;
use serde::{Deserialize, Serialize};

/// Prevailing wage levels for one (area, occupation) pair
///
/// Level columns are hourly and may be absent when the survey reported no wage at
/// that percentile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WageRecord {
    pub area: String,
    pub soc_code: String,
    pub geo_lvl: Option<i64>,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub levels: HourlyLevels,
    pub average: Option<f64>,
    pub label: Option<String>,
}

/// Geography metadata for one wage-survey area row
///
/// `area` joins to [`WageRecord::area`]. One area may appear on several rows, one per
/// county/town it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct GeographyRecord {
    pub area: String,
    pub area_name: String,
    pub state_ab: String,
    pub state: String,
    pub county_town_name: String,
}

/// Occupation title and description keyed by SOC code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct OccupationRecord {
    pub soc_code: String,
    pub title: String,
    pub description: Option<String>,
}
