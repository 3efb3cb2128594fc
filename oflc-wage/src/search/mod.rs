//! Wage search operations
//!
//! Three independent query shapes, each a single pass from request to response:
//! - forward: job title + location → wage levels
//! - reverse: annual salary range + location → occupations whose level 2 falls in range
//! - location: job title + target level/salary → places that reach it, cheapest first
//!
//! Plus the supporting full-list and autocomplete lookups. Every store lookup is
//! bounded by the searcher's timeout.

mod forward;
mod location;
mod lookup;
mod reverse;

pub use lookup::{CountySuggestion, LocationEntry, StateSuggestion};

use oflc_common::{AnnualLevels, WageLevel};
use serde::{de, Deserialize, Deserializer, Serialize};
use sqlx::SqlitePool;
use std::future::Future;
use std::time::Duration;

use crate::error::{ApiError, ApiResult};

/// Runs searches against one store reader
#[derive(Debug, Clone, Copy)]
pub struct Searcher<'a> {
    pool: &'a SqlitePool,
    timeout: Duration,
}

impl<'a> Searcher<'a> {
    pub fn new(pool: &'a SqlitePool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// Await a store lookup, failing with `Timeout` once the bound elapses
    async fn bounded<T>(&self, lookup: impl Future<Output = sqlx::Result<T>>) -> ApiResult<T> {
        match tokio::time::timeout(self.timeout, lookup).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(ApiError::Timeout(self.timeout)),
        }
    }
}

/// Forward search request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForwardQuery {
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub county: Option<String>,
}

/// Reverse search request (annual salaries)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReverseQuery {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub min_salary: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub max_salary: f64,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub county: Option<String>,
}

/// Location search request (annual target salary)
#[derive(Debug, Clone, Deserialize)]
pub struct LocationQuery {
    #[serde(default)]
    pub position: String,
    #[serde(default = "default_target_level", deserialize_with = "lenient_level")]
    pub target_level: i64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub target_salary: f64,
}

fn default_target_level() -> i64 {
    2
}

/// A JSON number or a string holding one (form-driven clients send `"60000"`)
#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Number(f64),
    Text(String),
}

/// Read a number or numeric string; `null` and blank strings read as 0 (not given)
fn read_numeric<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Option::<Numeric>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(Numeric::Number(value)) => Ok(value),
        Some(Numeric::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(0.0);
            }
            text.parse()
                .map_err(|_| de::Error::custom(format!("expected a number, got {:?}", text)))
        }
    }
}

fn lenient_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    read_numeric(deserializer)
}

fn lenient_level<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = read_numeric(deserializer)?;
    if value.fract() != 0.0 || !(i64::MIN as f64..=i64::MAX as f64).contains(&value) {
        return Err(de::Error::custom(format!(
            "expected a whole level number, got {}",
            value
        )));
    }
    Ok(value as i64)
}

/// Forward search result row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForwardResult {
    pub occupation: String,
    pub soc_code: String,
    /// "area name, state"
    pub location: String,
    pub county: String,
    #[serde(flatten)]
    pub levels: AnnualLevels,
    pub label: Option<String>,
}

/// One level whose salary satisfied the reverse search range
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelSalary {
    pub level: WageLevel,
    pub salary: f64,
}

/// Reverse search result row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReverseResult {
    pub occupation: String,
    pub soc_code: String,
    /// "area name, state"
    pub location: String,
    pub county: String,
    pub matching_levels: Vec<LevelSalary>,
    #[serde(flatten)]
    pub levels: AnnualLevels,
    pub label: Option<String>,
}

/// Location search result row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationResult {
    pub occupation: String,
    pub soc_code: String,
    /// State name only
    pub location: String,
    pub county: String,
    pub target_level: WageLevel,
    pub target_level_salary: f64,
    #[serde(flatten)]
    pub levels: AnnualLevels,
    pub label: Option<String>,
}

/// Trimmed value, or `None` when blank
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// A caller-supplied amount counts as given when it is finite and non-zero
fn is_given(amount: f64) -> bool {
    amount.is_finite() && amount != 0.0
}

fn place_label(area_name: &str, state: &str) -> String {
    format!("{}, {}", area_name, state)
}
