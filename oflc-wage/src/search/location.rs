//! Location search: job title + target level/salary → places that reach it
//!
//! For each matching occupation, wage rows whose target-level value reaches the
//! target are grouped by (state, county/town). Each group is represented by the row
//! with the lowest qualifying target-level value, and every level reported for the
//! group comes from that same row.

use oflc_common::wage::{round_cents, to_hourly, WORK_HOURS_PER_YEAR};
use oflc_common::{HourlyLevels, WageLevel};
use std::collections::HashMap;
use tracing::debug;

use super::{is_given, LocationQuery, LocationResult, Searcher};
use crate::dedup::{Deduplicator, LocationKey};
use crate::error::{ApiError, ApiResult, NotFoundStage};
use crate::matcher::match_occupations;

#[derive(Debug, sqlx::FromRow)]
struct PlacedWage {
    state: String,
    county_town_name: String,
    #[sqlx(flatten)]
    levels: HourlyLevels,
    label: Option<String>,
}

/// Cheapest qualifying row of one (state, county/town) group
#[derive(Debug)]
struct GroupMin {
    target_hourly: f64,
    row: PlacedWage,
}

impl Searcher<'_> {
    /// Places where the chosen level reaches the target salary, ordered ascending by
    /// the lowest qualifying salary
    pub async fn location(&self, query: &LocationQuery) -> ApiResult<Vec<LocationResult>> {
        let position = query.position.trim();
        let level = u8::try_from(query.target_level)
            .ok()
            .and_then(|n| WageLevel::try_from(n).ok());
        let level = match level {
            Some(level) if !position.is_empty() && is_given(query.target_salary) => level,
            _ => {
                return Err(ApiError::Validation(
                    "Job title, target level and target salary cannot be empty".to_string(),
                ))
            }
        };

        let target_hourly = to_hourly(query.target_salary);

        let occupations = self.bounded(match_occupations(self.pool, position)).await?;
        if occupations.is_empty() {
            return Err(ApiError::NotFound(NotFoundStage::Occupations));
        }
        debug!(
            "location: {} occupation(s), {} >= {:.4}/h",
            occupations.len(),
            level,
            target_hourly
        );

        let mut results = Vec::new();
        let mut seen = Deduplicator::new();

        for occupation in &occupations {
            let rows = self
                .bounded(
                    sqlx::query_as::<_, PlacedWage>(
                        r#"
                        SELECT g.state, g.county_town_name,
                               w.level1, w.level2, w.level3, w.level4, w.label
                        FROM wage_data w
                        JOIN geography g ON w.area = g.area
                        WHERE w.soc_code = ?
                        ORDER BY w.id, g.id
                        "#,
                    )
                    .bind(&occupation.soc_code)
                    .fetch_all(self.pool),
                )
                .await?;

            for group in cheapest_per_place(rows, level, target_hourly) {
                let key = LocationKey {
                    title: occupation.title.clone(),
                    state: group.row.state.clone(),
                    county_town: group.row.county_town_name.clone(),
                };
                if !seen.first_sighting(key) {
                    continue;
                }

                results.push(LocationResult {
                    occupation: occupation.title.clone(),
                    soc_code: occupation.soc_code.clone(),
                    location: group.row.state,
                    county: group.row.county_town_name,
                    target_level: level,
                    target_level_salary: round_cents(group.target_hourly * WORK_HOURS_PER_YEAR),
                    levels: group.row.levels.to_annual(),
                    label: group.row.label,
                });
            }
        }

        if results.is_empty() {
            return Err(ApiError::NotFound(NotFoundStage::Locations));
        }

        // Stable: equal salaries keep occupation order
        results.sort_by(|a, b| a.target_level_salary.total_cmp(&b.target_level_salary));
        Ok(results)
    }
}

/// Keep, per (state, county/town), the row with the lowest target-level value that
/// reaches `target_hourly`; groups come back ascending by that value
///
/// On ties the earlier row wins, and equal groups keep first-seen order.
fn cheapest_per_place(rows: Vec<PlacedWage>, level: WageLevel, target_hourly: f64) -> Vec<GroupMin> {
    let mut groups: Vec<GroupMin> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for row in rows {
        let Some(value) = level.hourly(&row.levels) else {
            continue;
        };
        if value < target_hourly {
            continue;
        }

        let place = (row.state.clone(), row.county_town_name.clone());
        match index.get(&place) {
            Some(&i) => {
                if value < groups[i].target_hourly {
                    groups[i] = GroupMin {
                        target_hourly: value,
                        row,
                    };
                }
            }
            None => {
                index.insert(place, groups.len());
                groups.push(GroupMin {
                    target_hourly: value,
                    row,
                });
            }
        }
    }

    groups.sort_by(|a, b| a.target_hourly.total_cmp(&b.target_hourly));
    groups
}
