//! Reverse search: annual salary range + location → occupations
//!
//! Only level 2 is compared against the range; levels 1, 3 and 4 are reported
//! alongside but never decide a match.

use oflc_common::wage::{to_annual, to_hourly};
use oflc_common::{HourlyLevels, WageLevel};
use tracing::debug;

use super::{is_given, non_blank, place_label, LevelSalary, ReverseQuery, ReverseResult, Searcher};
use crate::error::{ApiError, ApiResult, NotFoundStage};
use crate::matcher::match_locations;

/// The level whose salary is range-checked
const RANGE_LEVEL: WageLevel = WageLevel::Two;

#[derive(Debug, sqlx::FromRow)]
struct SalaryRow {
    soc_code: String,
    title: String,
    #[sqlx(flatten)]
    levels: HourlyLevels,
    label: Option<String>,
}

impl Searcher<'_> {
    /// Occupations in places matching the location whose level 2 annual salary lies
    /// within `[min_salary, max_salary]`
    pub async fn reverse(&self, query: &ReverseQuery) -> ApiResult<Vec<ReverseResult>> {
        let location = query.location.trim();
        if !is_given(query.min_salary) || !is_given(query.max_salary) || location.is_empty() {
            return Err(ApiError::Validation(
                "Salary range and location cannot be empty".to_string(),
            ));
        }
        let county = non_blank(query.county.as_deref());

        let min_hourly = to_hourly(query.min_salary);
        let max_hourly = to_hourly(query.max_salary);

        let places = self
            .bounded(match_locations(self.pool, location, county))
            .await?;
        if places.is_empty() {
            return Err(ApiError::NotFound(NotFoundStage::Locations));
        }
        debug!(
            "reverse: {} place(s), hourly range [{:.4}, {:.4}]",
            places.len(),
            min_hourly,
            max_hourly
        );

        let mut results = Vec::new();

        for place in &places {
            let rows = self
                .bounded(
                    sqlx::query_as::<_, SalaryRow>(
                        r#"
                        SELECT w.soc_code, o.title, w.level1, w.level2, w.level3, w.level4, w.label
                        FROM wage_data w
                        JOIN occupations o ON w.soc_code = o.soc_code
                        WHERE w.area = ?
                          AND w.level2 IS NOT NULL
                          AND w.level2 >= ?
                          AND w.level2 <= ?
                        ORDER BY w.id, o.id
                        "#,
                    )
                    .bind(&place.area)
                    .bind(min_hourly)
                    .bind(max_hourly)
                    .fetch_all(self.pool),
                )
                .await?;

            for row in rows {
                let Some(salary) = to_annual(RANGE_LEVEL.hourly(&row.levels)) else {
                    continue;
                };
                // Rounding to the cent can nudge a boundary value just outside
                if salary < query.min_salary || salary > query.max_salary {
                    continue;
                }

                results.push(ReverseResult {
                    occupation: row.title,
                    soc_code: row.soc_code,
                    location: place_label(&place.area_name, &place.state),
                    county: place.county_town_name.clone(),
                    matching_levels: vec![LevelSalary {
                        level: RANGE_LEVEL,
                        salary,
                    }],
                    levels: row.levels.to_annual(),
                    label: row.label,
                });
            }
        }

        if results.is_empty() {
            return Err(ApiError::NotFound(NotFoundStage::SalaryData));
        }

        Ok(results)
    }
}
