//! Forward search: job title + location → wage levels

use oflc_common::HourlyLevels;
use std::collections::HashMap;
use tracing::debug;

use super::{non_blank, place_label, ForwardQuery, ForwardResult, Searcher};
use crate::dedup::{Deduplicator, ForwardKey};
use crate::error::{ApiError, ApiResult, NotFoundStage};
use crate::matcher::{match_locations, match_occupations};

#[derive(Debug, sqlx::FromRow)]
struct AreaWage {
    area: String,
    #[sqlx(flatten)]
    levels: HourlyLevels,
    label: Option<String>,
}

impl Searcher<'_> {
    /// Wage levels for every occupation matching the position in every place
    /// matching the location (and county, when given)
    pub async fn forward(&self, query: &ForwardQuery) -> ApiResult<Vec<ForwardResult>> {
        let position = query.position.trim();
        let location = query.location.trim();
        if position.is_empty() || location.is_empty() {
            return Err(ApiError::Validation(
                "Job title and location cannot be empty".to_string(),
            ));
        }
        let county = non_blank(query.county.as_deref());

        let occupations = self.bounded(match_occupations(self.pool, position)).await?;
        if occupations.is_empty() {
            return Err(ApiError::NotFound(NotFoundStage::Occupations));
        }

        let places = self
            .bounded(match_locations(self.pool, location, county))
            .await?;
        debug!(
            "forward: {} occupation(s) x {} place(s) for {:?} in {:?}",
            occupations.len(),
            places.len(),
            position,
            location
        );

        let mut results = Vec::new();
        let mut seen = Deduplicator::new();

        for occupation in &occupations {
            if places.is_empty() {
                break;
            }
            let wages = self.first_wage_per_area(&occupation.soc_code).await?;

            for place in &places {
                let Some(wage) = wages.get(place.area.as_str()) else {
                    continue;
                };

                let key = ForwardKey {
                    title: occupation.title.clone(),
                    area_name: place.area_name.clone(),
                    state: place.state.clone(),
                    county_town: place.county_town_name.clone(),
                };
                if !seen.first_sighting(key) {
                    continue;
                }

                results.push(ForwardResult {
                    occupation: occupation.title.clone(),
                    soc_code: occupation.soc_code.clone(),
                    location: place_label(&place.area_name, &place.state),
                    county: place.county_town_name.clone(),
                    levels: wage.levels.to_annual(),
                    label: wage.label.clone(),
                });
            }
        }

        if results.is_empty() {
            return Err(ApiError::NotFound(NotFoundStage::WageData));
        }

        Ok(results)
    }

    /// First-loaded wage record per area for one occupation
    async fn first_wage_per_area(&self, soc_code: &str) -> ApiResult<HashMap<String, AreaWage>> {
        let rows = self
            .bounded(
                sqlx::query_as::<_, AreaWage>(
                    r#"
                    SELECT area, level1, level2, level3, level4, label
                    FROM wage_data
                    WHERE soc_code = ?
                    ORDER BY id
                    "#,
                )
                .bind(soc_code)
                .fetch_all(self.pool),
            )
            .await?;

        let mut by_area = HashMap::with_capacity(rows.len());
        for row in rows {
            by_area.entry(row.area.clone()).or_insert(row);
        }
        Ok(by_area)
    }
}
