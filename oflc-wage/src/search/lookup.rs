//! Full-list and autocomplete lookups
//!
//! Autocomplete takes a free-text fragment; a blank fragment returns an empty list
//! without touching the store.

use serde::Serialize;

use super::{non_blank, Searcher};
use crate::error::ApiResult;
use crate::matcher::{self, OccupationMatch, SUGGESTION_LIMIT};

/// Entry of the full location list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct LocationEntry {
    pub state: String,
    pub area_name: String,
}

/// State autocomplete entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct StateSuggestion {
    pub state: String,
    pub state_ab: String,
}

/// County/town autocomplete entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct CountySuggestion {
    #[sqlx(rename = "county_town_name")]
    pub county: String,
}

impl Searcher<'_> {
    /// Every distinct occupation, ordered by title
    pub async fn all_occupations(&self) -> ApiResult<Vec<OccupationMatch>> {
        self.bounded(
            sqlx::query_as::<_, OccupationMatch>(
                "SELECT DISTINCT soc_code, title FROM occupations ORDER BY title",
            )
            .fetch_all(self.pool),
        )
        .await
    }

    /// Every distinct (state, area name), ordered by state then area name
    pub async fn all_locations(&self) -> ApiResult<Vec<LocationEntry>> {
        self.bounded(
            sqlx::query_as::<_, LocationEntry>(
                "SELECT DISTINCT state, area_name FROM geography ORDER BY state, area_name",
            )
            .fetch_all(self.pool),
        )
        .await
    }

    /// Occupation titles containing `fragment`, prefix matches first
    pub async fn suggest_occupations(&self, fragment: &str) -> ApiResult<Vec<OccupationMatch>> {
        let Some(fragment) = non_blank(Some(fragment)) else {
            return Ok(Vec::new());
        };
        self.bounded(matcher::suggest_occupations(self.pool, fragment))
            .await
    }

    /// States whose name or abbreviation contains `fragment`
    pub async fn suggest_states(&self, fragment: &str) -> ApiResult<Vec<StateSuggestion>> {
        let Some(fragment) = non_blank(Some(fragment)) else {
            return Ok(Vec::new());
        };
        self.bounded(
            sqlx::query_as::<_, StateSuggestion>(
                r#"
                SELECT DISTINCT state, state_ab
                FROM geography
                WHERE instr(state, ?) > 0 OR instr(state_ab, ?) > 0
                ORDER BY state
                LIMIT ?
                "#,
            )
            .bind(fragment)
            .bind(fragment)
            .bind(SUGGESTION_LIMIT as i64)
            .fetch_all(self.pool),
        )
        .await
    }

    /// Counties/towns containing `fragment`, optionally within states containing
    /// `state`
    pub async fn suggest_counties(
        &self,
        fragment: &str,
        state: Option<&str>,
    ) -> ApiResult<Vec<CountySuggestion>> {
        let Some(fragment) = non_blank(Some(fragment)) else {
            return Ok(Vec::new());
        };
        let state = non_blank(state);

        self.bounded(
            sqlx::query_as::<_, CountySuggestion>(
                r#"
                SELECT DISTINCT county_town_name
                FROM geography
                WHERE instr(county_town_name, ?) > 0
                  AND (? IS NULL OR instr(state, ?) > 0)
                ORDER BY county_town_name
                LIMIT ?
                "#,
            )
            .bind(fragment)
            .bind(state)
            .bind(state)
            .bind(SUGGESTION_LIMIT as i64)
            .fetch_all(self.pool),
        )
        .await
    }
}
