//! Substring matching over occupations and geography
//!
//! A record matches when any of its designated fields contains the query as a
//! case-sensitive substring. The query is taken literally: `%` and `_` typed by a
//! caller are ordinary characters, not wildcards (`instr` rather than `LIKE`).

use serde::Serialize;
use sqlx::SqlitePool;

/// Maximum suggestions returned by autocomplete lookups
pub const SUGGESTION_LIMIT: usize = 20;

/// Distinct occupation matched by title or description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct OccupationMatch {
    pub soc_code: String,
    pub title: String,
}

/// Distinct geography row matched by area name, state, or county/town
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct LocationMatch {
    pub area: String,
    pub area_name: String,
    pub state: String,
    pub county_town_name: String,
}

/// Occupations whose title or description contains `query`
pub async fn match_occupations(
    pool: &SqlitePool,
    query: &str,
) -> sqlx::Result<Vec<OccupationMatch>> {
    sqlx::query_as::<_, OccupationMatch>(
        r#"
        SELECT DISTINCT soc_code, title
        FROM occupations
        WHERE instr(title, ?) > 0 OR instr(description, ?) > 0
        ORDER BY title, soc_code
        "#,
    )
    .bind(query)
    .bind(query)
    .fetch_all(pool)
    .await
}

/// Geography rows whose area name, state, or county/town contains `location`
///
/// With a county refinement, rows must also have a county/town containing it.
pub async fn match_locations(
    pool: &SqlitePool,
    location: &str,
    county: Option<&str>,
) -> sqlx::Result<Vec<LocationMatch>> {
    sqlx::query_as::<_, LocationMatch>(
        r#"
        SELECT DISTINCT area, area_name, state, county_town_name
        FROM geography
        WHERE (instr(area_name, ?) > 0 OR instr(state, ?) > 0 OR instr(county_town_name, ?) > 0)
          AND (? IS NULL OR instr(county_town_name, ?) > 0)
        ORDER BY state, area_name, county_town_name, area
        "#,
    )
    .bind(location)
    .bind(location)
    .bind(location)
    .bind(county)
    .bind(county)
    .fetch_all(pool)
    .await
}

/// Autocomplete rank of a title against a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchTier {
    /// Title starts with the query
    Prefix,
    /// Title contains the query past its start
    Contains,
    /// Anything else
    Other,
}

impl MatchTier {
    pub fn of(title: &str, query: &str) -> Self {
        if title.starts_with(query) {
            MatchTier::Prefix
        } else if title.contains(query) {
            MatchTier::Contains
        } else {
            MatchTier::Other
        }
    }
}

/// Order by tier, then by title
pub fn rank_by_title(mut matches: Vec<OccupationMatch>, query: &str) -> Vec<OccupationMatch> {
    matches.sort_by(|a, b| {
        MatchTier::of(&a.title, query)
            .cmp(&MatchTier::of(&b.title, query))
            .then_with(|| a.title.cmp(&b.title))
    });
    matches
}

/// Occupation autocomplete: titles containing `query`, prefix matches first
pub async fn suggest_occupations(
    pool: &SqlitePool,
    query: &str,
) -> sqlx::Result<Vec<OccupationMatch>> {
    let matches = sqlx::query_as::<_, OccupationMatch>(
        "SELECT DISTINCT soc_code, title FROM occupations WHERE instr(title, ?) > 0",
    )
    .bind(query)
    .fetch_all(pool)
    .await?;

    let mut ranked = rank_by_title(matches, query);
    ranked.truncate(SUGGESTION_LIMIT);
    Ok(ranked)
}
