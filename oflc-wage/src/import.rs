//! CSV import into the reference store
//!
//! Three source files feed the store. Columns are taken by position; header names
//! are ignored:
//!
//! | file               | columns                                                            |
//! |--------------------|--------------------------------------------------------------------|
//! | `ALC_Export.csv`   | area, soc_code, geo_lvl, level1, level2, level3, level4, average, label |
//! | `Geography.csv`    | area, area_name, state_ab, state, county_town_name                 |
//! | `oes_soc_occs.csv` | soc_code, title, description                                       |
//!
//! Empty or non-numeric numeric cells load as NULL.

use oflc_common::db::models::{GeographyRecord, OccupationRecord, WageRecord};
use oflc_common::db::{table_counts, TableCounts};
use oflc_common::{Error, HourlyLevels, Result};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Wage levels export file name
pub const WAGE_FILE: &str = "ALC_Export.csv";
/// Geography file name
pub const GEOGRAPHY_FILE: &str = "Geography.csv";
/// Occupations file name
pub const OCCUPATIONS_FILE: &str = "oes_soc_occs.csv";

/// Locations of the three source CSV files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    pub wage_csv: PathBuf,
    pub geography_csv: PathBuf,
    pub occupations_csv: PathBuf,
}

impl DataSources {
    /// Standard file names inside `dir`
    pub fn from_dir(dir: &Path) -> Self {
        Self {
            wage_csv: dir.join(WAGE_FILE),
            geography_csv: dir.join(GEOGRAPHY_FILE),
            occupations_csv: dir.join(OCCUPATIONS_FILE),
        }
    }

    fn all(&self) -> [&Path; 3] {
        [&self.wage_csv, &self.geography_csv, &self.occupations_csv]
    }

    /// Fail with a configuration error naming every missing file
    pub fn verify(&self) -> Result<()> {
        let missing: Vec<String> = self
            .all()
            .iter()
            .filter(|path| !path.exists())
            .map(|path| path.display().to_string())
            .collect();

        if missing.is_empty() {
            for path in self.all() {
                debug!("Source file present: {}", path.display());
            }
            Ok(())
        } else {
            Err(Error::Config(format!(
                "Missing source file(s): {}",
                missing.join(", ")
            )))
        }
    }
}

/// Parsed contents of all three sources
#[derive(Debug, Default)]
pub struct SourceData {
    pub wages: Vec<WageRecord>,
    pub geography: Vec<GeographyRecord>,
    pub occupations: Vec<OccupationRecord>,
}

/// Read and parse all three sources (blocking)
pub fn read_sources(sources: &DataSources) -> Result<SourceData> {
    info!("Reading {}...", sources.wage_csv.display());
    let wages = read_rows(&sources.wage_csv, parse_wage_row)?;
    info!("Wage rows: {}", wages.len());

    info!("Reading {}...", sources.geography_csv.display());
    let geography = read_rows(&sources.geography_csv, parse_geography_row)?;
    info!("Geography rows: {}", geography.len());

    info!("Reading {}...", sources.occupations_csv.display());
    let occupations = read_rows(&sources.occupations_csv, parse_occupation_row)?;
    info!("Occupation rows: {}", occupations.len());

    Ok(SourceData {
        wages,
        geography,
        occupations,
    })
}

/// Read sources on a blocking thread and load them into an empty store
///
/// All inserts share one transaction. Returns the row counts read back from the
/// store afterwards.
pub async fn import_all(pool: &SqlitePool, sources: &DataSources) -> Result<TableCounts> {
    sources.verify()?;

    let owned = sources.clone();
    let data = tokio::task::spawn_blocking(move || read_sources(&owned))
        .await
        .map_err(|e| Error::Internal(format!("CSV reader task failed: {}", e)))??;

    load(pool, &data).await?;

    let counts = table_counts(pool).await?;
    info!(
        "Import complete: wage_data={}, geography={}, occupations={}",
        counts.wage_data, counts.geography, counts.occupations
    );
    Ok(counts)
}

/// Insert parsed rows into the store in one transaction
pub async fn load(pool: &SqlitePool, data: &SourceData) -> Result<()> {
    let mut tx = pool.begin().await?;

    info!("Importing wage data...");
    for row in &data.wages {
        sqlx::query(
            "INSERT INTO wage_data (area, soc_code, geo_lvl, level1, level2, level3, level4, average, label)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&row.area)
        .bind(&row.soc_code)
        .bind(row.geo_lvl)
        .bind(row.levels.level1)
        .bind(row.levels.level2)
        .bind(row.levels.level3)
        .bind(row.levels.level4)
        .bind(row.average)
        .bind(&row.label)
        .execute(&mut *tx)
        .await?;
    }

    info!("Importing geography...");
    for row in &data.geography {
        sqlx::query(
            "INSERT INTO geography (area, area_name, state_ab, state, county_town_name)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&row.area)
        .bind(&row.area_name)
        .bind(&row.state_ab)
        .bind(&row.state)
        .bind(&row.county_town_name)
        .execute(&mut *tx)
        .await?;
    }

    info!("Importing occupations...");
    for row in &data.occupations {
        sqlx::query("INSERT INTO occupations (soc_code, title, description) VALUES (?, ?, ?)")
            .bind(&row.soc_code)
            .bind(&row.title)
            .bind(&row.description)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}

fn read_rows<T>(path: &Path, parse: fn(&Fields) -> T) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    let mut record = csv::ByteRecord::new();
    while reader.read_byte_record(&mut record)? {
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        rows.push(parse(&Fields(&record)));
    }

    if rows.is_empty() {
        warn!("{} contains no data rows", path.display());
    }

    Ok(rows)
}

/// Positional view over one CSV record
struct Fields<'a>(&'a csv::ByteRecord);

impl Fields<'_> {
    fn text(&self, index: usize) -> String {
        self.0
            .get(index)
            .map(|bytes| String::from_utf8_lossy(bytes).trim().to_string())
            .unwrap_or_default()
    }

    fn optional_text(&self, index: usize) -> Option<String> {
        Some(self.text(index)).filter(|s| !s.is_empty())
    }

    fn real(&self, index: usize) -> Option<f64> {
        self.text(index)
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }

    fn integer(&self, index: usize) -> Option<i64> {
        let text = self.text(index);
        text.parse::<i64>()
            .ok()
            .or_else(|| text.parse::<f64>().ok().filter(|v| v.fract() == 0.0).map(|v| v as i64))
    }
}

fn parse_wage_row(f: &Fields) -> WageRecord {
    WageRecord {
        area: f.text(0),
        soc_code: f.text(1),
        geo_lvl: f.integer(2),
        levels: HourlyLevels {
            level1: f.real(3),
            level2: f.real(4),
            level3: f.real(5),
            level4: f.real(6),
        },
        average: f.real(7),
        label: f.optional_text(8),
    }
}

fn parse_geography_row(f: &Fields) -> GeographyRecord {
    GeographyRecord {
        area: f.text(0),
        area_name: f.text(1),
        state_ab: f.text(2),
        state: f.text(3),
        county_town_name: f.text(4),
    }
}

fn parse_occupation_row(f: &Fields) -> OccupationRecord {
    OccupationRecord {
        soc_code: f.text(0),
        title: f.text(1),
        description: f.optional_text(2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_wage_rows_parse_positionally() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            WAGE_FILE,
            "Area,SocCode,GeoLvl,Level1,Level2,Level3,Level4,Average,Label\n\
             0001,11-1021,1,20.0,30.0,40.0,50.0,35.0,OES\n\
             0002,11-1021,2,,31.5,,,,\n",
        );

        let rows = read_rows(&path, parse_wage_row).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].area, "0001");
        assert_eq!(rows[0].soc_code, "11-1021");
        assert_eq!(rows[0].geo_lvl, Some(1));
        assert_eq!(rows[0].levels.level2, Some(30.0));
        assert_eq!(rows[0].average, Some(35.0));
        assert_eq!(rows[0].label.as_deref(), Some("OES"));

        assert_eq!(rows[1].levels.level1, None);
        assert_eq!(rows[1].levels.level2, Some(31.5));
        assert_eq!(rows[1].levels.level4, None);
        assert_eq!(rows[1].label, None);
    }

    #[test]
    fn test_quoted_description_with_commas() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            OCCUPATIONS_FILE,
            "soc,title,desc\n11-1021,General Manager,\"Plan, direct, or coordinate\"\n",
        );

        let rows = read_rows(&path, parse_occupation_row).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "General Manager");
        assert_eq!(
            rows[0].description.as_deref(),
            Some("Plan, direct, or coordinate")
        );
    }

    #[test]
    fn test_short_rows_and_blank_lines_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            GEOGRAPHY_FILE,
            "a,b,c,d,e\n0001,Irvine,CA\n,,,,\n",
        );

        let rows = read_rows(&path, parse_geography_row).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].state_ab, "CA");
        assert_eq!(rows[0].state, "");
        assert_eq!(rows[0].county_town_name, "");
    }

    #[test]
    fn test_non_numeric_levels_load_as_null() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            WAGE_FILE,
            "h1,h2,h3,h4,h5,h6,h7,h8,h9\n0001,11-1021,1.0,n/a,30,NaN,40,,x\n",
        );

        let rows = read_rows(&path, parse_wage_row).unwrap();

        assert_eq!(rows[0].geo_lvl, Some(1));
        assert_eq!(rows[0].levels.level1, None);
        assert_eq!(rows[0].levels.level2, Some(30.0));
        assert_eq!(rows[0].levels.level3, None);
        assert_eq!(rows[0].levels.level4, Some(40.0));
    }

    #[test]
    fn test_verify_lists_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), GEOGRAPHY_FILE, "a\n");

        let sources = DataSources::from_dir(dir.path());
        let err = sources.verify().unwrap_err().to_string();

        assert!(err.contains(WAGE_FILE), "{}", err);
        assert!(err.contains(OCCUPATIONS_FILE), "{}", err);
        assert!(!err.contains(GEOGRAPHY_FILE), "{}", err);
    }
}
