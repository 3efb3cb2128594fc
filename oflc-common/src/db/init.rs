//! Reference store initialization
//!
//! The store is a single SQLite file with three tables. It is created empty by
//! [`open_or_create`] + [`create_schema`], filled by the importer, and otherwise only
//! read. A rebuild removes the file wholesale via [`remove_store_files`].

use crate::{Error, Result};
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Names of the three reference tables
pub const REFERENCE_TABLES: [&str; 3] = ["wage_data", "geography", "occupations"];

/// Maximum pooled connections per store
const MAX_CONNECTIONS: u32 = 8;

/// SQLite busy timeout
const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Row counts for the reference tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub wage_data: i64,
    pub geography: i64,
    pub occupations: i64,
}

/// Connect to an existing store file
///
/// Fails with [`Error::NotFound`] when the file is missing; never creates one.
pub async fn connect(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.exists() {
        return Err(Error::NotFound(format!(
            "Database not found: {}",
            db_path.display()
        )));
    }

    let options = base_options(db_path).create_if_missing(false);
    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(options)
        .await?;

    debug!("Connected to store: {}", db_path.display());
    Ok(pool)
}

/// Open a store file, creating it (and its parent directory) if needed
pub async fn open_or_create(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let options = base_options(db_path).create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Created new store: {}", db_path.display());
    } else {
        info!("Opened existing store: {}", db_path.display());
    }

    Ok(pool)
}

fn base_options(db_path: &Path) -> SqliteConnectOptions {
    SqliteConnectOptions::new()
        .filename(db_path)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT)
}

/// Create the reference tables and their indexes (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS wage_data (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            area TEXT NOT NULL,
            soc_code TEXT NOT NULL,
            geo_lvl INTEGER,
            level1 REAL,
            level2 REAL,
            level3 REAL,
            level4 REAL,
            average REAL,
            label TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS geography (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            area TEXT NOT NULL,
            area_name TEXT NOT NULL,
            state_ab TEXT NOT NULL,
            state TEXT NOT NULL,
            county_town_name TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS occupations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            soc_code TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    create_indexes(pool).await?;

    info!("Reference store schema ready (wage_data, geography, occupations)");
    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<()> {
    const INDEXES: [&str; 5] = [
        "CREATE INDEX IF NOT EXISTS idx_wage_area ON wage_data(area)",
        "CREATE INDEX IF NOT EXISTS idx_wage_soc ON wage_data(soc_code)",
        "CREATE INDEX IF NOT EXISTS idx_geo_area ON geography(area)",
        "CREATE INDEX IF NOT EXISTS idx_geo_state ON geography(state)",
        "CREATE INDEX IF NOT EXISTS idx_occ_soc ON occupations(soc_code)",
    ];

    for statement in INDEXES {
        sqlx::query(statement).execute(pool).await?;
    }

    Ok(())
}

/// Which of the reference tables exist in the store
pub async fn tables_present(pool: &SqlitePool) -> Result<Vec<String>> {
    let names = sqlx::query_scalar::<_, String>(
        r#"
        SELECT name
        FROM sqlite_master
        WHERE type = 'table'
          AND name IN ('wage_data', 'geography', 'occupations')
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(names)
}

/// Row counts of the reference tables
///
/// Assumes all three tables exist; check with [`tables_present`] first.
pub async fn table_counts(pool: &SqlitePool) -> Result<TableCounts> {
    let wage_data: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM wage_data")
        .fetch_one(pool)
        .await?;
    let geography: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM geography")
        .fetch_one(pool)
        .await?;
    let occupations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM occupations")
        .fetch_one(pool)
        .await?;

    Ok(TableCounts {
        wage_data,
        geography,
        occupations,
    })
}

/// Delete the store file and its WAL/SHM side files
///
/// The pool must be closed first. Missing files are ignored.
pub async fn remove_store_files(db_path: &Path) -> Result<()> {
    for path in store_files(db_path) {
        match tokio::fs::remove_file(&path).await {
            Ok(()) => debug!("Removed {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

fn store_files(db_path: &Path) -> [PathBuf; 3] {
    let with_suffix = |suffix: &str| {
        let mut name = db_path.as_os_str().to_os_string();
        name.push(suffix);
        PathBuf::from(name)
    };

    [db_path.to_path_buf(), with_suffix("-wal"), with_suffix("-shm")]
}
