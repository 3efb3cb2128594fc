//! Reference store handle
//!
//! `WageStore` owns the store's lifecycle: it is opened at startup, read by every
//! search, rebuilt wholesale by the maintenance action, and closed at shutdown.
//!
//! Searches take a shared guard through [`WageStore::reader`], which never waits.
//! A rebuild holds the exclusive guard for its whole duration, so a search that
//! arrives mid-rebuild fails immediately with `StoreUnavailable` instead of reading
//! a missing or half-loaded store.

use chrono::{DateTime, Utc};
use oflc_common::db::{self, TableCounts, REFERENCE_TABLES};
use serde::Serialize;
use sqlx::SqlitePool;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{OwnedRwLockReadGuard, RwLock};
use tracing::{error, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::import::{self, DataSources};

/// Number of sample occupation titles reported by [`WageStore::status`]
const SAMPLE_TITLES: i64 = 5;

#[derive(Debug, Default)]
struct StoreState {
    pool: Option<SqlitePool>,
    last_rebuilt: Option<DateTime<Utc>>,
}

/// Shared handle to the reference store
#[derive(Debug, Clone)]
pub struct WageStore {
    db_path: PathBuf,
    state: Arc<RwLock<StoreState>>,
}

/// Shared read access to an initialized store
///
/// Holds the store's shared guard; a rebuild cannot start until every reader is
/// dropped.
pub struct StoreReader {
    guard: OwnedRwLockReadGuard<StoreState, SqlitePool>,
}

impl Deref for StoreReader {
    type Target = SqlitePool;

    fn deref(&self) -> &SqlitePool {
        &self.guard
    }
}

/// Diagnostic snapshot of the store
#[derive(Debug, Clone, Serialize)]
pub struct StoreStatus {
    pub database_path: String,
    pub initialized: bool,
    pub rebuilding: bool,
    pub tables: Vec<String>,
    pub counts: Option<TableCounts>,
    pub sample_occupations: Vec<String>,
    pub last_rebuilt: Option<DateTime<Utc>>,
}

impl WageStore {
    /// Handle with no pool; every reader fails until [`WageStore::rebuild`] succeeds
    pub fn uninitialized(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            state: Arc::new(RwLock::new(StoreState::default())),
        }
    }

    /// Open the store at `db_path` if it exists and holds all reference tables
    ///
    /// A missing, unreadable, or incomplete store is not an error: the handle is
    /// returned uninitialized and the condition is logged, so a startup rebuild can
    /// still replace it.
    pub async fn open(db_path: impl Into<PathBuf>) -> Self {
        let store = Self::uninitialized(db_path);

        if !store.db_path.exists() {
            warn!("Reference store not found: {}", store.db_path.display());
            return store;
        }

        match Self::inspect(&store.db_path).await {
            Ok(Some((pool, counts))) => {
                info!(
                    "Reference store opened: wage_data={}, geography={}, occupations={}",
                    counts.wage_data, counts.geography, counts.occupations
                );
                store.state.write().await.pool = Some(pool);
            }
            Ok(None) => {}
            Err(e) => warn!(
                "Reference store {} is unreadable: {}",
                store.db_path.display(),
                e
            ),
        }

        store
    }

    /// Connect and check the tables; `None` when some are missing
    async fn inspect(db_path: &Path) -> oflc_common::Result<Option<(SqlitePool, TableCounts)>> {
        let pool = db::connect(db_path).await?;

        match Self::complete_counts(&pool, db_path).await {
            Ok(Some(counts)) => Ok(Some((pool, counts))),
            other => {
                pool.close().await;
                other.map(|_| None)
            }
        }
    }

    async fn complete_counts(
        pool: &SqlitePool,
        db_path: &Path,
    ) -> oflc_common::Result<Option<TableCounts>> {
        let tables = db::tables_present(pool).await?;
        if tables.len() < REFERENCE_TABLES.len() {
            warn!(
                "Reference store {} is incomplete (tables present: {:?})",
                db_path.display(),
                tables
            );
            return Ok(None);
        }
        db::table_counts(pool).await.map(Some)
    }

    /// Path of the store file
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Shared access to the store without waiting
    pub fn reader(&self) -> ApiResult<StoreReader> {
        let guard = Arc::clone(&self.state).try_read_owned().map_err(|_| {
            ApiError::StoreUnavailable("reference store is being rebuilt".to_string())
        })?;

        let guard = OwnedRwLockReadGuard::try_map(guard, |state| state.pool.as_ref()).map_err(
            |_| ApiError::StoreUnavailable("reference store is not initialized".to_string()),
        )?;

        Ok(StoreReader { guard })
    }

    /// Whether a pool is currently open
    pub async fn is_initialized(&self) -> bool {
        self.state.read().await.pool.is_some()
    }

    /// Delete the store and rebuild it from `sources`
    ///
    /// Exclusive: waits for in-flight readers, then blocks new ones (they fail fast)
    /// until it finishes. Sources are checked before anything is deleted. If a later
    /// step fails the store is left uninitialized.
    pub async fn rebuild(&self, sources: &DataSources) -> ApiResult<TableCounts> {
        sources.verify()?;

        let mut state = self.state.write().await;
        info!("Rebuilding reference store: {}", self.db_path.display());

        if let Some(pool) = state.pool.take() {
            pool.close().await;
        }
        db::remove_store_files(&self.db_path).await?;
        info!("Removed existing store");

        match self.build(sources).await {
            Ok((pool, counts)) => {
                state.pool = Some(pool);
                state.last_rebuilt = Some(Utc::now());
                info!("Reference store rebuilt");
                Ok(counts)
            }
            Err(e) => {
                error!("Reference store rebuild failed: {}", e);
                Err(e)
            }
        }
    }

    async fn build(&self, sources: &DataSources) -> ApiResult<(SqlitePool, TableCounts)> {
        let pool = db::open_or_create(&self.db_path).await?;

        let result = async {
            db::create_schema(&pool).await?;
            import::import_all(&pool, sources).await
        }
        .await;

        match result {
            Ok(counts) => Ok((pool, counts)),
            Err(e) => {
                pool.close().await;
                Err(e.into())
            }
        }
    }

    /// Diagnostic snapshot; never fails on a missing store
    pub async fn status(&self) -> ApiResult<StoreStatus> {
        let mut status = StoreStatus {
            database_path: self.db_path.display().to_string(),
            initialized: false,
            rebuilding: false,
            tables: Vec::new(),
            counts: None,
            sample_occupations: Vec::new(),
            last_rebuilt: None,
        };

        let state = match self.state.try_read() {
            Ok(state) => state,
            Err(_) => {
                status.rebuilding = true;
                return Ok(status);
            }
        };

        status.last_rebuilt = state.last_rebuilt;
        let Some(pool) = state.pool.as_ref() else {
            return Ok(status);
        };

        status.initialized = true;
        status.tables = db::tables_present(pool).await?;
        if status.tables.len() == REFERENCE_TABLES.len() {
            status.counts = Some(db::table_counts(pool).await?);
            status.sample_occupations =
                sqlx::query_scalar("SELECT title FROM occupations ORDER BY id LIMIT ?")
                    .bind(SAMPLE_TITLES)
                    .fetch_all(pool)
                    .await?;
        }

        Ok(status)
    }

    /// Close the pool (shutdown)
    pub async fn close(&self) {
        let mut state = self.state.write().await;
        if let Some(pool) = state.pool.take() {
            pool.close().await;
            info!("Reference store closed");
        }
    }
}
