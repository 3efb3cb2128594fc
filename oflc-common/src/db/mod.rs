//! Reference store schema, connection setup and record models

pub mod init;
pub mod models;

pub use init::{
    connect, create_schema, open_or_create, remove_store_files, table_counts, tables_present,
    TableCounts, REFERENCE_TABLES,
};
pub use models::{GeographyRecord, OccupationRecord, WageRecord};
