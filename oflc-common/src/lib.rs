//! # OFLC Common Library
//!
//! Shared code for the OFLC wage lookup service:
//! - Reference store schema and record models
//! - Wage levels and hourly/annual unit conversion
//! - Configuration loading
//! - Common error type

pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod wage;

pub use error::{Error, Result};
pub use wage::{AnnualLevels, HourlyLevels, WageLevel};
