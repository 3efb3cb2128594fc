//! Store fixtures for integration tests
//!
//! Each fixture writes the three source CSV files into a temporary directory and
//! builds a fresh store from them through the regular rebuild path.

#![allow(dead_code)]

use oflc_wage::{DataSources, WageStore};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

/// Lookup bound used by tests; generous so slow CI machines never time out
pub const TEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const WAGE_HEADER: &str = "Area,SocCode,GeoLvl,Level1,Level2,Level3,Level4,Average,Label\n";
pub const GEOGRAPHY_HEADER: &str = "Area,AreaName,StateAb,State,CountyTownName\n";
pub const OCCUPATIONS_HEADER: &str = "SocCode,Title,Description\n";

/// One occupation, one place, one wage row
pub const SCENARIO_WAGES: &str = "0001,11-1021,1,20.0,30.0,40.0,50.0,35.0,label\n";
pub const SCENARIO_GEOGRAPHY: &str = "0001,Irvine,CA,California,Orange County\n";
pub const SCENARIO_OCCUPATIONS: &str = "11-1021,General Manager,\"Plan, direct, or coordinate the operations\"\n";

/// Several occupations across two states
///
/// Area 0001 spans two county/town rows; area 0006 repeats the Irvine/Orange County
/// names under another code; area 0001 carries two General Manager rows.
pub const SAMPLE_WAGES: &str = "\
0001,11-1021,1,20.00,30.00,40.00,50.00,35.00,OES
0001,11-1021,1,21.00,31.00,41.00,51.00,36.00,Later
0002,11-1021,1,22.00,32.00,42.00,52.00,37.00,OES
0003,11-1021,1,25.00,35.00,45.00,55.00,40.00,OES
0004,11-1021,1,18.00,26.00,34.00,42.00,30.00,OES
0005,11-1021,1,19.00,29.00,39.00,49.00,34.00,OES
0006,11-1021,1,23.00,33.00,43.00,53.00,38.00,OES
0001,11-3031,1,24.00,34.00,44.00,54.00,39.00,OES
0001,35-1011,1,12.00,15.00,18.00,21.00,16.50,OES
0004,13-2011,1,20.00,29.50,35.00,40.00,31.00,
";

pub const SAMPLE_GEOGRAPHY: &str = "\
0001,Irvine,CA,California,Orange County
0001,Irvine,CA,California,Orange Town
0002,Anaheim,CA,California,Orange County
0003,San Diego,CA,California,San Diego County
0004,Austin,TX,Texas,Travis County
0005,Orange,TX,Texas,Orange County
0006,Irvine,CA,California,Orange County
";

pub const SAMPLE_OCCUPATIONS: &str = "\
11-1021,General Manager,\"Plan, direct, or coordinate the operations\"
11-3031,Financial Manager,Direct financial activities
35-1011,Chef,Direct and coordinate food preparation
13-2011,Accountant,Examine financial records
29-1141,Registered Nurse,Assess patient health
11-9199,Manager Trainee,
";

/// Built store plus the directory holding its files
///
/// The `TempDir` must outlive the store.
pub struct TestStore {
    pub dir: TempDir,
    pub store: WageStore,
    pub sources: DataSources,
}

/// Write the three source files (header row added) into `dir`
pub fn write_sources(dir: &Path, wages: &str, geography: &str, occupations: &str) -> DataSources {
    let sources = DataSources::from_dir(dir);
    std::fs::write(&sources.wage_csv, format!("{}{}", WAGE_HEADER, wages)).unwrap();
    std::fs::write(&sources.geography_csv, format!("{}{}", GEOGRAPHY_HEADER, geography)).unwrap();
    std::fs::write(
        &sources.occupations_csv,
        format!("{}{}", OCCUPATIONS_HEADER, occupations),
    )
    .unwrap();
    sources
}

/// Store path inside a fixture directory
pub fn store_path(dir: &Path) -> std::path::PathBuf {
    dir.join("store").join("wage_data.db")
}

/// Build a store from the given CSV bodies
pub async fn build_store(wages: &str, geography: &str, occupations: &str) -> TestStore {
    let dir = TempDir::new().unwrap();
    let sources = write_sources(dir.path(), wages, geography, occupations);
    let store = WageStore::uninitialized(store_path(dir.path()));
    store.rebuild(&sources).await.unwrap();

    TestStore {
        dir,
        store,
        sources,
    }
}

pub async fn scenario_store() -> TestStore {
    build_store(SCENARIO_WAGES, SCENARIO_GEOGRAPHY, SCENARIO_OCCUPATIONS).await
}

pub async fn sample_store() -> TestStore {
    build_store(SAMPLE_WAGES, SAMPLE_GEOGRAPHY, SAMPLE_OCCUPATIONS).await
}
