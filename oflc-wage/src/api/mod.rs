//! HTTP API handlers for oflc-wage

pub mod admin;
pub mod health;
pub mod lookup;
pub mod search;

pub use admin::admin_routes;
pub use health::health_routes;
pub use lookup::lookup_routes;
pub use search::search_routes;
