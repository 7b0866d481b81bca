//! Data core of calstar, a course review site: the catalog schema, a
//! persistence layer with explicit delete policies, rating aggregates, and a
//! small read-only JSON API.

pub mod app;
pub mod config;
pub mod controllers;
pub mod db;
pub mod error;
pub mod extractors;
pub mod identity;
pub mod logging;
pub mod migrations;
pub mod models;
pub mod ratings;
pub mod repo;
pub mod response;
pub mod schema;
pub mod testing;

pub use app::App;
pub use config::Config;
pub use error::{CalstarError, ConstraintKind};
pub use identity::{BaseIdentity, Identity};
pub use response::ApiResponse;
