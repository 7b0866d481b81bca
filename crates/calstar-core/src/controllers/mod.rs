//! Read-only JSON API over the catalog.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use sea_orm::DatabaseConnection;

use crate::config::Config;

pub mod catalog;

/// Shared application state available in all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
}

/// Routes under `/api`, still waiting for their state.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/departments", get(catalog::list_departments))
        .route("/api/departments/{id}", get(catalog::get_department))
        .route("/api/professors", get(catalog::list_professors))
        .route("/api/professors/{id}", get(catalog::get_professor))
        .route("/api/courses", get(catalog::list_courses))
        .route("/api/courses/{id}", get(catalog::get_course))
        .route("/api/courses/{id}/offerings", get(catalog::course_offerings))
        .route("/api/offerings/{id}/resources", get(catalog::offering_resources))
}
