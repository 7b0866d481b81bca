//! Helpers for tests: an in-memory SQLite database with every migration applied,
//! and a file-backed one for tests that need several pooled connections.
//!
//! ```rust,ignore
//! #[tokio::test]
//! async fn creates_a_department() {
//!     let db = calstar_core::testing::test_db().await;
//!     let cs = departments::create(&db, new_department("COMPSCI")).await.unwrap();
//!     assert_eq!(cs.code, "COMPSCI");
//! }
//! ```

use std::path::Path;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;

use crate::app::App;
use crate::config::Config;
use crate::migrations::Migrator;

/// Configuration pointing at a private in-memory database.
pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        database_max_connections: 1,
        database_acquire_timeout_secs: 5,
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        environment: "test".to_string(),
    }
}

/// A fresh, migrated in-memory database. Each call gets its own.
///
/// # Panics
///
/// Panics if the database cannot be opened or migrated.
pub async fn test_db() -> DatabaseConnection {
    let db = crate::db::connect(&test_config())
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Configuration for a SQLite file at `path`, created if missing, with a
/// pool of several connections.
pub fn file_test_config(path: &Path) -> Config {
    Config {
        database_url: format!("sqlite://{}?mode=rwc", path.display()),
        database_max_connections: 8,
        database_acquire_timeout_secs: 30,
        ..test_config()
    }
}

/// A migrated SQLite file database at `path`. Unlike [`test_db`], concurrent
/// callers really do run on separate connections.
///
/// ```rust,ignore
/// let dir = tempfile::tempdir().unwrap();
/// let db = calstar_core::testing::file_test_db(&dir.path().join("calstar.db")).await;
/// ```
///
/// # Panics
///
/// Panics if the database cannot be opened or migrated.
pub async fn file_test_db(path: &Path) -> DatabaseConnection {
    let db = crate::db::connect(&file_test_config(path))
        .await
        .expect("Failed to open file database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// An [`App`] over [`test_db`], ready for `router()`.
pub async fn test_app() -> App {
    App::from_parts(test_config(), test_db().await)
}
