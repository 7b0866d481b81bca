use sea_orm::{ConnectOptions, Database as SeaDatabase, DatabaseConnection};
use std::time::Duration;

use crate::config::Config;

/// Initialize the database connection from config.
///
/// An in-memory SQLite database only lives as long as the connection that
/// opened it, so such URLs get exactly one pooled connection that is never
/// reaped.
pub async fn connect(config: &Config) -> Result<DatabaseConnection, sea_orm::DbErr> {
    let mut opts = ConnectOptions::new(&config.database_url);
    opts.connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(config.database_acquire_timeout_secs))
        .sqlx_logging(config.is_dev());

    if config.is_in_memory_db() {
        opts.max_connections(1).min_connections(1);
    } else {
        opts.max_connections(config.database_max_connections)
            .min_connections(1)
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(1800));
    }

    tracing::debug!(
        max_connections = config.database_max_connections,
        in_memory = config.is_in_memory_db(),
        "connecting to database"
    );
    SeaDatabase::connect(opts).await
}
