//! Connection pool construction.

use sqlx::mysql::MySqlPool;
use tracing::{error, info};

use crate::config::DatabaseConfig;
use crate::error::Error;

/// Opens the pool and proves the store is reachable.
///
/// # Errors
///
/// Returns [`Error::Connection`] (or [`Error::Statement`] for rejected
/// credentials) when the first connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<MySqlPool, Error> {
    let pool = config
        .pool_options()
        .connect_with(config.connect_options())
        .await
        .map_err(|err| {
            let err = Error::from(err);
            error!(
                host = %config.host,
                port = config.port,
                database = %config.database,
                error = %err,
                "failed to connect to database"
            );
            err
        })?;
    info!(
        host = %config.host,
        port = config.port,
        database = %config.database,
        max_connections = config.max_connections,
        "connected to database"
    );
    Ok(pool)
}

