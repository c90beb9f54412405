//! Standalone HTTP server for the users GraphQL API.

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

use juniper_users_api::config::ServerConfig;
use juniper_users_api::server::{self, GRAPHQL_PATH};
use juniper_users_api::{db, schema, telemetry, Context};

type Error = Box<dyn std::error::Error + Send + Sync + 'static>;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = ServerConfig::parse();
    telemetry::init(config.log_format);

    // no store, no server
    let pool = db::connect(&config.database).await?;
    let context = Context::new(pool.clone());

    let listener = TcpListener::bind(config.listen).await?;
    info!(
        addr = %listener.local_addr()?,
        path = GRAPHQL_PATH,
        "Running a GraphQL API server"
    );
    server::serve(listener, Arc::new(schema()), Arc::new(context), shutdown_signal()).await;

    pool.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
