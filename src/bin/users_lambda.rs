//! AWS Lambda entry point for the users GraphQL API.

use clap::Parser;

use juniper_users_api::config::LambdaConfig;
use juniper_users_api::{db, schema, telemetry, Context, GraphQLHandler};

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    let config = LambdaConfig::parse();
    telemetry::init(config.log_format);
    let pool = db::connect(&config.database).await?;
    let handler = GraphQLHandler::new(schema(), Context::new(pool));
    lambda_runtime::run(handler).await
}
