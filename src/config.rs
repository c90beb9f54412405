//! Command line and environment configuration.
//!
//! Every flag falls back to an environment variable, so the Lambda binary can
//! be configured from the function environment alone.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use clap::{Args, Parser, ValueEnum};
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};

/// Connection settings for the MySQL store.
#[derive(Args, Clone)]
pub struct DatabaseConfig {
    /// Database host
    #[arg(long = "db-host", env = "DB_HOST", default_value = "127.0.0.1")]
    pub host: String,
    /// Database port
    #[arg(long = "db-port", env = "DB_PORT", default_value_t = 3306)]
    pub port: u16,
    /// Database user
    #[arg(long = "db-user", env = "DB_USER", default_value = "root")]
    pub user: String,
    /// Database password
    #[arg(long = "db-password", env = "DB_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
    /// Database (schema) name
    #[arg(long = "db-name", env = "DB_NAME", default_value = "userapp")]
    pub database: String,
    /// Upper bound of pooled connections
    #[arg(long = "db-max-connections", env = "DB_MAX_CONNECTIONS", default_value_t = 10)]
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection before failing
    #[arg(long = "db-acquire-timeout", env = "DB_ACQUIRE_TIMEOUT_SECS", default_value_t = 30)]
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> MySqlConnectOptions {
        let options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.database);
        match &self.password {
            Some(password) => options.password(password),
            None => options,
        }
    }

    pub fn pool_options(&self) -> MySqlPoolOptions {
        MySqlPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
    }
}

// keeps the password out of logs
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .finish()
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// `users-server` configuration.
#[derive(Parser, Debug)]
#[command(name = "users-server", version, about = "GraphQL API for the users table")]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    #[arg(long, env = "LISTEN_ADDR", default_value = "127.0.0.1:4000")]
    pub listen: SocketAddr,
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
    #[command(flatten)]
    pub database: DatabaseConfig,
}

/// `users-lambda` configuration, read once at cold start.
#[derive(Parser, Debug)]
#[command(name = "users-lambda", version, about = "GraphQL API for the users table on API Gateway")]
pub struct LambdaConfig {
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,
    #[command(flatten)]
    pub database: DatabaseConfig,
}
