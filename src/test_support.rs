//! Helpers shared by unit tests.

use std::time::Duration;

use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};

use crate::context::Context;

/// Context whose pool points at a closed port: any resolver that reaches the
/// store fails with a connection error.
pub(crate) fn unreachable_context() -> Context {
    let options = MySqlConnectOptions::new()
        .host("127.0.0.1")
        .port(1)
        .username("nobody");
    let pool = MySqlPoolOptions::new()
        .acquire_timeout(Duration::from_secs(1))
        .connect_lazy_with(options);
    Context::new(pool)
}
