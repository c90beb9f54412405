use sqlx::mysql::MySqlPool;

///
/// Context for Juniper
///
/// Shared by every request; resolvers check a connection out of the pool for
/// each statement they run.
///
#[derive(Clone)]
pub struct Context {
    pub pool: MySqlPool,
}

impl juniper::Context for Context {}

impl Context {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}
