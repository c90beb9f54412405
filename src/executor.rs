//! Runs a [`Statement`] against the pool.
//!
//! The caller picks the result shape: rows for reads, an "affected anything"
//! flag for writes. Every call checks out one pooled connection for exactly
//! one statement.

use sqlx::mysql::{MySqlArguments, MySqlPool};
use sqlx::query::{Query, QueryAs};
use sqlx::MySql;
use tracing::{debug, warn};

use crate::error::Error;
use crate::sql::{Bind, Statement};
use crate::types::User;

pub async fn fetch_all(pool: &MySqlPool, statement: &Statement) -> Result<Vec<User>, Error> {
    debug!(sql = statement.sql(), "fetching rows");
    bind_as(sqlx::query_as(statement.sql()), statement)
        .fetch_all(pool)
        .await
        .map_err(|err| failed(statement, err))
}

pub async fn fetch_optional(
    pool: &MySqlPool,
    statement: &Statement,
) -> Result<Option<User>, Error> {
    debug!(sql = statement.sql(), "fetching row");
    bind_as(sqlx::query_as(statement.sql()), statement)
        .fetch_optional(pool)
        .await
        .map_err(|err| failed(statement, err))
}

/// Returns whether at least one row was affected.
pub async fn execute(pool: &MySqlPool, statement: &Statement) -> Result<bool, Error> {
    debug!(sql = statement.sql(), "executing write");
    let result = bind(sqlx::query(statement.sql()), statement)
        .execute(pool)
        .await
        .map_err(|err| failed(statement, err))?;
    Ok(result.rows_affected() > 0)
}

fn failed(statement: &Statement, err: sqlx::Error) -> Error {
    let err = Error::from(err);
    warn!(sql = statement.sql(), error = %err, "statement failed");
    err
}

fn bind<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    statement: &'q Statement,
) -> Query<'q, MySql, MySqlArguments> {
    for value in statement.binds() {
        query = match value {
            Bind::Int(int) => query.bind(*int),
            Bind::Text(text) => query.bind(text.as_str()),
            Bind::Null => query.bind(None::<&str>),
        };
    }
    query
}

fn bind_as<'q>(
    mut query: QueryAs<'q, MySql, User, MySqlArguments>,
    statement: &'q Statement,
) -> QueryAs<'q, MySql, User, MySqlArguments> {
    for value in statement.binds() {
        query = match value {
            Bind::Int(int) => query.bind(*int),
            Bind::Text(text) => query.bind(text.as_str()),
            Bind::Null => query.bind(None::<&str>),
        };
    }
    query
}
