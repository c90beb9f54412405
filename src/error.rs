use juniper::{graphql_value, FieldError, IntoFieldError, ScalarValue};

/// Failures surfaced by resolvers.
///
/// Store errors keep the driver's own message; caller-input errors are raised
/// before any statement is sent.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("updateUser requires at least one field besides `id`")]
    EmptyUpdate,
    #[error("`id` argument is required for {0}")]
    MissingId(&'static str),
    #[error("{0}")]
    Connection(#[source] sqlx::Error),
    #[error("{0}")]
    Statement(#[source] sqlx::Error),
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => Error::Connection(err),
            _ => Error::Statement(err),
        }
    }
}

impl<S: ScalarValue> IntoFieldError<S> for Error {
    fn into_field_error(self) -> FieldError<S> {
        let message = self.to_string();
        match self {
            Error::EmptyUpdate | Error::MissingId(_) => {
                FieldError::new(message, graphql_value!({ "code": "BAD_USER_INPUT" }))
            }
            Error::Connection(_) => {
                FieldError::new(message, graphql_value!({ "code": "STORE_UNAVAILABLE" }))
            }
            Error::Statement(_) => {
                FieldError::new(message, graphql_value!({ "code": "STORE_ERROR" }))
            }
        }
    }
}
