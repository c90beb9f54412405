//! GraphQL-over-HTTP request parsing and response rendering shared by the
//! API Gateway handler and the HTTP server.

use graphql_parser::query::{Definition, OperationDefinition};
use http::{Method, StatusCode};
use juniper::http::{self as juniper_http, GraphQLBatchRequest};
use juniper::{DefaultScalarValue, FieldError, ScalarValue};
use tracing::{debug, error};

use crate::context::Context;
use crate::schema::Schema;

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Method {0} is not allowed")]
    InvalidMethod(Method),
    #[error("Missing query argument")]
    MissingQuery,
    #[error("Missing post body")]
    MissingPostBody,
    #[error("Invalid body: {0}")]
    InvalidBody(#[source] serde_json::Error),
    #[error("Prohibit extra field: {0}")]
    ProhibitExtraField(String),
    #[error("Query parameter must not occur more than once")]
    MultipleQueryParameter,
    #[error("Operation name parameter must not occur more than once")]
    MultipleOperationNameParameter,
    #[error("Variables parameter must not occur more than once")]
    MultipleVariablesParameter,
    #[error("Invalid variables parameter: {0}")]
    InvalidVariablesParameter(#[source] serde_json::Error),
    #[error("Can only perform a mutation operation from a POST request")]
    MutationOverGet,
}

impl RequestError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidMethod(_) | Self::MutationOverGet => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Value of the `Allow` header sent with a 405.
    pub fn allow(&self) -> Option<&'static str> {
        match self {
            Self::InvalidMethod(_) => Some("GET, POST"),
            Self::MutationOverGet => Some("POST"),
            _ => None,
        }
    }
}

/// Transport-neutral HTTP reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub allow: Option<&'static str>,
    pub body: String,
}

impl Reply {
    pub fn html(body: String) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: "text/html; charset=utf-8",
            allow: None,
            body,
        }
    }

    pub fn json(status: StatusCode, body: String) -> Self {
        Self {
            status,
            content_type: "application/json",
            allow: None,
            body,
        }
    }
}

/// Serializes `value`, falling back to a 500 if that is impossible.
fn json_reply<T: serde::Serialize>(status: StatusCode, value: &T) -> Reply {
    match serde_json::to_string(value) {
        Ok(body) => Reply::json(status, body),
        Err(err) => {
            error!(error = %err, "failed to serialize response");
            Reply::json(
                StatusCode::INTERNAL_SERVER_ERROR,
                r#"{"errors":[{"message":"failed to serialize response"}]}"#.to_owned(),
            )
        }
    }
}

/// Parameters of a GET request, before `variables` is decoded.
#[derive(Clone, PartialEq, Debug)]
struct GetGraphQLRequest {
    query: String,
    operation_name: Option<String>,
    variables: Option<String>,
}

impl<S> TryFrom<GetGraphQLRequest> for juniper_http::GraphQLRequest<S>
where
    S: ScalarValue,
{
    type Error = RequestError;

    fn try_from(get_req: GetGraphQLRequest) -> Result<Self, Self::Error> {
        let GetGraphQLRequest {
            query,
            operation_name,
            variables,
        } = get_req;
        let variables = variables
            .map(|variables| serde_json::from_str(&variables))
            .transpose()
            .map_err(RequestError::InvalidVariablesParameter)?;
        Ok(Self::new(query, operation_name, variables))
    }
}

/// Empty values count as absent.
fn set_once(
    slot: &mut Option<String>,
    value: &str,
    duplicate: RequestError,
) -> Result<(), RequestError> {
    if value.is_empty() {
        return Ok(());
    }
    if slot.replace(value.to_owned()).is_some() {
        return Err(duplicate);
    }
    Ok(())
}

/// Whether the operation a GET request would run is a mutation.
///
/// Documents that do not parse are left to the executor to report.
fn selects_mutation(query: &str, operation_name: Option<&str>) -> bool {
    let Ok(document) = graphql_parser::parse_query::<&str>(query) else {
        return false;
    };
    let mut operations = document.definitions.iter().filter_map(|definition| match definition {
        Definition::Operation(operation) => Some(operation),
        Definition::Fragment(_) => None,
    });
    let selected = match operation_name {
        Some(name) => operations.find(|operation| {
            let operation_name = match operation {
                OperationDefinition::SelectionSet(_) => None,
                OperationDefinition::Query(op) => op.name,
                OperationDefinition::Mutation(op) => op.name,
                OperationDefinition::Subscription(op) => op.name,
            };
            operation_name == Some(name)
        }),
        None => operations.next(),
    };
    matches!(selected, Some(OperationDefinition::Mutation(_)))
}

/// Simple wrapper around an incoming GraphQL request
///
/// Built from the query string of a GET request or the JSON body of a POST
/// request; a POST body may also carry a batch of requests.
#[derive(Debug)]
pub struct GraphQLRequest<S = DefaultScalarValue>(GraphQLBatchRequest<S>)
where
    S: ScalarValue;

impl<S> GraphQLRequest<S>
where
    S: ScalarValue,
{
    /// Parses already percent-decoded query parameters.
    pub fn from_query_params<I, K, V>(params: I) -> Result<Self, RequestError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = None;
        let mut operation_name = None;
        let mut variables = None;
        for (key, value) in params {
            let value = value.as_ref();
            match key.as_ref() {
                "query" => set_once(&mut query, value, RequestError::MultipleQueryParameter)?,
                "operationName" => set_once(
                    &mut operation_name,
                    value,
                    RequestError::MultipleOperationNameParameter,
                )?,
                "variables" => {
                    set_once(&mut variables, value, RequestError::MultipleVariablesParameter)?
                }
                other => return Err(RequestError::ProhibitExtraField(other.to_owned())),
            }
        }
        let query = query
            .filter(|query| !query.trim().is_empty())
            .ok_or(RequestError::MissingQuery)?;
        if selects_mutation(&query, operation_name.as_deref()) {
            return Err(RequestError::MutationOverGet);
        }
        let req = GetGraphQLRequest {
            query,
            operation_name,
            variables,
        };
        Ok(Self(GraphQLBatchRequest::Single(req.try_into()?)))
    }

    /// Parses a JSON body holding one request or a batch.
    pub fn from_json_body(body: &str) -> Result<Self, RequestError> {
        if body.trim().is_empty() {
            return Err(RequestError::MissingPostBody);
        }
        serde_json::from_str::<GraphQLBatchRequest<S>>(body)
            .map(Self)
            .map_err(RequestError::InvalidBody)
    }

    /// Returns the operation names associated with this request.
    ///
    /// For batch requests there will be multiple names.
    pub fn operation_names(&self) -> Vec<Option<&str>> {
        self.0.operation_names()
    }
}

impl GraphQLRequest {
    /// Execute an incoming GraphQL query
    pub async fn execute(&self, root_node: &Schema, context: &Context) -> Reply {
        debug!(operations = ?self.operation_names(), "executing GraphQL request");
        let response = self.0.execute(root_node, context).await;
        let status_code = if response.is_ok() {
            StatusCode::OK
        } else {
            StatusCode::BAD_REQUEST
        };
        json_reply(status_code, &response)
    }
}

/// Constructs the response for a request rejected before execution
pub fn rejected(err: &RequestError) -> Reply {
    let response =
        juniper_http::GraphQLResponse::<DefaultScalarValue>::error(FieldError::from(err.to_string()));
    Reply {
        allow: err.allow(),
        ..json_reply(err.status(), &response)
    }
}

/// Constructs a custom response outside of the normal execution flow
///
/// This is intended for transport-level failures that never reach the
/// schema, such as unknown routes.
pub fn custom(status_code: StatusCode, response: serde_json::Value) -> Reply {
    json_reply(status_code, &response)
}

/// Generate an HTML page containing GraphiQL
pub fn graphiql_source(graphql_endpoint_url: &str) -> Reply {
    Reply::html(juniper::http::graphiql::graphiql_source(
        graphql_endpoint_url,
        None,
    ))
}

/// Generate an HTML page containing GraphQL Playground
pub fn playground_source(graphql_endpoint_url: &str) -> Reply {
    Reply::html(juniper::http::playground::playground_source(
        graphql_endpoint_url,
        None,
    ))
}
