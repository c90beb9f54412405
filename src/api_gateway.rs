//! AWS API Gateway (REST, proxy integration) binding.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context as TaskContext, Poll};

use aws_lambda_events::encodings::Body;
use aws_lambda_events::event::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use http::header::{HeaderMap, HeaderValue, ALLOW, CONTENT_TYPE};
use http::Method;
use juniper::DefaultScalarValue;
use lambda_runtime::{LambdaEvent, Service};
use tracing::{info, warn};

use crate::context::Context;
use crate::request::{self, GraphQLRequest, Reply, RequestError};
use crate::schema::Schema;

impl From<Reply> for ApiGatewayProxyResponse {
    fn from(reply: Reply) -> Self {
        let mut headers = HeaderMap::with_capacity(2);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(reply.content_type));
        if let Some(allow) = reply.allow {
            headers.insert(ALLOW, HeaderValue::from_static(allow));
        }
        ApiGatewayProxyResponse {
            status_code: i64::from(reply.status.as_u16()),
            headers,
            body: Some(Body::Text(reply.body)),
            ..Default::default()
        }
    }
}

fn body_text(req: &ApiGatewayProxyRequest) -> Result<&str, RequestError> {
    req.body.as_deref().ok_or(RequestError::MissingPostBody)
}

impl TryFrom<&ApiGatewayProxyRequest> for GraphQLRequest<DefaultScalarValue> {
    type Error = RequestError;

    fn try_from(req: &ApiGatewayProxyRequest) -> Result<Self, Self::Error> {
        match req.http_method {
            Method::GET => Self::from_query_params(req.multi_value_query_string_parameters.iter()),
            Method::POST => Self::from_json_body(body_text(req)?),
            ref raw_method => Err(RequestError::InvalidMethod(raw_method.clone())),
        }
    }
}

/// Answers one proxy event: rejected requests get a GraphQL error body.
pub async fn handle(
    root_node: &Schema,
    context: &Context,
    req: &ApiGatewayProxyRequest,
) -> ApiGatewayProxyResponse {
    match GraphQLRequest::<DefaultScalarValue>::try_from(req) {
        Ok(gql_req) => gql_req.execute(root_node, context).await.into(),
        Err(err) => {
            warn!(method = %req.http_method, error = %err, "rejected request");
            request::rejected(&err).into()
        }
    }
}

/// Aws Api Gateway GraphQL Handler for GET and POST requests
///
/// Root node and context are built once per cold start and shared by every
/// invocation the runtime hands to this handler.
#[derive(Clone)]
pub struct GraphQLHandler {
    root_node: Arc<Schema>,
    context: Arc<Context>,
}

impl GraphQLHandler {
    pub fn new(root_node: Schema, context: Context) -> Self {
        Self {
            root_node: Arc::new(root_node),
            context: Arc::new(context),
        }
    }
}

impl Service<LambdaEvent<ApiGatewayProxyRequest>> for GraphQLHandler {
    type Response = ApiGatewayProxyResponse;
    type Error = lambda_runtime::Error;
    type Future =
        Pin<Box<dyn Future<Output = Result<ApiGatewayProxyResponse, lambda_runtime::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, event: LambdaEvent<ApiGatewayProxyRequest>) -> Self::Future {
        let root_node = Arc::clone(&self.root_node);
        let context = Arc::clone(&self.context);
        Box::pin(async move {
            let (req, lambda_context) = event.into_parts();
            info!(request_id = %lambda_context.request_id, method = %req.http_method, "invocation");
            Ok(handle(&root_node, &context, &req).await)
        })
    }
}
