/*!

# juniper_users_api

A [GraphQL][GraphQL] API over a single MySQL `users` table, built on [Juniper][Juniper].

The same schema is served two ways:

* `users-server`: a standalone HTTP server with the endpoint at `/graphql`
  and GraphiQL on `GET /graphql`.
* `users-lambda`: an [AWS Lambda Runtime][AWS Lambda Runtime] handler behind
  [AWS Api Gateway][AWS Api Gateway] proxy integration.

## Schema

```graphql
scalar Date
type User { id: Int, name: String, email: String, job_title: String, joining_date: Date, content: String }
type Query { getUsers: [User], getUser(id: Int): User }
type Mutation {
  updateUser(id: Int, name: String, email: String, job_title: String, joining_date: Date, content: String): Boolean
  createUser(name: String, email: String, job_title: String, joining_date: Date, content: String): Boolean
  deleteUser(id: Int): Boolean
}
```

Every resolver runs exactly one parameterized statement on a pooled
connection. Column names come from a fixed allow-list, never from the request.

## Configuration

Both binaries read `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`,
`DB_MAX_CONNECTIONS` and `DB_ACQUIRE_TIMEOUT_SECS`; the server also accepts
the same settings as flags (`users-server --help`). Logging honours `RUST_LOG`.

## Links

* [Juniper][Juniper]
* [AWS Lambda Runtime][AWS Lambda Runtime]

## License

This project is under the MIT license.

[AWS Api Gateway]: https://aws.amazon.com/api-gateway/
[AWS Lambda Runtime]: https://github.com/awslabs/aws-lambda-rust-runtime
[Juniper]: https://github.com/graphql-rust/juniper
[GraphQL]: http://graphql.org

*/

pub mod api_gateway;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod executor;
pub mod request;
pub mod schema;
pub mod server;
pub mod sql;
pub mod telemetry;
pub mod types;

#[cfg(test)]
mod test_support;

pub use api_gateway::GraphQLHandler;
pub use context::Context;
pub use error::Error;
pub use request::{GraphQLRequest, Reply, RequestError};
pub use schema::{schema, Mutation, Query, Schema};
