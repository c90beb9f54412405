use juniper::{graphql_object, EmptySubscription, Nullable, RootNode};
use tracing::info;

use crate::context::Context;
use crate::error::Error;
use crate::executor;
use crate::sql;
use crate::types::{Date, User, UserFields};

pub struct Query;

#[graphql_object(context = Context)]
impl Query {
    ///
    /// Get all users from DB
    ///
    async fn get_users(context: &Context) -> Result<Option<Vec<Option<User>>>, Error> {
        let users = executor::fetch_all(&context.pool, &sql::select_users()).await?;
        Ok(Some(users.into_iter().map(Some).collect()))
    }

    ///
    /// Get user by id from DB
    ///
    async fn get_user(context: &Context, id: Option<i32>) -> Result<Option<User>, Error> {
        // no row can match a NULL id
        let Some(id) = id else {
            return Ok(None);
        };
        executor::fetch_optional(&context.pool, &sql::select_user(id)).await
    }
}

pub struct Mutation;

#[graphql_object(context = Context)]
impl Mutation {
    ///
    /// Update the supplied fields of an existing user
    ///
    async fn update_user(
        context: &Context,
        id: Option<i32>,
        name: Nullable<String>,
        email: Nullable<String>,
        #[graphql(name = "job_title")] job_title: Nullable<String>,
        #[graphql(name = "joining_date")] joining_date: Nullable<Date>,
        content: Nullable<String>,
    ) -> Result<Option<bool>, Error> {
        let id = id.ok_or(Error::MissingId("updateUser"))?;
        let fields = UserFields {
            name,
            email,
            job_title,
            joining_date,
            content,
        };
        let statement = sql::update_user(id, &fields)?;
        let updated = executor::execute(&context.pool, &statement).await?;
        info!(id, updated, "updateUser");
        Ok(Some(updated))
    }

    ///
    /// Create new user in DB
    ///
    async fn create_user(
        context: &Context,
        name: Nullable<String>,
        email: Nullable<String>,
        #[graphql(name = "job_title")] job_title: Nullable<String>,
        #[graphql(name = "joining_date")] joining_date: Nullable<Date>,
        content: Nullable<String>,
    ) -> Result<Option<bool>, Error> {
        let fields = UserFields {
            name,
            email,
            job_title,
            joining_date,
            content,
        };
        let created = executor::execute(&context.pool, &sql::insert_user(&fields)).await?;
        info!(created, "createUser");
        Ok(Some(created))
    }

    ///
    /// Delete user from DB
    ///
    async fn delete_user(context: &Context, id: Option<i32>) -> Result<Option<bool>, Error> {
        let id = id.ok_or(Error::MissingId("deleteUser"))?;
        let deleted = executor::execute(&context.pool, &sql::delete_user(id)).await?;
        info!(id, deleted, "deleteUser");
        Ok(Some(deleted))
    }
}

pub type Schema = RootNode<'static, Query, Mutation, EmptySubscription<Context>>;

pub fn schema() -> Schema {
    Schema::new(Query, Mutation, EmptySubscription::new())
}
