use juniper::Nullable;
use sqlx::mysql::MySqlRow;
use sqlx::{FromRow, Row};

use crate::sql::{Bind, Column};
use crate::types::Date;

///
/// GraphQL type for a user
///
#[derive(juniper::GraphQLObject, Clone, Default, Debug, PartialEq)]
#[graphql(rename_all = "none")]
pub struct User {
    /// unique identification of user, assigned by the store
    pub id: Option<i32>,
    /// Full name of user
    pub name: Option<String>,
    /// Email
    pub email: Option<String>,
    /// Job title
    pub job_title: Option<String>,
    /// Date of joining, as stored
    pub joining_date: Option<Date>,
    /// Free-form content
    pub content: Option<String>,
}

impl<'r> FromRow<'r, MySqlRow> for User {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        // `id` is selected as BIGINT so any integer column width decodes
        let id: Option<i64> = row.try_get("id")?;
        let id = id
            .map(i32::try_from)
            .transpose()
            .map_err(|err| sqlx::Error::ColumnDecode {
                index: "id".into(),
                source: Box::new(err),
            })?;
        Ok(Self {
            id,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            job_title: row.try_get("job_title")?,
            joining_date: row.try_get::<Option<String>, _>("joining_date")?.map(Date::new),
            content: row.try_get("content")?,
        })
    }
}

///
/// Writable user fields as supplied by a mutation
///
/// An absent argument is skipped, an explicit `null` writes SQL `NULL`.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserFields {
    pub name: Nullable<String>,
    pub email: Nullable<String>,
    pub job_title: Nullable<String>,
    pub joining_date: Nullable<Date>,
    pub content: Nullable<String>,
}

impl UserFields {
    /// Supplied fields in column order.
    pub fn assignments(&self) -> Vec<(Column, Bind)> {
        let mut assignments = Vec::with_capacity(Column::ALL.len());
        push_text(&mut assignments, Column::Name, &self.name);
        push_text(&mut assignments, Column::Email, &self.email);
        push_text(&mut assignments, Column::JobTitle, &self.job_title);
        match &self.joining_date {
            Nullable::ImplicitNull => {}
            Nullable::ExplicitNull => assignments.push((Column::JoiningDate, Bind::Null)),
            Nullable::Some(date) => assignments.push((
                Column::JoiningDate,
                date.clone().into_inner().map_or(Bind::Null, Bind::Text),
            )),
        }
        push_text(&mut assignments, Column::Content, &self.content);
        assignments
    }
}

fn push_text(assignments: &mut Vec<(Column, Bind)>, column: Column, value: &Nullable<String>) {
    match value {
        Nullable::ImplicitNull => {}
        Nullable::ExplicitNull => assignments.push((column, Bind::Null)),
        Nullable::Some(text) => assignments.push((column, Bind::Text(text.clone()))),
    }
}
