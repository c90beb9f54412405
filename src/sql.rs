//! Parameterized statements against the `users` table.
//!
//! Column names come only from [`Column`]; caller data only ever travels as a
//! [`Bind`] value.

use crate::error::Error;
use crate::types::UserFields;

const TABLE: &str = "users";

/// `joining_date` is read back as text whatever its SQL type is.
const SELECT_COLUMNS: &str = "CAST(id AS SIGNED) AS id, name, email, job_title, \
                              CAST(joining_date AS CHAR) AS joining_date, content";

/// Writable columns of the `users` table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    Name,
    Email,
    JobTitle,
    JoiningDate,
    Content,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Name,
        Column::Email,
        Column::JobTitle,
        Column::JoiningDate,
        Column::Content,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::Email => "email",
            Column::JobTitle => "job_title",
            Column::JoiningDate => "joining_date",
            Column::Content => "content",
        }
    }
}

/// A positional parameter value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Bind {
    Int(i32),
    Text(String),
    Null,
}

/// SQL text with `?` placeholders and the values bound to them, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Statement {
    sql: String,
    binds: Vec<Bind>,
}

impl Statement {
    fn new(sql: String, binds: Vec<Bind>) -> Self {
        Self { sql, binds }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn binds(&self) -> &[Bind] {
        &self.binds
    }
}

pub fn select_users() -> Statement {
    Statement::new(
        format!("SELECT {SELECT_COLUMNS} FROM {TABLE} ORDER BY id"),
        Vec::new(),
    )
}

pub fn select_user(id: i32) -> Statement {
    Statement::new(
        format!("SELECT {SELECT_COLUMNS} FROM {TABLE} WHERE id = ?"),
        vec![Bind::Int(id)],
    )
}

/// Inserts exactly the supplied columns. With nothing supplied the row takes
/// the table defaults.
pub fn insert_user(fields: &UserFields) -> Statement {
    let (columns, binds): (Vec<_>, Vec<_>) = fields
        .assignments()
        .into_iter()
        .map(|(column, bind)| (column.name(), bind))
        .unzip();
    let placeholders = vec!["?"; columns.len()].join(", ");
    Statement::new(
        format!(
            "INSERT INTO {TABLE} ({}) VALUES ({placeholders})",
            columns.join(", ")
        ),
        binds,
    )
}

/// # Errors
///
/// [`Error::EmptyUpdate`] when no field besides `id` was supplied.
pub fn update_user(id: i32, fields: &UserFields) -> Result<Statement, Error> {
    let assignments = fields.assignments();
    if assignments.is_empty() {
        return Err(Error::EmptyUpdate);
    }
    let (columns, mut binds): (Vec<_>, Vec<_>) = assignments
        .into_iter()
        .map(|(column, bind)| (format!("{} = ?", column.name()), bind))
        .unzip();
    binds.push(Bind::Int(id));
    let sql = format!("UPDATE {TABLE} SET {} WHERE id = ?", columns.join(", "));
    Ok(Statement::new(sql, binds))
}

pub fn delete_user(id: i32) -> Statement {
    Statement::new(
        format!("DELETE FROM {TABLE} WHERE id = ?"),
        vec![Bind::Int(id)],
    )
}

#[cfg(test)]
mod tests {
    use juniper::Nullable;

    use super::*;
    use crate::types::Date;

    fn ann() -> UserFields {
        UserFields {
            name: Nullable::Some("Ann".into()),
            email: Nullable::Some("a@x.com".into()),
            ..Default::default()
        }
    }

    #[test]
    fn insert_lists_only_supplied_columns() {
        let statement = insert_user(&ann());
        assert_eq!(
            statement.sql(),
            "INSERT INTO users (name, email) VALUES (?, ?)"
        );
        assert_eq!(
            statement.binds(),
            &[Bind::Text("Ann".into()), Bind::Text("a@x.com".into())]
        );
    }

    #[test]
    fn insert_without_fields_uses_defaults() {
        let statement = insert_user(&UserFields::default());
        assert_eq!(statement.sql(), "INSERT INTO users () VALUES ()");
        assert!(statement.binds().is_empty());
    }

    #[test]
    fn update_binds_fields_then_id() {
        let fields = UserFields {
            job_title: Nullable::Some("Engineer".into()),
            joining_date: Nullable::Some(Date::new("20240101")),
            content: Nullable::ExplicitNull,
            ..Default::default()
        };
        let statement = update_user(7, &fields).expect("statement");
        assert_eq!(
            statement.sql(),
            "UPDATE users SET job_title = ?, joining_date = ?, content = ? WHERE id = ?"
        );
        assert_eq!(
            statement.binds(),
            &[
                Bind::Text("Engineer".into()),
                Bind::Text("20240101".into()),
                Bind::Null,
                Bind::Int(7),
            ]
        );
    }

    #[test]
    fn update_without_fields_is_rejected() {
        assert!(matches!(
            update_user(7, &UserFields::default()),
            Err(Error::EmptyUpdate)
        ));
    }

    #[test]
    fn reads_and_deletes_bind_the_id() {
        let select = select_user(3);
        assert!(select.sql().ends_with("FROM users WHERE id = ?"));
        assert_eq!(select.binds(), &[Bind::Int(3)]);

        let delete = delete_user(3);
        assert_eq!(delete.sql(), "DELETE FROM users WHERE id = ?");
        assert_eq!(delete.binds(), &[Bind::Int(3)]);

        assert!(select_users().binds().is_empty());
    }

    #[test]
    fn column_names_match_the_table() {
        let names: Vec<_> = Column::ALL.iter().map(|column| column.name()).collect();
        assert_eq!(
            names,
            ["name", "email", "job_title", "joining_date", "content"]
        );
    }
}
