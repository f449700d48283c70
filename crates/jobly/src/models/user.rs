//! The `users` table and job applications.

use super::check_updatable;
use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::row::{FromRow, RowExt};
use crate::sql::{FieldNameMap, UpdateSpec, sql_for_partial_update};
use serde::Serialize;
use tokio_postgres::Row;

const USER_COLUMNS: &str = "username, first_name, last_name, email, is_admin";

// No `password`: hashing happens outside this crate.
const UPDATABLE: &[&str] = &["firstName", "lastName", "email", "isAdmin"];

fn field_names() -> FieldNameMap {
    FieldNameMap::new()
        .map("firstName", "first_name")
        .map("lastName", "last_name")
        .map("isAdmin", "is_admin")
}

/// A row of `users`, without the password hash.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

impl FromRow for User {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            username: row.try_get_column("username")?,
            first_name: row.try_get_column("first_name")?,
            last_name: row.try_get_column("last_name")?,
            email: row.try_get_column("email")?,
            is_admin: row.try_get_column("is_admin")?,
        })
    }
}

/// A user together with the ids of the jobs they applied to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    pub jobs: Vec<i32>,
}

fn no_user(username: &str) -> JoblyError {
    JoblyError::not_found(format!("No user: {username}"))
}

impl User {
    pub async fn find_all(conn: &impl GenericClient) -> JoblyResult<Vec<User>> {
        let rows = conn
            .query(
                &format!("SELECT {USER_COLUMNS} FROM users ORDER BY username"),
                &[],
            )
            .await?;
        User::from_rows(&rows)
    }

    /// Fetch one user and their applications.
    pub async fn get(conn: &impl GenericClient, username: &str) -> JoblyResult<UserDetail> {
        let row = conn
            .query_opt(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1"),
                &[&username],
            )
            .await?
            .ok_or_else(|| no_user(username))?;
        let user = User::from_row(&row)?;

        let rows = conn
            .query(
                "SELECT job_id FROM applications WHERE username = $1 ORDER BY job_id",
                &[&username],
            )
            .await?;
        let jobs = rows
            .iter()
            .map(|r| r.try_get_column::<i32>("job_id"))
            .collect::<JoblyResult<Vec<_>>>()?;

        Ok(UserDetail { user, jobs })
    }

    /// Apply a partial update (`firstName`, `lastName`, `email`, `isAdmin`).
    pub async fn update(
        conn: &impl GenericClient,
        username: &str,
        data: &UpdateSpec,
    ) -> JoblyResult<User> {
        let set = sql_for_partial_update(data, &field_names())?;
        check_updatable(data, UPDATABLE)?;

        let username_idx = set.bound_values.len() + 1;
        let sql = format!(
            "UPDATE users SET {} WHERE username = ${username_idx} RETURNING {USER_COLUMNS}",
            set.clause_text
        );
        let mut params = set.params_ref();
        params.push(&username);

        let row = conn
            .query_opt(&sql, &params)
            .await?
            .ok_or_else(|| no_user(username))?;
        User::from_row(&row)
    }

    pub async fn remove(conn: &impl GenericClient, username: &str) -> JoblyResult<()> {
        conn.query_opt(
            "DELETE FROM users WHERE username = $1 RETURNING username",
            &[&username],
        )
        .await?
        .ok_or_else(|| no_user(username))?;
        Ok(())
    }

    /// Record that `username` applied to job `job_id`.
    pub async fn apply_to_job(
        conn: &impl GenericClient,
        username: &str,
        job_id: i32,
    ) -> JoblyResult<()> {
        conn.query_opt("SELECT id FROM jobs WHERE id = $1", &[&job_id])
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No job: {job_id}")))?;
        conn.query_opt("SELECT username FROM users WHERE username = $1", &[&username])
            .await?
            .ok_or_else(|| no_user(username))?;

        conn.execute(
            "INSERT INTO applications (job_id, username) VALUES ($1, $2)",
            &[&job_id, &username],
        )
        .await
        .map_err(|e| match e {
            JoblyError::UniqueViolation(_) => {
                tracing::debug!(%username, job_id, "duplicate application");
                JoblyError::bad_request(format!("{username} already applied to job {job_id}"))
            }
            other => other,
        })?;
        Ok(())
    }
}
