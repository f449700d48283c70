//! The `jobs` table.

use super::{check_updatable, with_where};
use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::row::{FromRow, RowExt};
use crate::sql::{FieldNameMap, JobFilter, UpdateSpec, sql_for_job_filter, sql_for_partial_update};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

pub(super) const JOB_COLUMNS: &str = "id, title, salary, equity, company_handle";

// `id` and `company_handle` are fixed once a job exists.
const UPDATABLE: &[&str] = &["title", "salary", "equity"];

/// A row of `jobs`.
///
/// `equity` is a NUMERIC fraction of the company and serializes as a string
/// (`"0.01"`) to keep its precision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl FromRow for Job {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("company_handle")?,
        })
    }
}

/// Input for [`Job::create`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl Job {
    /// Insert a job. An unknown `company_handle` is a bad request.
    pub async fn create(conn: &impl GenericClient, new: &NewJob) -> JoblyResult<Job> {
        let row = conn
            .query_one(
                &format!(
                    "INSERT INTO jobs (title, salary, equity, company_handle) \
                     VALUES ($1, $2, $3, $4) \
                     RETURNING {JOB_COLUMNS}"
                ),
                &[&new.title, &new.salary, &new.equity, &new.company_handle],
            )
            .await
            .map_err(|e| match e {
                JoblyError::ForeignKeyViolation(_) => {
                    JoblyError::bad_request(format!("No company: {}", new.company_handle))
                }
                other => other,
            })?;
        Job::from_row(&row)
    }

    /// List jobs matching `filter`, ordered by title.
    pub async fn find_all(conn: &impl GenericClient, filter: &JobFilter) -> JoblyResult<Vec<Job>> {
        let clause = sql_for_job_filter(filter)?;
        let sql = with_where(
            &format!("SELECT {JOB_COLUMNS} FROM jobs"),
            &clause,
            "ORDER BY title, id",
        );
        let rows = conn.query(&sql, &clause.params_ref()).await?;
        Job::from_rows(&rows)
    }

    pub async fn get(conn: &impl GenericClient, id: i32) -> JoblyResult<Job> {
        let row = conn
            .query_opt(
                &format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"),
                &[&id],
            )
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No job: {id}")))?;
        Job::from_row(&row)
    }

    /// Apply a partial update (`title`, `salary`, `equity`).
    pub async fn update(conn: &impl GenericClient, id: i32, data: &UpdateSpec) -> JoblyResult<Job> {
        let set = sql_for_partial_update(data, &FieldNameMap::new())?;
        check_updatable(data, UPDATABLE)?;

        let id_idx = set.bound_values.len() + 1;
        let sql = format!(
            "UPDATE jobs SET {} WHERE id = ${id_idx} RETURNING {JOB_COLUMNS}",
            set.clause_text
        );
        let mut params = set.params_ref();
        params.push(&id);

        let row = conn
            .query_opt(&sql, &params)
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No job: {id}")))?;
        Job::from_row(&row)
    }

    pub async fn remove(conn: &impl GenericClient, id: i32) -> JoblyResult<()> {
        conn.query_opt("DELETE FROM jobs WHERE id = $1 RETURNING id", &[&id])
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No job: {id}")))?;
        Ok(())
    }
}
