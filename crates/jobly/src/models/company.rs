//! The `companies` table.

use super::job::{JOB_COLUMNS, Job};
use super::{check_updatable, with_where};
use crate::client::GenericClient;
use crate::config::ClauseConfig;
use crate::error::{JoblyError, JoblyResult};
use crate::row::{FromRow, RowExt};
use crate::sql::{
    CompanyFilter, FieldNameMap, UpdateSpec, sql_for_company_filter_with, sql_for_partial_update,
};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

const COMPANY_COLUMNS: &str = "handle, name, description, num_employees, logo_url";

const UPDATABLE: &[&str] = &["name", "description", "numEmployees", "logoUrl"];

fn field_names() -> FieldNameMap {
    FieldNameMap::new()
        .map("numEmployees", "num_employees")
        .map("logoUrl", "logo_url")
}

/// A row of `companies`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl FromRow for Company {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            handle: row.try_get_column("handle")?,
            name: row.try_get_column("name")?,
            description: row.try_get_column("description")?,
            num_employees: row.try_get_column("num_employees")?,
            logo_url: row.try_get_column("logo_url")?,
        })
    }
}

/// A company together with its jobs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<Job>,
}

/// Input for [`Company::create`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub num_employees: Option<i32>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl Company {
    /// Insert a company. A handle already in use is a bad request.
    pub async fn create(conn: &impl GenericClient, new: &NewCompany) -> JoblyResult<Company> {
        let duplicate = conn
            .query_opt(
                "SELECT handle FROM companies WHERE handle = $1",
                &[&new.handle],
            )
            .await?;
        if duplicate.is_some() {
            tracing::debug!(handle = %new.handle, "duplicate company");
            return Err(JoblyError::bad_request(format!(
                "Duplicate company: {}",
                new.handle
            )));
        }

        let row = conn
            .query_one(
                &format!(
                    "INSERT INTO companies ({COMPANY_COLUMNS}) \
                     VALUES ($1, $2, $3, $4, $5) \
                     RETURNING {COMPANY_COLUMNS}"
                ),
                &[
                    &new.handle,
                    &new.name,
                    &new.description,
                    &new.num_employees,
                    &new.logo_url,
                ],
            )
            .await?;
        Company::from_row(&row)
    }

    /// List companies matching `filter`, ordered by name.
    pub async fn find_all(
        conn: &impl GenericClient,
        filter: &CompanyFilter,
    ) -> JoblyResult<Vec<Company>> {
        let clause = sql_for_company_filter_with(filter, &ClauseConfig::bound())?;
        let sql = with_where(
            &format!("SELECT {COMPANY_COLUMNS} FROM companies"),
            &clause,
            "ORDER BY name",
        );
        let rows = conn.query(&sql, &clause.params_ref()).await?;
        Company::from_rows(&rows)
    }

    /// Fetch one company and its jobs.
    pub async fn get(conn: &impl GenericClient, handle: &str) -> JoblyResult<CompanyDetail> {
        let row = conn
            .query_opt(
                &format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE handle = $1"),
                &[&handle],
            )
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No company: {handle}")))?;
        let company = Company::from_row(&row)?;

        let rows = conn
            .query(
                &format!("SELECT {JOB_COLUMNS} FROM jobs WHERE company_handle = $1 ORDER BY id"),
                &[&handle],
            )
            .await?;
        let jobs = Job::from_rows(&rows)?;

        Ok(CompanyDetail { company, jobs })
    }

    /// Apply a partial update (`name`, `description`, `numEmployees`, `logoUrl`).
    pub async fn update(
        conn: &impl GenericClient,
        handle: &str,
        data: &UpdateSpec,
    ) -> JoblyResult<Company> {
        let set = sql_for_partial_update(data, &field_names())?;
        check_updatable(data, UPDATABLE)?;

        let handle_idx = set.bound_values.len() + 1;
        let sql = format!(
            "UPDATE companies SET {} WHERE handle = ${handle_idx} RETURNING {COMPANY_COLUMNS}",
            set.clause_text
        );
        let mut params = set.params_ref();
        params.push(&handle);

        let row = conn
            .query_opt(&sql, &params)
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No company: {handle}")))?;
        Company::from_row(&row)
    }

    /// Delete a company (its jobs go with it via `ON DELETE CASCADE`).
    pub async fn remove(conn: &impl GenericClient, handle: &str) -> JoblyResult<()> {
        conn.query_opt(
            "DELETE FROM companies WHERE handle = $1 RETURNING handle",
            &[&handle],
        )
        .await?
        .ok_or_else(|| JoblyError::not_found(format!("No company: {handle}")))?;
        Ok(())
    }
}
