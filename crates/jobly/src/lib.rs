//! # jobly
//!
//! Postgres data layer for a small job board (companies, jobs, users).
//!
//! ## Clause builders
//!
//! The [`sql`] module turns request input into parameterized SQL fragments:
//!
//! ```ignore
//! use jobly::sql::{FieldNameMap, UpdateSpec, sql_for_partial_update};
//!
//! let data = UpdateSpec::new().set("firstName", "Sunshine").set("lastName", "River");
//! let names = FieldNameMap::new()
//!     .map("firstName", "first_name")
//!     .map("lastName", "last_name");
//!
//! let set = sql_for_partial_update(&data, &names)?;
//! assert_eq!(set.clause_text, r#""first_name"=$1, "last_name"=$2"#);
//! ```
//!
//! ```ignore
//! use jobly::sql::{JobFilter, sql_for_job_filter};
//!
//! let filter = JobFilter::new().title("engineer").min_salary(10000).has_equity(true);
//! let clause = sql_for_job_filter(&filter)?;
//! assert_eq!(clause.clause_text, "WHERE title ILIKE $1 AND salary > $2 AND equity > 0");
//! ```
//!
//! ## Models
//!
//! [`Company`], [`Job`] and [`User`] issue those fragments through any
//! [`GenericClient`] (a `tokio_postgres::Client` or `Transaction`):
//!
//! ```ignore
//! let companies = Company::find_all(&client, &CompanyFilter::new().name("at")).await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod ident;
pub mod models;
pub mod row;
pub mod sql;
pub mod value;

pub use client::GenericClient;
pub use config::{ClauseConfig, DEFAULT_MAX_EMPLOYEES, NumericBounds};
pub use error::{JoblyError, JoblyResult};
pub use models::{Company, CompanyDetail, Job, NewCompany, NewJob, User, UserDetail};
pub use row::{FromRow, RowExt};
pub use sql::{
    ClauseBuilder, ClauseResult, CompanyFilter, FieldNameMap, JobFilter, UpdateSpec,
    sql_for_company_filter, sql_for_company_filter_with, sql_for_job_filter,
    sql_for_partial_update,
};
pub use value::SqlValue;
