//! SQL fragment builders.
//!
//! - [`sql_for_partial_update`] turns a partial update into the body of a
//!   `SET` clause.
//! - [`sql_for_company_filter`] / [`sql_for_job_filter`] turn listing criteria
//!   into a `WHERE` clause.
//!
//! Both return a [`ClauseResult`]: SQL text with `$1, $2, ...` placeholders plus
//! the values to bind, ready to be spliced into a statement.
//!
//! # Example
//!
//! ```ignore
//! use jobly::sql::{CompanyFilter, sql_for_company_filter};
//!
//! let filter = CompanyFilter::new().name("at").min_employees(10);
//! let clause = sql_for_company_filter(&filter)?;
//! let sql = format!("SELECT handle, name FROM companies {} ORDER BY name", clause.clause_text);
//! let rows = client.query(&sql, &clause.params_ref()).await?;
//! ```

mod builder;
mod filter;
mod update;


pub use builder::{ClauseBuilder, ClauseResult};
pub use filter::{
    CompanyFilter, JobFilter, NumberToken, parse_number, sql_for_company_filter,
    sql_for_company_filter_with, sql_for_job_filter,
};
pub use update::{FieldNameMap, UpdateSpec, sql_for_partial_update};
