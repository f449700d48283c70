//! Table models.
//!
//! One module per table. Every function takes `&impl GenericClient`, so a
//! `tokio_postgres::Transaction` can be passed to group several calls.

mod company;
mod job;
mod user;

pub use company::{Company, CompanyDetail, NewCompany};
pub use job::{Job, NewJob};
pub use user::{User, UserDetail};

use crate::error::{JoblyError, JoblyResult};
use crate::sql::{ClauseResult, UpdateSpec};

/// Reject fields a model does not allow to change.
fn check_updatable(data: &UpdateSpec, updatable: &[&str]) -> JoblyResult<()> {
    match data.keys().find(|k| !updatable.contains(k)) {
        Some(field) => Err(JoblyError::bad_request(format!(
            "Cannot update field: {field}"
        ))),
        None => Ok(()),
    }
}

/// `<base> [WHERE ...] <tail>`, without a dangling space when the filter is empty.
fn with_where(base: &str, clause: &ClauseResult, tail: &str) -> String {
    let mut sql = String::from(base);
    if !clause.is_empty() {
        sql.push(' ');
        sql.push_str(&clause.clause_text);
    }
    sql.push(' ');
    sql.push_str(tail);
    sql
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::SqlValue;

    #[test]
    fn with_where_skips_empty_clause() {
        let sql = with_where("SELECT * FROM jobs", &ClauseResult::default(), "ORDER BY title");
        assert_eq!(sql, "SELECT * FROM jobs ORDER BY title");
    }

    #[test]
    fn with_where_inserts_clause() {
        let clause = ClauseResult::new("WHERE title ILIKE $1", vec![SqlValue::from("%e%")]);
        let sql = with_where("SELECT * FROM jobs", &clause, "ORDER BY title");
        assert_eq!(sql, "SELECT * FROM jobs WHERE title ILIKE $1 ORDER BY title");
    }

    #[test]
    fn check_updatable_names_the_offending_field() {
        let data = UpdateSpec::new().set("title", "x").set("id", 3);
        let err = check_updatable(&data, &["title", "salary"]).unwrap_err();
        assert_eq!(err.to_string(), "Bad request: Cannot update field: id");
    }
}
