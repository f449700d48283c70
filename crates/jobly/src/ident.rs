//! Column identifier quoting.
//!
//! Column names in a SET clause are always written as quoted identifiers
//! (`"first_name"`). Postgres has no way to bind identifiers, so anything that
//! reaches the SQL text goes through [`write_quoted`].

use crate::error::{JoblyError, JoblyResult};

/// Check that `name` can be written as a quoted identifier.
pub fn validate_column(name: &str) -> JoblyResult<()> {
    if name.is_empty() {
        return Err(JoblyError::bad_request("Column name cannot be empty"));
    }
    if name.contains('\0') {
        return Err(JoblyError::bad_request(
            "Column name cannot contain NUL character",
        ));
    }
    Ok(())
}

/// Append `name` as a quoted identifier, doubling embedded `"`.
pub(crate) fn write_quoted(name: &str, out: &mut String) {
    out.reserve(name.len() + 2);
    out.push('"');
    for ch in name.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
}

/// Render `name` as a quoted identifier.
pub fn quote(name: &str) -> String {
    let mut out = String::new();
    write_quoted(name, &mut out);
    out
}
