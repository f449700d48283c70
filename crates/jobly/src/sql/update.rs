//! Partial-update `SET` clause builder.

use super::builder::{ClauseBuilder, ClauseResult};
use crate::error::{JoblyError, JoblyResult};
use crate::ident::validate_column;
use crate::value::SqlValue;
use std::collections::HashMap;

/// Field name → new value, in insertion order.
///
/// Setting a key twice keeps its original position and replaces the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSpec {
    fields: Vec<(String, SqlValue)>,
}

impl UpdateSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field (consuming version, for chaining).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Set a field in place.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<SqlValue>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == field) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((field, value)),
        }
    }

    /// Remove a field, returning its value.
    pub fn remove(&mut self, field: &str) -> Option<SqlValue> {
        let pos = self.fields.iter().position(|(k, _)| k == field)?;
        Some(self.fields.remove(pos).1)
    }

    pub fn get(&self, field: &str) -> Option<&SqlValue> {
        self.fields.iter().find(|(k, _)| k == field).map(|(_, v)| v)
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build from a JSON object, keeping its key order.
    pub fn from_json(value: serde_json::Value) -> JoblyResult<Self> {
        let serde_json::Value::Object(map) = value else {
            return Err(JoblyError::bad_request("Update payload must be a JSON object"));
        };

        let mut spec = Self::new();
        for (field, value) in map {
            spec.insert(field, SqlValue::from_json(value)?);
        }
        Ok(spec)
    }
}

impl<K: Into<String>, V: Into<SqlValue>> FromIterator<(K, V)> for UpdateSpec {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut spec = Self::new();
        for (k, v) in iter {
            spec.insert(k, v);
        }
        spec
    }
}

/// Logical field name → physical column name.
///
/// Fields without an entry are used verbatim as the column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldNameMap {
    columns: HashMap<String, String>,
}

impl FieldNameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mapping (consuming version, for chaining).
    pub fn map(mut self, field: impl Into<String>, column: impl Into<String>) -> Self {
        self.columns.insert(field.into(), column.into());
        self
    }

    /// Column for `field`, falling back to the field name itself.
    pub fn column<'a>(&'a self, field: &'a str) -> &'a str {
        self.columns.get(field).map(String::as_str).unwrap_or(field)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldNameMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Build the body of a `SET` clause from a partial update.
///
/// Each field becomes `"<column>"=$<n>` in insertion order, joined by `", "`;
/// the values are returned in the same order, unchanged.
///
/// ```ignore
/// let data = UpdateSpec::new().set("firstName", "Aliya").set("age", 32);
/// let names = FieldNameMap::new().map("firstName", "first_name");
/// let set = sql_for_partial_update(&data, &names)?;
/// assert_eq!(set.clause_text, r#""first_name"=$1, "age"=$2"#);
/// ```
pub fn sql_for_partial_update(
    data: &UpdateSpec,
    field_names: &FieldNameMap,
) -> JoblyResult<ClauseResult> {
    if data.is_empty() {
        return Err(JoblyError::bad_request("No data"));
    }

    let mut set = ClauseBuilder::empty();
    for (i, (field, value)) in data.iter().enumerate() {
        let column = field_names.column(field);
        validate_column(column)?;
        if i > 0 {
            set.push(", ");
        }
        set.push_quoted(column).push("=").push_bind(value.clone());
    }
    Ok(set.into_clause())
}
