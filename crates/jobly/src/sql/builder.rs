use crate::value::SqlValue;
use serde::Serialize;
use tokio_postgres::types::ToSql;

#[derive(Debug, Clone, PartialEq)]
enum SqlPart {
    Raw(String),
    Param,
}

/// A parameter-safe SQL fragment builder.
///
/// `ClauseBuilder` stores SQL pieces and bind values separately and generates
/// `$1, $2, ...` placeholders when rendered, so fragments can be concatenated
/// without tracking indices by hand.
#[must_use]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClauseBuilder {
    parts: Vec<SqlPart>,
    params: Vec<SqlValue>,
}

impl ClauseBuilder {
    /// Create a new builder with an initial SQL fragment.
    pub fn new(initial_sql: impl Into<String>) -> Self {
        let mut builder = Self::empty();
        builder.push(&initial_sql.into());
        builder
    }

    /// Create an empty builder.
    pub fn empty() -> Self {
        Self {
            parts: Vec::new(),
            params: Vec::new(),
        }
    }

    /// Append raw SQL (no parameters).
    pub fn push(&mut self, sql: &str) -> &mut Self {
        if sql.is_empty() {
            return self;
        }

        match self.parts.last_mut() {
            Some(SqlPart::Raw(last)) => last.push_str(sql),
            _ => self.parts.push(SqlPart::Raw(sql.to_string())),
        }
        self
    }

    /// Append a parameter placeholder and bind its value.
    pub fn push_bind(&mut self, value: impl Into<SqlValue>) -> &mut Self {
        self.parts.push(SqlPart::Param);
        self.params.push(value.into());
        self
    }

    /// Append a quoted column identifier.
    pub fn push_quoted(&mut self, column: &str) -> &mut Self {
        match self.parts.last_mut() {
            Some(SqlPart::Raw(last)) => crate::ident::write_quoted(column, last),
            _ => {
                let mut s = String::new();
                crate::ident::write_quoted(column, &mut s);
                self.parts.push(SqlPart::Raw(s));
            }
        }
        self
    }

    /// Append another fragment, consuming it. Its placeholders are renumbered
    /// after the ones already present.
    pub fn push_sql(&mut self, other: ClauseBuilder) -> &mut Self {
        for part in other.parts {
            match part {
                SqlPart::Raw(s) => {
                    self.push(&s);
                }
                SqlPart::Param => self.parts.push(SqlPart::Param),
            }
        }
        self.params.extend(other.params);
        self
    }

    /// Append fragments separated by `sep`. Empty fragments are skipped.
    pub fn push_joined(
        &mut self,
        fragments: impl IntoIterator<Item = ClauseBuilder>,
        sep: &str,
    ) -> &mut Self {
        let mut first = true;
        for fragment in fragments {
            if fragment.is_empty() {
                continue;
            }
            if !first {
                self.push(sep);
            }
            first = false;
            self.push_sql(fragment);
        }
        self
    }

    /// Whether nothing has been pushed.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Number of bound values.
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Render SQL with `$1, $2, ...` placeholders.
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        let mut idx: usize = 0;
        for part in &self.parts {
            match part {
                SqlPart::Raw(s) => out.push_str(s),
                SqlPart::Param => {
                    idx += 1;
                    out.push('$');
                    out.push_str(&idx.to_string());
                }
            }
        }
        out
    }

    /// Render into a [`ClauseResult`].
    pub fn into_clause(self) -> ClauseResult {
        ClauseResult {
            clause_text: self.to_sql(),
            bound_values: self.params,
        }
    }
}

/// A rendered SQL fragment plus the values for its placeholders.
///
/// Placeholders in `clause_text` are 1-indexed and line up with
/// `bound_values` positionally.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClauseResult {
    pub clause_text: String,
    pub bound_values: Vec<SqlValue>,
}

impl ClauseResult {
    pub fn new(clause_text: impl Into<String>, bound_values: Vec<SqlValue>) -> Self {
        Self {
            clause_text: clause_text.into(),
            bound_values,
        }
    }

    /// Whether the clause contributes nothing.
    pub fn is_empty(&self) -> bool {
        self.clause_text.is_empty()
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.bound_values
            .iter()
            .map(|p| p as &(dyn ToSql + Sync))
            .collect()
    }
}
