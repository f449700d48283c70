//! `WHERE` clause builders for the company and job listings.
//!
//! Criteria arrive from query strings (text) or JSON (numbers, booleans), so
//! numeric criteria are kept as raw tokens and parsed when the clause is built.

use super::builder::{ClauseBuilder, ClauseResult};
use crate::config::{ClauseConfig, NumericBounds};
use crate::error::{JoblyError, JoblyResult};
use serde::{Deserialize, Deserializer};
use std::fmt::Display;

/// Company listing criteria (`?name=&minEmployees=&maxEmployees=`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyFilter {
    /// Case-insensitive substring of the company name.
    #[serde(default, deserialize_with = "de_token")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de_token")]
    pub min_employees: Option<String>,
    #[serde(default, deserialize_with = "de_token")]
    pub max_employees: Option<String>,
}

impl CompanyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn min_employees(mut self, min: impl Display) -> Self {
        self.min_employees = Some(min.to_string());
        self
    }

    pub fn max_employees(mut self, max: impl Display) -> Self {
        self.max_employees = Some(max.to_string());
        self
    }

    /// Parse from a JSON object such as `{"name": "at", "minEmployees": 100}`.
    pub fn from_json(value: serde_json::Value) -> JoblyResult<Self> {
        serde_json::from_value(value).map_err(|e| JoblyError::bad_request(e.to_string()))
    }

    /// Parse from decoded query-string pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> JoblyResult<Self>
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::from_json(pairs_to_json(pairs))
    }
}

/// Job listing criteria (`?title=&minSalary=&hasEquity=`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobFilter {
    /// Case-insensitive substring of the job title.
    #[serde(default, deserialize_with = "de_token")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "de_token")]
    pub min_salary: Option<String>,
    /// `true` / `"true"` restricts to jobs with non-zero equity.
    #[serde(default, deserialize_with = "de_token")]
    pub has_equity: Option<String>,
}

impl JobFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn min_salary(mut self, min: impl Display) -> Self {
        self.min_salary = Some(min.to_string());
        self
    }

    pub fn has_equity(mut self, has_equity: impl Display) -> Self {
        self.has_equity = Some(has_equity.to_string());
        self
    }

    /// Parse from a JSON object such as `{"title": "engineer", "hasEquity": true}`.
    pub fn from_json(value: serde_json::Value) -> JoblyResult<Self> {
        serde_json::from_value(value).map_err(|e| JoblyError::bad_request(e.to_string()))
    }

    /// Parse from decoded query-string pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> JoblyResult<Self>
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::from_json(pairs_to_json(pairs))
    }
}

/// Outcome of parsing a numeric filter token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberToken {
    /// Not supplied, or blank.
    Absent,
    /// A non-negative integer.
    Valid(i64),
    /// Supplied but not a non-negative integer.
    Invalid,
}

/// Classify a raw numeric filter token.
///
/// Surrounding whitespace is ignored and integral decimals (`"10.0"`, `1e3`)
/// are accepted. Zero is a valid value.
pub fn parse_number(raw: Option<&str>) -> NumberToken {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return NumberToken::Absent;
    };

    if let Ok(n) = raw.parse::<i64>() {
        return if n >= 0 {
            NumberToken::Valid(n)
        } else {
            NumberToken::Invalid
        };
    }

    match raw.parse::<f64>() {
        Ok(x) if x >= 0.0 && x.fract() == 0.0 && x <= i64::MAX as f64 => {
            NumberToken::Valid(x as i64)
        }
        _ => NumberToken::Invalid,
    }
}

/// Cap a bound value at the largest `INTEGER`.
///
/// Placeholders compared against `salary` / `num_employees` are typed INT4,
/// and `> n` or `BETWEEN .. AND n` gives the same rows for any `n` above it.
fn clamp_to_integer(n: i64) -> i64 {
    n.min(i64::from(i32::MAX))
}

fn resolve_number(token: NumberToken, default: i64, message: &str) -> JoblyResult<i64> {
    match token {
        NumberToken::Absent => Ok(default),
        NumberToken::Valid(n) => Ok(n),
        NumberToken::Invalid => Err(JoblyError::bad_request(message)),
    }
}

fn non_blank(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().filter(|s| !s.is_empty())
}

fn is_truthy(raw: &Option<String>) -> bool {
    raw.as_deref()
        .is_some_and(|s| s.trim().eq_ignore_ascii_case("true"))
}

fn ilike(column: &str, needle: &str) -> ClauseBuilder {
    let mut p = ClauseBuilder::new(format!("{column} ILIKE "));
    p.push_bind(format!("%{needle}%"));
    p
}

/// Prefix the predicates with a single `WHERE ` and join them with `AND`.
fn where_clause(predicates: Vec<ClauseBuilder>) -> ClauseResult {
    if predicates.is_empty() {
        return ClauseResult::default();
    }
    let mut clause = ClauseBuilder::new("WHERE ");
    clause.push_joined(predicates, " AND ");
    clause.into_clause()
}

/// Build the company listing `WHERE` clause with the default configuration.
///
/// Range bounds are validated and written inline:
/// `WHERE name ILIKE $1 AND num_employees BETWEEN 10 AND 500`.
pub fn sql_for_company_filter(criteria: &CompanyFilter) -> JoblyResult<ClauseResult> {
    sql_for_company_filter_with(criteria, &ClauseConfig::default())
}

/// Build the company listing `WHERE` clause.
pub fn sql_for_company_filter_with(
    criteria: &CompanyFilter,
    config: &ClauseConfig,
) -> JoblyResult<ClauseResult> {
    let mut predicates = Vec::new();

    if let Some(name) = non_blank(&criteria.name) {
        predicates.push(ilike("name", name));
    }

    let min = parse_number(criteria.min_employees.as_deref());
    let max = parse_number(criteria.max_employees.as_deref());
    if min != NumberToken::Absent || max != NumberToken::Absent {
        let min_value = resolve_number(min, 0, "Minimum employees must be a number")?;
        let max_value = resolve_number(
            max,
            config.max_employees_default,
            "Maximum employees must be a number",
        )?;
        let mut range = ClauseBuilder::new("num_employees BETWEEN ");
        match config.numeric_bounds {
            NumericBounds::Inline => {
                range.push(&format!("{min_value} AND {max_value}"));
            }
            NumericBounds::Bound => {
                range
                    .push_bind(clamp_to_integer(min_value))
                    .push(" AND ")
                    .push_bind(clamp_to_integer(max_value));
            }
        }
        predicates.push(range);
    }

    Ok(where_clause(predicates))
}

/// Build the job listing `WHERE` clause.
///
/// Predicates are emitted in a fixed order (title, salary, equity); only the
/// first two bind values, so placeholder numbers skip nothing.
pub fn sql_for_job_filter(criteria: &JobFilter) -> JoblyResult<ClauseResult> {
    let mut predicates = Vec::new();

    if let Some(title) = non_blank(&criteria.title) {
        predicates.push(ilike("title", title));
    }

    match parse_number(criteria.min_salary.as_deref()) {
        NumberToken::Absent => {}
        NumberToken::Valid(min) => {
            let mut p = ClauseBuilder::new("salary > ");
            p.push_bind(clamp_to_integer(min));
            predicates.push(p);
        }
        NumberToken::Invalid => {
            return Err(JoblyError::bad_request("Minimum salary must be a number"));
        }
    }

    if is_truthy(&criteria.has_equity) {
        predicates.push(ClauseBuilder::new("equity > 0"));
    }

    Ok(where_clause(predicates))
}

fn pairs_to_json<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> serde_json::Value
where
    K: Into<String>,
    V: Into<String>,
{
    serde_json::Value::Object(
        pairs
            .into_iter()
            .map(|(k, v)| (k.into(), serde_json::Value::String(v.into())))
            .collect(),
    )
}

/// Accept a filter token as text, number or boolean and keep it as text.
fn de_token<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Token {
        Int(i64),
        Float(f64),
        Bool(bool),
        Text(String),
    }

    Ok(Option::<Token>::deserialize(deserializer)?.map(|token| match token {
        Token::Int(i) => i.to_string(),
        Token::Float(x) => x.to_string(),
        Token::Bool(b) => b.to_string(),
        Token::Text(s) => s,
    }))
}
