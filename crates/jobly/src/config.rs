//! Clause builder configuration.

use serde::Deserialize;

/// Upper bound used for `maxEmployees` when the caller does not supply one.
pub const DEFAULT_MAX_EMPLOYEES: i64 = 999_999;

/// How validated numeric range bounds reach the SQL text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericBounds {
    /// Write the parsed integers into the clause (`BETWEEN 10 AND 500`).
    #[default]
    Inline,
    /// Bind them as parameters (`BETWEEN $2 AND $3`).
    Bound,
}

/// Configuration for the filter clause builders.
///
/// The default keeps the historical output shape: inline range bounds and a
/// 999999 employee ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClauseConfig {
    /// How `num_employees BETWEEN ...` bounds are emitted.
    pub numeric_bounds: NumericBounds,
    /// Effective maximum when `maxEmployees` is absent.
    pub max_employees_default: i64,
}

impl Default for ClauseConfig {
    fn default() -> Self {
        Self {
            numeric_bounds: NumericBounds::Inline,
            max_employees_default: DEFAULT_MAX_EMPLOYEES,
        }
    }
}

impl ClauseConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration used by the models: every value is a bound parameter.
    pub fn bound() -> Self {
        Self::default().numeric_bounds(NumericBounds::Bound)
    }

    /// Set how numeric bounds are emitted.
    pub fn numeric_bounds(mut self, style: NumericBounds) -> Self {
        self.numeric_bounds = style;
        self
    }

    /// Set the ceiling used when `maxEmployees` is absent.
    pub fn max_employees_default(mut self, max: i64) -> Self {
        self.max_employees_default = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_inline() {
        let config = ClauseConfig::default();
        assert_eq!(config.numeric_bounds, NumericBounds::Inline);
        assert_eq!(config.max_employees_default, 999_999);
    }

    #[test]
    fn deserializes_partial_json() {
        let config: ClauseConfig =
            serde_json::from_str(r#"{ "numeric_bounds": "bound" }"#).unwrap();
        assert_eq!(config, ClauseConfig::bound());
    }
}
