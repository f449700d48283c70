use jobly::ClauseConfig;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "jobly.toml";

/// Contents of `jobly.toml`.
///
/// ```toml
/// [filters]
/// numeric_bounds = "bound"
/// max_employees_default = 50000
///
/// [field_names]
/// firstName = "first_name"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub filters: ClauseConfig,
    /// Field name → column name, applied before any `--map` overrides.
    #[serde(default)]
    pub field_names: BTreeMap<String, String>,
}

impl ConfigFile {
    /// Load an explicit config file, or `jobly.toml` from the current
    /// directory when present, or the defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::from_path(path),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_path(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("failed to read config file {}: {e}", path.display())
        })?;
        Self::parse(&raw)
            .map_err(|e| anyhow::anyhow!("failed to parse config file {}: {e}", path.display()))
    }

    fn parse(raw: &str) -> anyhow::Result<Self> {
        let file: ConfigFile = toml::from_str(raw)?;
        file.validate()?;
        Ok(file)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.filters.max_employees_default < 0 {
            anyhow::bail!("filters.max_employees_default must not be negative");
        }
        for (field, column) in &self.field_names {
            if column.is_empty() {
                anyhow::bail!("field_names.{field} maps to an empty column name");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobly::NumericBounds;

    #[test]
    fn empty_file_is_default() {
        let file = ConfigFile::parse("").unwrap();
        assert_eq!(file, ConfigFile::default());
        assert_eq!(file.filters.numeric_bounds, NumericBounds::Inline);
    }

    #[test]
    fn parses_filters_and_field_names() {
        let file = ConfigFile::parse(
            r#"
[filters]
numeric_bounds = "bound"
max_employees_default = 50000

[field_names]
firstName = "first_name"
"#,
        )
        .unwrap();

        assert_eq!(file.filters.numeric_bounds, NumericBounds::Bound);
        assert_eq!(file.filters.max_employees_default, 50_000);
        assert_eq!(file.field_names["firstName"], "first_name");
    }

    #[test]
    fn rejects_unknown_sections() {
        assert!(ConfigFile::parse("[database]\nurl = \"x\"\n").is_err());
    }

    #[test]
    fn rejects_negative_ceiling() {
        assert!(ConfigFile::parse("[filters]\nmax_employees_default = -1\n").is_err());
    }

    #[test]
    fn missing_explicit_file_is_error() {
        let err = ConfigFile::load(Some(Path::new("/nonexistent/jobly.toml"))).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
