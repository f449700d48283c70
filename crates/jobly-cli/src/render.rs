use crate::cli::{Entity, FilterArgs, UpdateArgs};
use crate::config::ConfigFile;
use jobly::{
    ClauseConfig, ClauseResult, CompanyFilter, FieldNameMap, JobFilter, NumericBounds, SqlValue,
    UpdateSpec,
};
use std::fmt::Write as _;

/// Render the `SET` clause for `jobly update`.
pub fn update(args: &UpdateArgs) -> anyhow::Result<String> {
    let config = ConfigFile::load(args.config.as_deref())?;
    update_with(&config, args)
}

/// Render the `WHERE` clause for `jobly filter`.
pub fn filter(args: &FilterArgs) -> anyhow::Result<String> {
    let config = ConfigFile::load(args.config.as_deref())?;
    filter_with(&config, args)
}

fn update_with(config: &ConfigFile, args: &UpdateArgs) -> anyhow::Result<String> {
    let data: UpdateSpec = args
        .fields
        .iter()
        .map(|(field, raw)| (field.as_str(), parse_value(raw)))
        .collect();

    // `--map` wins over the config file.
    let names: FieldNameMap = config
        .field_names
        .iter()
        .chain(args.maps.iter().map(|(k, v)| (k, v)))
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();

    let clause = jobly::sql_for_partial_update(&data, &names)?;
    output(&clause, args.json)
}

fn filter_with(config: &ConfigFile, args: &FilterArgs) -> anyhow::Result<String> {
    let mut clause_config: ClauseConfig = config.filters.clone();
    if args.bound {
        clause_config = clause_config.numeric_bounds(NumericBounds::Bound);
    }

    let pairs = args.criteria.iter().cloned();
    let clause = match args.entity {
        Entity::Companies => {
            let criteria = CompanyFilter::from_pairs(pairs)?;
            jobly::sql_for_company_filter_with(&criteria, &clause_config)?
        }
        Entity::Jobs => {
            let criteria = JobFilter::from_pairs(pairs)?;
            jobly::sql_for_job_filter(&criteria)?
        }
    };
    output(&clause, args.json)
}

/// Interpret a command-line value: `null`, `true`/`false`, an integer, a
/// finite decimal, else text.
fn parse_value(raw: &str) -> SqlValue {
    match raw {
        "null" => return SqlValue::Null,
        "true" => return SqlValue::Bool(true),
        "false" => return SqlValue::Bool(false),
        _ => {}
    }
    if let Ok(i) = raw.parse::<i64>() {
        return SqlValue::Int(i);
    }
    match raw.parse::<f64>() {
        Ok(x) if x.is_finite() && raw.bytes().any(|b| b.is_ascii_digit()) => SqlValue::Float(x),
        _ => SqlValue::Text(raw.to_string()),
    }
}

fn output(clause: &ClauseResult, json: bool) -> anyhow::Result<String> {
    if json {
        let mut out = serde_json::to_string_pretty(clause)?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = String::new();
    if clause.is_empty() {
        return Ok(out);
    }
    writeln!(out, "{}", clause.clause_text)?;
    for (i, value) in clause.bound_values.iter().enumerate() {
        writeln!(out, "${} = {value}", i + 1)?;
    }
    Ok(out)
}
