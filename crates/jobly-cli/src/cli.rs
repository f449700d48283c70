use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Update,
    Filter,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Update(UpdateArgs),
    Filter(FilterArgs),
}

#[derive(Debug, Clone)]
pub struct UpdateArgs {
    pub config: Option<PathBuf>,
    /// `field=value` pairs, in command-line order.
    pub fields: Vec<(String, String)>,
    /// `--map field=column` overrides.
    pub maps: Vec<(String, String)>,
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Companies,
    Jobs,
}

#[derive(Debug, Clone)]
pub struct FilterArgs {
    pub entity: Entity,
    pub config: Option<PathBuf>,
    /// `key=value` criteria, as they would appear in a query string.
    pub criteria: Vec<(String, String)>,
    pub bound: bool,
    pub json: bool,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    match first.as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help(HelpTopic::Root)),
        "update" => parse_update(it.map(|s| s.as_str())),
        "filter" => parse_filter(it.map(|s| s.as_str())),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

fn split_pair(token: &str) -> anyhow::Result<(String, String)> {
    let Some((key, value)) = token.split_once('=') else {
        anyhow::bail!("expected key=value, got: {token}");
    };
    if key.is_empty() {
        anyhow::bail!("empty key in: {token}");
    }
    Ok((key.to_string(), value.to_string()))
}

fn parse_update<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config: Option<PathBuf> = None;
    let mut fields = Vec::new();
    let mut maps = Vec::new();
    let mut json = false;

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Update)),
            "--config" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--config requires a value");
                };
                config = Some(PathBuf::from(v));
            }
            _ if token.starts_with("--config=") => {
                config = Some(PathBuf::from(token.trim_start_matches("--config=")));
            }
            "--map" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--map requires a value");
                };
                maps.push(split_pair(v)?);
            }
            _ if token.starts_with("--map=") => {
                maps.push(split_pair(token.trim_start_matches("--map="))?);
            }
            "--json" => json = true,
            _ if token.starts_with("--") => anyhow::bail!("unknown argument: {token}"),
            _ => fields.push(split_pair(token)?),
        }
    }

    Ok(Command::Update(UpdateArgs {
        config,
        fields,
        maps,
        json,
    }))
}

fn parse_filter<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut entity: Option<Entity> = None;
    let mut config: Option<PathBuf> = None;
    let mut criteria = Vec::new();
    let mut bound = false;
    let mut json = false;

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Filter)),
            "companies" if entity.is_none() => entity = Some(Entity::Companies),
            "jobs" if entity.is_none() => entity = Some(Entity::Jobs),
            "--config" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--config requires a value");
                };
                config = Some(PathBuf::from(v));
            }
            _ if token.starts_with("--config=") => {
                config = Some(PathBuf::from(token.trim_start_matches("--config=")));
            }
            "--bound" => bound = true,
            "--json" => json = true,
            _ if token.starts_with("--") => anyhow::bail!("unknown argument: {token}"),
            _ if entity.is_none() => anyhow::bail!("unknown entity: {token} (expected companies or jobs)"),
            _ => criteria.push(split_pair(token)?),
        }
    }

    let Some(entity) = entity else {
        anyhow::bail!("filter requires an entity: companies or jobs");
    };

    Ok(Command::Filter(FilterArgs {
        entity,
        config,
        criteria,
        bound,
        json,
    }))
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
jobly - render jobly SQL clauses

USAGE:
  jobly <COMMAND> [OPTIONS]

COMMANDS:
  update        Render a partial-update SET clause
  filter        Render a company/job listing WHERE clause

Run `jobly <command> --help` for more."
            );
        }
        HelpTopic::Update => {
            println!(
                "\
USAGE:
  jobly update <FIELD=VALUE>... [OPTIONS]

Values parse as null, true/false, integers, decimals, else text.

OPTIONS:
  --map <FIELD=COLUMN>  Map a field to a column (repeatable)
  --config <FILE>       Config file (default: jobly.toml if present)
  --json                Print the clause as JSON
  -h, --help            Print help"
            );
        }
        HelpTopic::Filter => {
            println!(
                "\
USAGE:
  jobly filter companies [name=..] [minEmployees=..] [maxEmployees=..] [OPTIONS]
  jobly filter jobs [title=..] [minSalary=..] [hasEquity=true] [OPTIONS]

OPTIONS:
  --bound               Bind employee range bounds as parameters
  --config <FILE>       Config file (default: jobly.toml if present)
  --json                Print the clause as JSON
  -h, --help            Print help"
            );
        }
    }
}
