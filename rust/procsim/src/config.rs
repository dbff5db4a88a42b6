//! Parser for plain-text workload descriptions.
//!
//! Converts workload files into [`ScenarioBuilder`]s. One process per line;
//! two line formats are accepted:
//!
//! - burst form: `name arrival priority kind:duration [kind:duration ...]`,
//!   where `kind` is `calc`/`cpu` for a CPU burst or `io` for an I/O burst
//! - shorthand: `name arrival burst priority [quantum]`, a single CPU burst
//!
//! A line is read in burst form when any token after the name contains a
//! `:`. Blank lines and lines starting with `#` or `;` are ignored.
//!
//! ```text
//! # name arrival priority bursts...
//! P1 0 2 calc:4 io:3 calc:2
//! P2 1 1 cpu:6
//! ; shorthand
//! P3 2 8 3 4
//! ```
//!
//! Only syntax is checked here. Zero durations, duplicate names and the
//! like are reported by [`Scenario::validate`](crate::Scenario::validate).

use std::path::Path;

use tracing::warn;

use crate::process::{Operation, OperationKind, ProcessDef};
use crate::scenario::{PolicyKind, Scenario, ScenarioBuilder};
use crate::types::{Priority, Tick};

/// Errors from reading a workload.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io(std::io::Error),
    /// A line could not be parsed. `line` is 1-based.
    Parse { line: usize, message: String },
    /// The workload defines no process.
    Empty,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read workload: {e}"),
            ConfigError::Parse { line, message } => write!(f, "line {line}: {message}"),
            ConfigError::Empty => write!(f, "workload defines no process"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

/// A parsed workload: processes in file order plus the Round Robin quantum
/// requested by shorthand lines, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    pub processes: Vec<ProcessDef>,
    pub quantum: Option<Tick>,
}

impl Workload {
    /// Start a scenario from this workload under the given policy.
    pub fn into_scenario(self, policy: PolicyKind) -> ScenarioBuilder {
        self.processes
            .into_iter()
            .fold(Scenario::builder().policy(policy), |builder, def| {
                builder.process(def)
            })
    }
}

/// Read and parse a workload file.
pub fn load_workload(path: impl AsRef<Path>) -> Result<Workload, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    parse_workload(&text)
}

/// Parse workload text.
pub fn parse_workload(text: &str) -> Result<Workload, ConfigError> {
    let mut processes = Vec::new();
    let mut quantum: Option<Tick> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        if tokens[1..].iter().any(|t| t.contains(':')) {
            processes.push(parse_burst_line(line, &tokens)?);
        } else {
            let (def, line_quantum) = parse_shorthand_line(line, &tokens)?;
            processes.push(def);
            match (quantum, line_quantum) {
                (None, Some(q)) => quantum = Some(q),
                (Some(current), Some(q)) if q != current => warn!(
                    line,
                    quantum = q,
                    using = current,
                    "conflicting quantum ignored"
                ),
                _ => {}
            }
        }
    }

    if processes.is_empty() {
        return Err(ConfigError::Empty);
    }
    Ok(Workload { processes, quantum })
}

/// `name arrival priority kind:duration...`
fn parse_burst_line(line: usize, tokens: &[&str]) -> Result<ProcessDef, ConfigError> {
    if tokens.len() < 4 {
        return Err(parse_error(
            line,
            "expected `name arrival priority kind:duration...`",
        ));
    }
    let arrival: Tick = parse_number(line, "arrival", tokens[1])?;
    let priority: Priority = parse_number(line, "priority", tokens[2])?;
    let operations = tokens[3..]
        .iter()
        .map(|token| parse_operation(line, token))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ProcessDef {
        name: tokens[0].to_string(),
        arrival,
        priority,
        operations,
    })
}

/// `name arrival burst priority [quantum]`
fn parse_shorthand_line(
    line: usize,
    tokens: &[&str],
) -> Result<(ProcessDef, Option<Tick>), ConfigError> {
    if !(4..=5).contains(&tokens.len()) {
        return Err(parse_error(
            line,
            "expected `name arrival burst priority [quantum]`",
        ));
    }
    let arrival: Tick = parse_number(line, "arrival", tokens[1])?;
    let burst: Tick = parse_number(line, "burst", tokens[2])?;
    let priority: Priority = parse_number(line, "priority", tokens[3])?;
    let quantum = tokens
        .get(4)
        .map(|t| parse_number::<Tick>(line, "quantum", t))
        .transpose()?;
    let def = ProcessDef {
        name: tokens[0].to_string(),
        arrival,
        priority,
        operations: vec![Operation::cpu(burst)],
    };
    Ok((def, quantum))
}

fn parse_operation(line: usize, token: &str) -> Result<Operation, ConfigError> {
    let (kind, duration) = token
        .split_once(':')
        .ok_or_else(|| parse_error(line, format!("expected `kind:duration`, got {token:?}")))?;
    let kind = match kind.to_ascii_lowercase().as_str() {
        "calc" | "cpu" => OperationKind::Cpu,
        "io" => OperationKind::Io,
        other => {
            return Err(parse_error(line, format!("unknown burst kind {other:?}")));
        }
    };
    Ok(Operation {
        kind,
        duration: parse_number(line, "duration", duration)?,
    })
}

fn parse_number<T: std::str::FromStr>(
    line: usize,
    field: &str,
    token: &str,
) -> Result<T, ConfigError> {
    token
        .parse()
        .map_err(|_| parse_error(line, format!("invalid {field} {token:?}")))
}

fn parse_error(line: usize, message: impl Into<String>) -> ConfigError {
    ConfigError::Parse {
        line,
        message: message.into(),
    }
}
