use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{export::OutputFormat, log_io::DEFAULT_SAMPLE_ROWS};

#[derive(Debug, Parser)]
#[command(author, version, about = "Convert process logs into typed example tables", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert one of the supplied logs into an example table
    Convert(ConvertArgs),
    /// List the attributes a conversion would produce
    Schema(SchemaArgs),
    /// Infer column kinds of a log file and write them to a YAML kind file
    Kinds(KindsArgs),
}

/// A log file registered under a name, written as `NAME=PATH` or `PATH`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSpec {
    pub name: Option<String>,
    pub path: PathBuf,
}

impl LogSpec {
    /// Registered name: the explicit one, else the file stem.
    pub fn resolved_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .filter(|stem| !stem.is_empty() && *stem != "-")
                .unwrap_or("stdin")
                .to_string()
        })
    }
}

pub fn parse_log_spec(value: &str) -> Result<LogSpec, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("Log specification cannot be empty".to_string());
    }
    match trimmed.split_once('=') {
        Some((name, path)) => {
            let name = name.trim();
            let path = path.trim();
            if name.is_empty() {
                return Err(format!("Log specification '{value}' is missing a name"));
            }
            if path.is_empty() {
                return Err(format!("Log specification '{value}' is missing a path"));
            }
            Ok(LogSpec {
                name: Some(name.to_string()),
                path: PathBuf::from(path),
            })
        }
        None => Ok(LogSpec {
            name: None,
            path: PathBuf::from(trimmed),
        }),
    }
}

#[derive(Debug, Clone, Args)]
pub struct LogSourceArgs {
    /// Log file to register, as `NAME=PATH` or `PATH` (name defaults to the file stem)
    #[arg(short = 'l', long = "log", value_parser = parse_log_spec, action = clap::ArgAction::Append)]
    pub logs: Vec<LogSpec>,
    /// Name of the log to convert (empty: use the first log supplied)
    #[arg(short = 'n', long = "log-name")]
    pub log_name: Option<String>,
    /// YAML kind file declaring each column's kind (skips inference)
    #[arg(short = 'k', long = "kinds")]
    pub kinds: Option<PathBuf>,
    /// Number of rows to sample when inferring kinds (0 means full scan)
    #[arg(long, default_value_t = DEFAULT_SAMPLE_ROWS)]
    pub sample_rows: usize,
    /// Field delimiter of the log files (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub source: LogSourceArgs,
    /// Output file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,
    /// Print the first N converted rows as a table instead of writing output (0 for all rows)
    #[arg(long)]
    pub preview: Option<usize>,
}

#[derive(Debug, Args)]
pub struct SchemaArgs {
    #[command(flatten)]
    pub source: LogSourceArgs,
}

#[derive(Debug, Args)]
pub struct KindsArgs {
    /// Log file to inspect
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Destination YAML kind file
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
    /// Number of rows to sample when inferring kinds (0 means full scan)
    #[arg(long, default_value_t = DEFAULT_SAMPLE_ROWS)]
    pub sample_rows: usize,
    /// Field delimiter of the log file (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_spec_accepts_named_and_bare_paths() {
        let named = parse_log_spec("cpu=logs/cpu.csv").unwrap();
        assert_eq!(named.name.as_deref(), Some("cpu"));
        assert_eq!(named.path, PathBuf::from("logs/cpu.csv"));
        assert_eq!(named.resolved_name(), "cpu");

        let bare = parse_log_spec("logs/run_1.csv").unwrap();
        assert_eq!(bare.name, None);
        assert_eq!(bare.resolved_name(), "run_1");

        assert_eq!(parse_log_spec("-").unwrap().resolved_name(), "stdin");
    }

    #[test]
    fn log_spec_rejects_empty_parts() {
        assert!(parse_log_spec("").is_err());
        assert!(parse_log_spec("=run.csv").is_err());
        assert!(parse_log_spec("run=").is_err());
    }

    #[test]
    fn parse_delimiter_accepts_names_and_characters() {
        assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
        assert_eq!(parse_delimiter("pipe").unwrap(), b'|');
        assert_eq!(parse_delimiter(":").unwrap(), b':');
        assert!(parse_delimiter("::").is_err());
        assert!(parse_delimiter("").is_err());
    }

    #[test]
    fn cli_parses_convert_arguments() {
        let cli = Cli::try_parse_from([
            "proclog", "convert", "-l", "a=a.csv", "-l", "b.csv", "-n", "b", "--format", "json",
        ])
        .unwrap();
        let Commands::Convert(args) = cli.command else {
            panic!("expected convert command");
        };
        assert_eq!(args.source.logs.len(), 2);
        assert_eq!(args.source.log_name.as_deref(), Some("b"));
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.source.sample_rows, DEFAULT_SAMPLE_ROWS);
    }
}
