pub mod builder;
pub mod cli;
pub mod data;
pub mod error;
pub mod example_table;
pub mod export;
pub mod io_utils;
pub mod kind;
pub mod log_io;
pub mod mapping;
pub mod source;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    builder::convert,
    cli::{Cli, Commands, LogSourceArgs},
    example_table::ExampleTable,
    log_io::{LoadOptions, LogKindFile},
    source::ProcessLogs,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("proclog", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Convert(args) => handle_convert(&args),
        Commands::Schema(args) => handle_schema(&args),
        Commands::Kinds(args) => handle_kinds(&args),
    }
}

/// Loads every `--log` into a registry, in argument order.
pub fn load_logs(args: &LogSourceArgs) -> Result<ProcessLogs> {
    let kinds = match &args.kinds {
        Some(path) => Some(
            LogKindFile::load(path).with_context(|| format!("Loading kind file {path:?}"))?,
        ),
        None => None,
    };
    let options = LoadOptions {
        delimiter: args.delimiter,
        kinds: kinds.as_ref(),
        sample_rows: args.sample_rows,
    };
    let mut logs = ProcessLogs::new();
    for spec in &args.logs {
        let name = spec.resolved_name();
        let table = log_io::load_log(&name, &spec.path, &options)
            .with_context(|| format!("Loading log '{name}' from {:?}", spec.path))?;
        logs.register(table);
    }
    debug!("Registered logs: {:?}", logs.names().collect::<Vec<_>>());
    Ok(logs)
}

fn convert_selected(args: &LogSourceArgs) -> Result<ExampleTable> {
    let logs = load_logs(args)?;
    let table = convert(&logs, args.log_name.as_deref(), None)?;
    Ok(table)
}

fn handle_convert(args: &cli::ConvertArgs) -> Result<()> {
    let table = convert_selected(&args.source)?;
    info!(
        "Converted {} row(s) across {} attribute(s)",
        table.row_count(),
        table.attribute_count()
    );
    if let Some(limit) = args.preview {
        print!("{}", export::render_preview(&table, limit));
        return Ok(());
    }
    let writer = io_utils::open_output(args.output.as_deref())?;
    export::write_table(&table, writer, args.format)
        .with_context(|| format!("Writing {:?} output", args.format))?;
    if let Some(path) = &args.output {
        info!("Example table written to {path:?}");
    }
    Ok(())
}

fn handle_schema(args: &cli::SchemaArgs) -> Result<()> {
    let table = convert_selected(&args.source)?;
    let headers = vec![
        "#".to_string(),
        "name".to_string(),
        "type".to_string(),
        "categories".to_string(),
    ];
    let rows = table
        .attributes()
        .iter()
        .enumerate()
        .map(|(idx, attribute)| {
            vec![
                (idx + 1).to_string(),
                attribute.name().to_string(),
                attribute.value_type().to_string(),
                attribute
                    .mapping()
                    .map(|m| m.len().to_string())
                    .unwrap_or_default(),
            ]
        })
        .collect::<Vec<_>>();
    print!("{}", export::render_rows(&headers, &rows));
    Ok(())
}

fn handle_kinds(args: &cli::KindsArgs) -> Result<()> {
    info!("Inferring column kinds of {:?}", args.input);
    let kinds = log_io::infer_kinds_from_path(&args.input, args.delimiter, args.sample_rows)
        .with_context(|| format!("Inferring kinds from {:?}", args.input))?;
    kinds
        .save(&args.output)
        .with_context(|| format!("Writing kind file to {:?}", args.output))?;
    info!(
        "Kinds for {} column(s) written to {:?}",
        kinds.columns.len(),
        args.output
    );
    Ok(())
}
