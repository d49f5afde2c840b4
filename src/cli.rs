//! Command-line front end: read a spirit filter template, optionally a
//! cached market data snapshot, and write the generated filter.

use std::error::Error;
use std::fs;
use std::io::IsTerminal;
use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;

use crate::compile::generate_filter;
use crate::compiler::Settings;
use crate::diagnostics::DiagnosticsStore;
use crate::lang::market::{load_from_cache, DataSource, ItemPriceReport};
use crate::lexemes::LexemeTable;
use crate::parser;
use crate::source::SourceMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DataSourceArg {
    /// Compile without market data; autogen blocks resolve to nothing.
    #[default]
    None,
    /// Use a cached poe.ninja snapshot.
    Ninja,
    /// Use a cached poe.watch snapshot.
    Watch,
}

impl From<DataSourceArg> for DataSource {
    fn from(arg: DataSourceArg) -> Self {
        match arg {
            DataSourceArg::None => DataSource::None,
            DataSourceArg::Ninja => DataSource::Ninja,
            DataSourceArg::Watch => DataSource::Watch,
        }
    }
}

impl std::fmt::Display for DataSourceArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(DataSource::from(*self).as_str())
    }
}

#[derive(Parser)]
#[command(name = "fspirit")]
#[command(about = "Compile spirit filter templates into item filters", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Spirit filter template to compile
    pub source: PathBuf,

    /// Where to write the generated filter (stdout if omitted)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Market data source for autogeneration
    #[arg(long, value_enum, default_value_t = DataSourceArg::None)]
    pub data_source: DataSourceArg,

    /// Snapshot cache directory (required unless --data-source none)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// League whose snapshot to use (required unless --data-source none)
    #[arg(long)]
    pub league: Option<String>,

    /// Reject snapshots older than this many hours
    #[arg(long)]
    pub max_data_age: Option<i64>,

    /// Abandon the current subtree on the first error
    #[arg(long)]
    pub stop_on_error: bool,

    /// Treat warnings as errors in the exit code
    #[arg(long)]
    pub treat_warnings_as_errors: bool,

    /// Dump the parsed AST to stderr and exit
    #[arg(long)]
    pub print_ast: bool,
}

/// Entry point; returns the process exit code. `0` on success, `1` when
/// any compile error (or promoted warning) was reported.
pub fn run_cli() -> i32 {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(error) => {
            eprintln!("error: {}", error);
            1
        }
    }
}

fn load_market_data(cli: &Cli) -> Result<ItemPriceReport, Box<dyn Error>> {
    if cli.data_source == DataSourceArg::None {
        return Ok(ItemPriceReport::default());
    }

    let data_dir = cli
        .data_dir
        .as_ref()
        .ok_or("--data-dir is required when --data-source is not 'none'")?;
    let league = cli
        .league
        .as_ref()
        .ok_or("--league is required when --data-source is not 'none'")?;

    let report = load_from_cache(data_dir, cli.data_source.into(), league)?;

    if let Some(max_age) = cli.max_data_age {
        let age = report.metadata.age_hours(Utc::now());
        if age > max_age {
            return Err(format!(
                "cached snapshot is {} hours old, which exceeds --max-data-age {}",
                age, max_age
            )
            .into());
        }
    }

    Ok(report)
}

fn run(cli: &Cli) -> Result<bool, Box<dyn Error>> {
    let source = fs::read_to_string(&cli.source)?;

    if cli.print_ast {
        let mut lexemes = LexemeTable::new();
        match parser::parse_spirit_filter(&source, &mut lexemes) {
            Ok(ast) => {
                eprintln!("{:#?}", ast);
                return Ok(true);
            }
            Err(failure) => {
                eprintln!("{:#?}", failure);
                return Ok(false);
            }
        }
    }

    let report = load_market_data(cli)?;
    let metadata = if cli.data_source == DataSourceArg::None {
        None
    } else {
        Some(&report.metadata)
    };

    let settings = Settings {
        stop_on_error: cli.stop_on_error,
        treat_warnings_as_errors: cli.treat_warnings_as_errors,
    };

    let map = SourceMap::new(source.as_str());
    let mut diagnostics = DiagnosticsStore::new();
    let output = generate_filter(&source, &report.data, metadata, settings, &mut diagnostics);

    if !diagnostics.is_empty() {
        let mut rendered = String::new();
        if std::io::stderr().is_terminal() {
            diagnostics.print_ansi_to(&map, &mut rendered);
        } else {
            diagnostics.print_to(&map, &mut rendered);
        }
        eprint!("{}", rendered);
    }

    let failed = diagnostics.failed(settings.treat_warnings_as_errors);

    if let Some(ref filter_text) = output {
        if !failed {
            match &cli.output {
                Some(path) => fs::write(path, filter_text)?,
                None => print!("{}", filter_text),
            }
        }
    }

    Ok(!failed && output.is_some())
}
