// opsgrid CLI - headless grid operations

mod exit_codes;
mod script;

use std::cell::RefCell;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use clap::{Parser, Subcommand, ValueEnum};
use opsgrid_config::Settings;
use opsgrid_engine::cell::format_number;
use opsgrid_engine::events::EventCollector;
use opsgrid_engine::formula::eval::{self, EvalResult};
use opsgrid_engine::grid::Grid;
use opsgrid_sheet::SheetEngine;

use exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "ogrid")]
#[command(about = "Single-sheet grid engine (headless)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a formula against data read from stdin
    #[command(after_help = "\
Examples:
  echo '1,2,3' | ogrid calc '=SUM(A1:C1)' -f csv
  cat data.csv | ogrid calc '=AVERAGE(B1:B10)' -f csv --headers
  ogrid calc '=(1+2)*3' -f csv < /dev/null")]
    Calc {
        /// Formula to evaluate (leading = optional)
        formula: String,

        /// Input format
        #[arg(long, short = 'f')]
        from: Format,

        /// CSV delimiter
        #[arg(long, default_value = ",")]
        delimiter: char,

        /// First row is headers (A1 is the first data row)
        #[arg(long)]
        headers: bool,
    },

    /// Run a UI event script against a fresh sheet and print the final grid
    #[command(after_help = "\
Script lines: click A1 | shift-click B2 | dblclick A1 | rclick B2 |
  menu insert-row-above | key Enter | key Ctrl+C | type <text> |
  copy | paste | blur | close-menu | # comment

Examples:
  ogrid replay session.txt
  ogrid replay session.txt --rows 3 --cols 3 --format json")]
    Replay {
        /// Path to the event script
        script: PathBuf,

        /// Grid rows (default from settings)
        #[arg(long)]
        rows: Option<usize>,

        /// Grid columns (default from settings)
        #[arg(long)]
        cols: Option<usize>,

        /// Output format
        #[arg(long, short = 'f', value_enum, default_value = "tsv")]
        format: OutputFormat,

        /// Settings file (JSON, `//` comment lines allowed)
        #[arg(long, env = "OGRID_SETTINGS")]
        settings: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Tsv,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Tsv,
    Json,
}

pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Calc { formula, from, delimiter, headers } => {
            cmd_calc(formula, from, delimiter, headers)
        }
        Commands::Replay { script, rows, cols, format, settings } => {
            cmd_replay(script, rows, cols, format, settings)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

// ============================================================================
// calc
// ============================================================================

fn cmd_calc(formula: String, from: Format, delimiter: char, headers: bool) -> Result<(), CliError> {
    if !delimiter.is_ascii() {
        return Err(CliError::usage(format!("delimiter must be a single ASCII character: {:?}", delimiter)));
    }
    let delimiter = match from {
        Format::Csv => delimiter as u8,
        Format::Tsv => b'\t',
    };

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .map_err(|e| CliError::error(e.to_string()))?;

    let grid = load_grid(&input, delimiter, headers)?;
    let source = formula.strip_prefix('=').unwrap_or(&formula);

    match eval::evaluate(source, &grid) {
        EvalResult::Number(n) => println!("{}", format_number(n)),
        EvalResult::Date(d) => println!("{}", d),
        EvalResult::Error(reason) => {
            // Marker on stdout, diagnostic on stderr
            println!("#ERROR");
            return Err(CliError::error(format!("formula error: {}", reason))
                .with_hint("supported: SUM(A1:B2), AVERAGE(A1:B2), TODAY(), arithmetic with + - * / ( )"));
        }
    }

    Ok(())
}

/// Load delimited text into a grid sized to the data. Empty input gives a 1x1 grid.
fn load_grid(content: &str, delimiter: u8, headers: bool) -> Result<Grid, CliError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(headers)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let line = idx + if headers { 2 } else { 1 };
        let record = result.map_err(|e| CliError::error(format!("line {}: {}", line, e)))?;
        records.push(record);
    }

    let cols = records.iter().map(|r| r.len()).max().unwrap_or(0);
    let mut grid = Grid::new(records.len(), cols);
    for (row, record) in records.iter().enumerate() {
        for (col, field) in record.iter().enumerate() {
            if !field.is_empty() {
                grid.set_input(row, col, field)
                    .map_err(|e| CliError::error(e.to_string()))?;
            }
        }
    }
    Ok(grid)
}

// ============================================================================
// replay
// ============================================================================

fn cmd_replay(
    script_path: PathBuf,
    rows: Option<usize>,
    cols: Option<usize>,
    format: OutputFormat,
    settings_path: Option<PathBuf>,
) -> Result<(), CliError> {
    let source = std::fs::read_to_string(&script_path)
        .map_err(|e| CliError::usage(format!("{}: {}", script_path.display(), e)))?;
    let events = script::parse_script(&source).map_err(|e| {
        CliError::usage(format!("{}: {}", script_path.display(), e))
            .with_hint("run ogrid replay --help for the script syntax")
    })?;

    let mut settings = match settings_path {
        Some(path) if !path.exists() => {
            return Err(CliError::usage(format!("settings file not found: {}", path.display())));
        }
        Some(path) => Settings::load_from(&path),
        None => Settings::default(),
    };
    if let Some(rows) = rows {
        settings.default_rows = rows;
    }
    if let Some(cols) = cols {
        settings.default_columns = cols;
    }

    let changes = Rc::new(RefCell::new(EventCollector::new()));
    let sink = Rc::clone(&changes);
    let mut engine = SheetEngine::from_settings(&settings)
        .on_change(move |change, grid| sink.borrow_mut().push(change, grid));

    for event in events {
        engine.handle(event);
    }
    // A script that ends mid-edit still commits, like the editor losing focus
    engine.commit_edit();

    let grid = engine.grid();
    match format {
        OutputFormat::Tsv => println!("{}", grid.to_tsv()),
        OutputFormat::Json => {
            let report = serde_json::json!({
                "rows": grid.rows(),
                "cols": grid.cols(),
                "changes": changes.borrow().len(),
                "grid": grid,
            });
            let text = serde_json::to_string_pretty(&report)
                .map_err(|e| CliError::error(e.to_string()))?;
            println!("{}", text);
        }
    }

    Ok(())
}
