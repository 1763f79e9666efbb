// QuantGrid CLI - headless sheet DSL lookup and editing
// Lookups print JSON on stdout; errors go to stderr with a registry exit code.

mod exit_codes;
mod sheet_file;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use quantgrid_core::{filter_items, DashboardFilter, DashboardItem};
use quantgrid_dsl::{append_field, parse_sheet, DslEdit, DslEditor, EditError};

use exit_codes::{EXIT_NOT_FOUND, EXIT_REJECTED, EXIT_SUCCESS, EXIT_USAGE};
use sheet_file::{read_sheet, sheet_name_of, HistoryLog, SheetFileWriter};

#[derive(Parser)]
#[command(name = "qgrid")]
#[command(about = "Inspect and edit QuantGrid sheet DSL files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List table names in declaration order
    Tables {
        file: PathBuf,
    },

    /// Show one table with its fields and source spans
    Table {
        file: PathBuf,
        name: String,
    },

    /// Show one field of a table
    Field {
        file: PathBuf,
        table: String,
        field: String,
    },

    /// Show the last field declared in a table
    LastField {
        file: PathBuf,
        table: String,
    },

    /// Append a field to a table and record it in the history log
    #[command(after_help = "\
Examples:
  qgrid add-field model.qg Sales total '[price] * [qty]'
  qgrid add-field model.qg 'Q1 Sales' margin '[total] - [cost]' --title 'Add margin'")]
    AddField {
        file: PathBuf,
        table: String,
        field: String,
        expression: String,

        /// History title (default: "Add field [<field>] to <table>")
        #[arg(long)]
        title: Option<String>,
    },

    /// Print the edit history recorded for a sheet file
    History {
        file: PathBuf,
    },

    /// List directory entries through a dashboard filter
    Ls {
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// all, folders, projects, files or csvFiles
        #[arg(long, default_value = "all")]
        filter: String,

        /// Include dot-files
        #[arg(long)]
        hidden: bool,
    },
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_USAGE,
            message: msg.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_NOT_FOUND,
            message: msg.into(),
        }
    }
}

impl From<EditError> for CliError {
    fn from(err: EditError) -> Self {
        Self {
            code: EXIT_REJECTED,
            message: err.to_string(),
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Tables { file } => cmd_tables(&file),
        Commands::Table { file, name } => cmd_table(&file, &name),
        Commands::Field { file, table, field } => cmd_field(&file, &table, &field),
        Commands::LastField { file, table } => cmd_last_field(&file, &table),
        Commands::AddField {
            file,
            table,
            field,
            expression,
            title,
        } => cmd_add_field(&file, &table, &field, &expression, title),
        Commands::History { file } => cmd_history(&file),
        Commands::Ls {
            dir,
            filter,
            hidden,
        } => cmd_ls(&dir, &filter, hidden),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            ExitCode::from(code)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CliError::usage(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

fn cmd_tables(file: &Path) -> Result<(), CliError> {
    let text = read_sheet(file).map_err(CliError::usage)?;
    let sheet = parse_sheet(&text);
    for diag in &sheet.diagnostics {
        log::warn!("{}: offset {}: {}", file.display(), diag.offset, diag.message);
    }
    print_json(&sheet.table_names())
}

fn cmd_table(file: &Path, name: &str) -> Result<(), CliError> {
    let text = read_sheet(file).map_err(CliError::usage)?;
    let table = quantgrid_dsl::find_table(&text, name)
        .ok_or_else(|| CliError::not_found(format!("table {} not found", name)))?;
    print_json(&table)
}

fn cmd_field(file: &Path, table: &str, field: &str) -> Result<(), CliError> {
    let text = read_sheet(file).map_err(CliError::usage)?;
    let found = quantgrid_dsl::find_table_field(&text, table, field).ok_or_else(|| {
        CliError::not_found(format!("field [{}] not found in table {}", field, table))
    })?;
    print_json(&found)
}

fn cmd_last_field(file: &Path, table: &str) -> Result<(), CliError> {
    let text = read_sheet(file).map_err(CliError::usage)?;
    let found = quantgrid_dsl::find_last_table_field(&text, table)
        .ok_or_else(|| CliError::not_found(format!("table {} has no fields", table)))?;
    print_json(&found)
}

fn cmd_add_field(
    file: &Path,
    table: &str,
    field: &str,
    expression: &str,
    title: Option<String>,
) -> Result<(), CliError> {
    let text = read_sheet(file).map_err(CliError::usage)?;
    let sheet_name = sheet_name_of(file).map_err(CliError::usage)?;
    let updated = append_field(&text, table, field, expression)
        .ok_or_else(|| CliError::not_found(format!("table {} not found", table)))?;
    let title = title.unwrap_or_else(|| format!("Add field [{}] to {}", field, table));

    let editor = DslEditor::new(
        sheet_name,
        SheetFileWriter::beside(file),
        HistoryLog::for_sheet(file),
    );
    smol::block_on(editor.update_dsl(DslEdit::new(updated, title)))?;
    log::info!("Added [{}] to {} in {}", field, table, file.display());
    Ok(())
}

fn cmd_history(file: &Path) -> Result<(), CliError> {
    let log = HistoryLog::for_sheet(file);
    let records = log.records().map_err(|e| {
        CliError::usage(format!("failed to read {}: {}", log.path().display(), e))
    })?;
    print_json(&records)
}

fn cmd_ls(dir: &Path, filter: &str, hidden: bool) -> Result<(), CliError> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| CliError::usage(format!("failed to read {}: {}", dir.display(), e)))?;

    let mut items = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CliError::usage(e.to_string()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        items.push(if is_dir {
            DashboardItem::folder(name)
        } else {
            DashboardItem::file(name)
        });
    }
    items.sort_by(|a, b| a.name.cmp(&b.name));

    let filter = DashboardFilter::parse(filter);
    print_json(&filter_items(&items, filter, hidden))
}
