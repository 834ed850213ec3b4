//! wtbrowse: browse and export tables from a storage engine backup.
//!
//! ```text
//! wtbrowse list-tables <db_path>
//! wtbrowse info <db_path> <table>
//! wtbrowse export <db_path> <table> <output_file> [-f json|csv] [-l N]
//! wtbrowse export-all <db_path> <output_dir> [-f json|csv] [-l N]
//! ```
//!
//! Results go to stdout, diagnostics and logs to stderr. Any error exits 1.
//! `export-all` exits 0 as long as the catalog could be listed, even if some
//! tables failed.

mod commands;
mod format;
mod parse;

use std::path::PathBuf;
use std::process;

use tracing::debug;
use tracing_subscriber::EnvFilter;
use wtbrowse_browser::{BrowseError, Browser, BrowserConfig};

use commands::build_cli;
use format::{
    format_batch_failures, format_batch_report, format_count_warning, format_error,
    format_export, format_missing_table, format_table_info, format_tables, OutputMode,
};
use parse::{matches_to_action, CliAction};

fn main() {
    let matches = build_cli().get_matches();

    init_logging(matches.get_flag("verbose"));

    let mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let config = match load_config(matches.get_one::<String>("config").map(PathBuf::from)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format_error(&e, mode));
            process::exit(1);
        }
    };

    let action = match matches_to_action(&matches, &config) {
        Ok(action) => action,
        Err(e) => {
            eprintln!("{}", format_error(&e, mode));
            process::exit(1);
        }
    };

    process::exit(run(action, &config, mode));
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("wtbrowse=debug,wtbrowse_browser=debug,wtbrowse_storage=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn load_config(explicit: Option<PathBuf>) -> Result<BrowserConfig, BrowseError> {
    let cwd = std::env::current_dir()?;
    let config = BrowserConfig::load(explicit.as_deref(), &cwd)?;
    debug!(?config, "loaded configuration");
    Ok(config)
}

/// Execute one action and return the process exit code.
fn run(action: CliAction, config: &BrowserConfig, mode: OutputMode) -> i32 {
    let mut browser = Browser::with_options(action.db(), config.open_options());
    if let Err(e) = browser.open() {
        eprintln!("{}", format_error(&e, mode));
        return 1;
    }

    let code = match execute(&browser, &action, mode) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", format_error(&e, mode));
            1
        }
    };

    if let Err(e) = browser.close() {
        eprintln!("{}", format_error(&e, mode));
        return 1;
    }
    code
}

/// Run `action` on an open browser. Errors not yet reported are returned.
fn execute(browser: &Browser, action: &CliAction, mode: OutputMode) -> Result<i32, BrowseError> {
    match action {
        CliAction::ListTables { db } => {
            let tables = browser.list_tables()?;
            println!("{}", format_tables(db, &tables, mode));
        }
        CliAction::Info { table, .. } => {
            let info = browser.table_info(table)?;
            println!("{}", format_table_info(&info, mode));
            if mode == OutputMode::Human {
                if let Some(warning) = format_count_warning(&info) {
                    eprintln!("{}", warning);
                }
            }
        }
        CliAction::Export {
            table,
            output,
            format,
            limit,
            ..
        } => {
            let tables = browser.list_tables()?;
            if !tables.iter().any(|t| t == table) {
                let err = BrowseError::NoSuchTable(table.clone());
                eprintln!("{}", format_missing_table(&err, &tables, mode));
                return Ok(1);
            }
            let count = browser.export(table, output, *format, *limit)?;
            println!("{}", format_export(table, count, output, mode));
        }
        CliAction::ExportAll {
            output_dir,
            format,
            limit,
            ..
        } => {
            let report = browser.export_all(output_dir, *format, *limit)?;
            if mode == OutputMode::Human {
                for line in format_batch_failures(&report) {
                    eprintln!("{}", line);
                }
            }
            println!("{}", format_batch_report(&report, output_dir, mode));
        }
    }
    Ok(0)
}
