//! Clap command tree definition.

use clap::{value_parser, Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("wtbrowse")
        .about("Browse and export tables from a storage engine backup directory")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output mode")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Config file (default: ./wtbrowse.toml if present)")
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Debug logging on stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(build_list_tables())
        .subcommand(build_info())
        .subcommand(build_export())
        .subcommand(build_export_all())
}

fn db_path_arg() -> Arg {
    Arg::new("db_path")
        .required(true)
        .help("Path to the database directory")
}

fn format_arg(help: &'static str) -> Arg {
    Arg::new("format")
        .short('f')
        .long("format")
        .value_parser(["json", "csv"])
        .help(help)
}

fn limit_arg(help: &'static str) -> Arg {
    Arg::new("limit")
        .short('l')
        .long("limit")
        .value_parser(value_parser!(u64))
        .help(help)
}

// =========================================================================
// Catalog
// =========================================================================

fn build_list_tables() -> Command {
    Command::new("list-tables")
        .about("List all tables in a database")
        .arg(db_path_arg())
}

fn build_info() -> Command {
    Command::new("info")
        .about("Display information about a specific table")
        .arg(db_path_arg())
        .arg(Arg::new("table").required(true).help("Table to inspect"))
}

// =========================================================================
// Export
// =========================================================================

fn build_export() -> Command {
    Command::new("export")
        .about("Export a table to JSON or CSV")
        .arg(db_path_arg())
        .arg(Arg::new("table").required(true).help("Table to export"))
        .arg(
            Arg::new("output_file")
                .required(true)
                .help("Path to the output file"),
        )
        .arg(format_arg("Output format (default: json)"))
        .arg(limit_arg("Limit number of records to export"))
}

fn build_export_all() -> Command {
    Command::new("export-all")
        .about("Export all tables into a directory")
        .arg(db_path_arg())
        .arg(
            Arg::new("output_dir")
                .required(true)
                .help("Directory for the exported files"),
        )
        .arg(format_arg("Output format (default: json)"))
        .arg(limit_arg("Limit number of records per table"))
}
