//! Terminal output
//!
//! Listings go to stdout as a table or JSON; toasts and errors go to stderr
//! so a piped `--format json` stays parseable.

use clap::ValueEnum;
use colored::Colorize;
use proposicoes_core::Toast;
use serde::Serialize;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned table
    #[default]
    Table,
    /// Pretty-printed JSON array
    Json,
}

/// Print rows; `empty` replaces the table when there are none
///
/// JSON output always prints the array, empty or not.
pub fn print_output<T>(rows: &[T], format: OutputFormat, empty: &str) -> anyhow::Result<()>
where
    T: Serialize + Tabled,
{
    match format {
        OutputFormat::Table if rows.is_empty() => println!("{}", empty),
        OutputFormat::Table => println!("{}", Table::new(rows)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rows)?),
    }
    Ok(())
}

pub fn print_success(message: &str, quiet: bool) {
    if !quiet {
        println!("{}", message.green());
    }
}

pub fn print_error(message: &str) {
    eprintln!("{}", message.red());
}

/// Progress chatter, silenced by `--quiet`
pub fn print_info(message: &str, quiet: bool) {
    if !quiet {
        println!("{}", message);
    }
}

/// Single stderr line for a toast
pub fn toast_line(toast: &Toast) -> String {
    format!("[!] {}", toast.message)
}

/// Toasts report failures, so `--quiet` does not hide them
pub fn print_toast(toast: &Toast) {
    print_error(&toast_line(toast));
}
