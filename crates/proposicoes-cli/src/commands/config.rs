//! Config commands
//!
//! Commands for inspecting CLI configuration.

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{print_error, print_info, print_output};
use super::Context;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
}

/// Config row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

pub async fn execute(ctx: &Context, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => show_config(ctx),
        ConfigAction::Get { key } => get_config(ctx, key),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    print_output(&config_rows(ctx), ctx.format, "No configuration entries.")
}

fn get_config(ctx: &Context, key: String) -> Result<()> {
    let rows = config_rows(ctx);

    if let Some(row) = rows.iter().find(|r| r.key.eq_ignore_ascii_case(&key)) {
        print_info(&format!("{} = {}", row.key, row.value), ctx.quiet);
        Ok(())
    } else {
        print_error(&format!("Config key not found: {}", key));
        let keys: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();
        print_info(&format!("Available keys: {}", keys.join(", ")), ctx.quiet);
        anyhow::bail!("unknown config key '{}'", key)
    }
}

fn config_rows(ctx: &Context) -> Vec<ConfigRow> {
    ctx.config
        .entries()
        .into_iter()
        .map(|(key, value, source)| ConfigRow {
            key: key.to_string(),
            value,
            source: source.to_string(),
        })
        .collect()
}
