//! Export command
//!
//! Drives the filter form: load reference lists, fill in the fields from the
//! command line, submit, and report the outcome.

use anyhow::Result;
use clap::Args;
use proposicoes_core::models::parse_calendar_date;
use proposicoes_core::{DownloadTrigger, ExportClient, FilterForm};

use crate::output::{print_error, print_info, print_success, print_toast};
use super::Context;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Municipality id (see `proposicoes municipalities`)
    #[arg(short, long = "municipio", visible_alias = "municipality", default_value_t = proposicoes_core::services::DEFAULT_MUNICIPALITY_ID)]
    pub municipality: i64,

    /// Category / species id (see `proposicoes species`)
    #[arg(short, long = "tipo", visible_alias = "category", default_value = proposicoes_core::services::DEFAULT_CATEGORY)]
    pub category: String,

    /// Start date (YYYY-MM-DD or DD/MM/YYYY), defaults to today
    #[arg(short, long = "inicio", visible_alias = "start", default_value = "today")]
    pub start: String,

    /// End date (YYYY-MM-DD or DD/MM/YYYY), defaults to today
    #[arg(short, long = "fim", visible_alias = "end", default_value = "today")]
    pub end: String,

    /// Directory to save proposicoes.xlsx into (or set PROPOSICOES_OUTPUT_DIR)
    #[arg(short, long)]
    pub output_dir: Option<String>,
}

pub async fn execute(ctx: &Context, args: ExportArgs) -> Result<()> {
    let start = parse_calendar_date(&args.start)?;
    let end = parse_calendar_date(&args.end)?;

    let config = match &args.output_dir {
        Some(dir) => ctx.config.clone().with_output_dir(dir),
        None => ctx.config.clone(),
    };

    let api = ctx.api()?;
    let exporter = ExportClient::new(api.clone(), DownloadTrigger::new(&config.output_dir));

    let mut form = FilterForm::new();
    print_info("Loading reference lists...", ctx.quiet);
    form.load_references(&*api).await;
    flush_toasts(&mut form);

    form.set_municipality(Some(args.municipality))?;
    form.set_category(Some(args.category))?;
    form.set_start_date(Some(start))?;
    form.set_end_date(Some(end))?;

    if !form.submit_enabled() {
        for error in form.field_errors() {
            print_error(&error.to_string());
        }
        anyhow::bail!("Invalid export parameters");
    }

    if !form.municipalities().is_empty() && form.selected_municipality_name().is_none() {
        log::warn!(
            "Municipality {} is not in the reference list",
            args.municipality
        );
    }
    print_info(
        &format!(
            "Exporting {} / {} from {} to {}",
            form.selected_municipality_name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("municipality {}", args.municipality)),
            form.selected_species_name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("category {}", form.values().category.as_deref().unwrap_or("-"))),
            start,
            end
        ),
        ctx.quiet,
    );

    let outcome = form.submit(&exporter).await;
    flush_toasts(&mut form);

    match outcome {
        Ok(bytes) => {
            print_success(
                &format!(
                    "Saved {} bytes to {}",
                    bytes.len(),
                    exporter.target_path().display()
                ),
                ctx.quiet,
            );
            Ok(())
        }
        // The toast already carried the message
        Err(_) => anyhow::bail!("Export did not complete"),
    }
}

fn flush_toasts(form: &mut FilterForm) {
    for toast in form.drain_toasts() {
        print_toast(&toast);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: ExportArgs,
    }

    #[test]
    fn test_defaults_match_form_defaults() {
        let cli = TestCli::parse_from(["test"]);
        assert_eq!(cli.args.municipality, 9);
        assert_eq!(cli.args.category, "0");
        assert_eq!(cli.args.start, "today");
        assert_eq!(cli.args.end, "today");
        assert!(cli.args.output_dir.is_none());
    }

    #[test]
    fn test_portuguese_and_english_flags() {
        let cli = TestCli::parse_from([
            "test",
            "--municipio",
            "12",
            "--category",
            "2",
            "--inicio",
            "01/01/2024",
            "--end",
            "2024-01-31",
        ]);
        assert_eq!(cli.args.municipality, 12);
        assert_eq!(cli.args.category, "2");
        assert_eq!(cli.args.start, "01/01/2024");
        assert_eq!(cli.args.end, "2024-01-31");
    }
}
