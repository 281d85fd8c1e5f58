//! Subcommand implementations.

use std::io::Write;
use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::info;

use super::{Cli, Command};
use crate::catalog::{CatalogClient, CatalogSource};
use crate::config::{load_settings, PAGE_SIZE};
use crate::controller::CatalogController;
use crate::services::parse_select_count;
use crate::tui;
use crate::tui::table::{cells, COLUMNS};

/// Dispatch the parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(&cli.overrides()).await;

    match cli.command {
        None | Some(Command::Browse) => {
            cli.init_file_logging(&settings.log_path())?;
            info!("Browsing {}", settings.base_url);
            let source: Arc<dyn CatalogSource> = Arc::new(CatalogClient::new(&settings)?);
            tui::run(source).await
        }
        Some(Command::Page { page }) => {
            cli.init_logging();
            let client = CatalogClient::new(&settings)?;
            cmd_page(&client, page, &mut std::io::stdout().lock()).await
        }
        Some(Command::Select { ref count }) => {
            cli.init_logging();
            let client = CatalogClient::new(&settings)?;
            cmd_select(&client, count, &mut std::io::stdout().lock()).await
        }
    }
}

/// Print one page as tab-separated rows followed by the window summary.
pub async fn cmd_page(
    source: &dyn CatalogSource,
    page: u32,
    out: &mut impl Write,
) -> Result<()> {
    let mut controller = CatalogController::new(PAGE_SIZE);
    let ticket = match controller.go_to_page(page) {
        Some(ticket) => ticket,
        None => controller.reload(),
    };
    if !controller.load_page(source, ticket).await {
        bail!("page {} could not be loaded", page);
    }

    writeln!(out, "id\t{}", COLUMNS.join("\t"))?;
    for record in controller.data() {
        writeln!(out, "{}\t{}", record.id, cells(record).join("\t"))?;
    }

    let window = controller.window();
    writeln!(
        out,
        "-- page {} of {} ({} records total)",
        window.page,
        window.page_count(),
        window.total
    )?;
    Ok(())
}

/// Bulk-select the first N records and print the footer listing.
pub async fn cmd_select(
    source: &dyn CatalogSource,
    count: &str,
    out: &mut impl Write,
) -> Result<()> {
    let count = parse_select_count(count)?;

    let mut controller = CatalogController::new(PAGE_SIZE);
    let ticket = controller.reload();
    controller.load_page(source, ticket).await;

    let outcome = controller.select_first_n(source, count as i64).await?;

    let selection = controller.selection();
    writeln!(out, "Selected Rows ({})", selection.len())?;
    if selection.is_empty() {
        writeln!(out, "No rows selected yet.")?;
    }
    for record in selection.records() {
        writeln!(out, "{}\t{}", record.id, record.title())?;
    }
    if outcome.is_short() {
        writeln!(
            out,
            "-- {} of {} requested records available",
            outcome.records.len(),
            outcome.requested
        )?;
    }
    writeln!(out, "-- now showing page {}", controller.page())?;
    Ok(())
}
