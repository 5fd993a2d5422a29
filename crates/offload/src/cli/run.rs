use super::console::ConsoleReporter;
use super::Cli;
use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use console::style;
use offload_lib::util::{format_bytes, format_duration};
use offload_lib::{Config, Pipeline, RunSummary};

pub fn handle_run_command(cli: &Cli) -> Result<RunSummary> {
    let config = Config::load(cli.config.clone()).context("Failed to load configuration")?;
    let config = cli.apply(config);
    config.validate()?;

    log::info!(
        "Offloading {} -> {} (retention {} days, {}, on error: {})",
        cli.source.display(),
        cli.destination.display(),
        config.retention_days,
        config.algorithm,
        config.on_error.as_str()
    );

    if config.dry_run && !cli.quiet {
        println!("{}", style("DRY RUN: nothing will be copied or removed").yellow());
    }

    let mut reporter = ConsoleReporter::new(cli.quiet);
    let summary = Pipeline::new(config).run(&cli.source, &cli.destination, &mut reporter)?;
    reporter.finish_active();

    print_summary(&summary);
    println!("{}", style("============ Done ============").green());

    Ok(summary)
}

fn print_summary(summary: &RunSummary) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("Files").fg(Color::Cyan),
        Cell::new("Count").fg(Color::Cyan),
        Cell::new("Size").fg(Color::Cyan),
    ]);

    let (copied_label, pruned_label) = if summary.dry_run {
        ("To copy", "To remove")
    } else {
        ("Copied", "Removed")
    };

    table.add_row(vec![
        Cell::new("Found"),
        Cell::new(summary.files_found),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new(copied_label),
        Cell::new(summary.files_copied),
        Cell::new(format_bytes(summary.bytes_copied)),
    ]);
    table.add_row(vec![
        Cell::new("Verified"),
        Cell::new(summary.verified_ok).fg(Color::Green),
        Cell::new(""),
    ]);
    if summary.verified_mismatch > 0 {
        table.add_row(vec![
            Cell::new("Mismatched"),
            Cell::new(summary.verified_mismatch).fg(Color::Red),
            Cell::new(""),
        ]);
    }
    if summary.missing_destination > 0 {
        table.add_row(vec![
            Cell::new("Not copied"),
            Cell::new(summary.missing_destination).fg(Color::Yellow),
            Cell::new(""),
        ]);
    }
    table.add_row(vec![
        Cell::new(pruned_label),
        Cell::new(summary.pruned),
        Cell::new(format_bytes(summary.bytes_pruned)),
    ]);
    if summary.failed > 0 {
        table.add_row(vec![
            Cell::new("Failed"),
            Cell::new(summary.failed).fg(Color::Red),
            Cell::new(""),
        ]);
    }

    println!("{}", table);
    println!("Elapsed: {}", format_duration(summary.elapsed));
}
