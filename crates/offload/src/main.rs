mod cli;

use clap::Parser;
use console::style;
use offload_lib::OffloadError;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    cli::init_logging(cli.verbose);
    if cli.no_color {
        console::set_colors_enabled(false);
    }

    match cli::run::handle_run_command(&cli) {
        Ok(summary) => {
            if summary.has_integrity_errors() {
                log::warn!("Run finished with integrity errors; affected source files were kept");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {:#}", style("Error").red(), e);
            // A missing source is reported, but still exits 0.
            if matches!(e.downcast_ref::<OffloadError>(), Some(OffloadError::SourceNotDirectory(_))) {
                return ExitCode::SUCCESS;
            }
            eprintln!("{}", style("ABORTING ...").red());
            ExitCode::FAILURE
        }
    }
}
