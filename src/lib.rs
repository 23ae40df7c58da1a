#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]

pub mod analysis;
pub mod cli;
pub mod commands;
pub mod config;
pub mod helpers;
pub mod id;
pub mod models;
pub mod output;
pub mod report;

use anyhow::{Context, Result, bail};
use jiff::Zoned;
use tracing::{Instrument, info, info_span};

use cli::{AnalyzeArgs, Cli, Commands};
use commands::analyze;
use output::Output;

async fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let output = Output::new(args.json);

    let descriptors = config::load_descriptors(&args.config)?;
    let status_filter = args
        .status
        .as_deref()
        .map(analyze::parse_status_filter)
        .transpose()?;
    let settings = args.settings();
    settings.validate()?;
    let export_path = analyze::output_path(&args, Zoned::now().date())?;

    if descriptors.is_empty() {
        return output.no_descriptors();
    }

    info!(count = descriptors.len(), config = %args.config.display(), "loaded log descriptors");
    output.analysis_started(descriptors.len())?;

    let analysis =
        analyze::execute(descriptors, &settings, args.max_concurrency, args.timeout()).await;
    let _interrupt_guard = analyze::exit_on_interrupt();
    let mut run_report = analyze::build_report(analysis, status_filter);

    // A failed export is reported only after the results are printed.
    let exported = match export_path {
        Some(path) => {
            let result = report::export_outcomes(&run_report.outcomes, &path)
                .context("Error exporting results");
            if result.is_ok() {
                info!(path = %path.display(), "exported results");
                run_report.exported_to = Some(path.display().to_string());
            }
            result
        }
        None => Ok(()),
    };

    output.report(&run_report)?;
    exported?;

    if run_report.outstanding > 0 {
        bail!(
            "Analysis cancelled: {} log(s) were not inspected",
            run_report.outstanding
        );
    }
    Ok(())
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze(args) => {
            let span = info_span!("analyze", run_id = %id::generate_run_id());
            run_analyze(args).instrument(span).await
        }
    }
}
