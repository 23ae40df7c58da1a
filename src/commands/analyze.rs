use std::future::Future;
use std::io;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Result, anyhow, bail};
use jiff::civil::Date;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{info, warn};

use crate::analysis::jitter::duration_millis;
use crate::analysis::{Coordinator, Inspector};
use crate::cli::AnalyzeArgs;
use crate::config::InspectionSettings;
use crate::helpers::find_similar;
use crate::models::{LogDescriptor, Outcome, Status};
use crate::report::{self, Summary};

/// Outcomes gathered by one run, plus how many descriptors were left
/// uninspected because the run was cancelled.
#[derive(Debug, Default)]
pub struct Analysis {
    pub outcomes: Vec<Outcome>,
    pub outstanding: usize,
}

/// Everything shown to the user once a run is over.
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    pub outcomes: Vec<Outcome>,
    pub summary: Summary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exported_to: Option<String>,
    pub outstanding: usize,
}

pub fn parse_status_filter(value: &str) -> Result<Status> {
    Status::from_str(value).map_err(|_| {
        let wire_values = [Status::Success.as_str(), Status::Failure.as_str()];
        match find_similar(value, &wire_values) {
            Some(suggestion) => anyhow!("Unknown status: {value}\nDid you mean: {suggestion}"),
            None => anyhow!("Unknown status: {value}\nExpected OK or FAILED"),
        }
    })
}

/// Inspects every descriptor concurrently. Ctrl-C or the optional timeout
/// stop the run early; whatever finished is still returned.
pub async fn execute(
    descriptors: Vec<LogDescriptor>,
    settings: &InspectionSettings,
    max_in_flight: Option<NonZeroUsize>,
    timeout: Option<Duration>,
) -> Analysis {
    let mut coordinator = Coordinator::new(Inspector::from_settings(settings));
    if let Some(limit) = max_in_flight {
        coordinator = coordinator.with_max_in_flight(limit);
    }

    let token = CancellationToken::new();
    let trigger = spawn_cancel_trigger(token.clone(), timeout);
    let result = coordinator
        .analyze_with_cancellation(descriptors, &token)
        .await;
    trigger.abort();

    match result {
        Ok(outcomes) => Analysis {
            outcomes,
            outstanding: 0,
        },
        Err(cancelled) => {
            warn!(outstanding = cancelled.outstanding, "{cancelled}");
            Analysis {
                outcomes: cancelled.completed,
                outstanding: cancelled.outstanding,
            }
        }
    }
}

fn spawn_cancel_trigger(token: CancellationToken, timeout: Option<Duration>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let interrupted = async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("interrupted, cancelling outstanding inspections"),
                Err(err) => {
                    warn!(%err, "unable to listen for Ctrl-C");
                    std::future::pending::<()>().await;
                }
            }
        };
        let deadline = async {
            match timeout {
                Some(limit) => {
                    tokio::time::sleep(limit).await;
                    info!(
                        timeout_ms = duration_millis(limit),
                        "timeout reached, cancelling outstanding inspections"
                    );
                }
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            () = interrupted => {}
            () = deadline => {}
        }
        token.cancel();
    })
}

/// Once inspection is over, Ctrl-C ends the process with status 130 rather
/// than being swallowed by the handler installed for cancellation. The
/// watch stops when the returned guard is dropped.
pub fn exit_on_interrupt() -> DropGuard {
    let token = CancellationToken::new();
    watch_interrupt(tokio::signal::ctrl_c(), token.clone(), || {
        std::process::exit(130)
    });
    token.drop_guard()
}

fn watch_interrupt<S, F>(signal: S, token: CancellationToken, on_interrupt: F) -> JoinHandle<()>
where
    S: Future<Output = io::Result<()>> + Send + 'static,
    F: FnOnce() + Send + 'static,
{
    tokio::spawn(async move {
        tokio::select! {
            result = signal => match result {
                Ok(()) => {
                    warn!("interrupted after analysis, exiting");
                    on_interrupt();
                }
                Err(err) => warn!(%err, "unable to listen for Ctrl-C"),
            },
            () = token.cancelled() => {}
        }
    })
}

/// Applies the status filter and puts outcomes in a stable order.
pub fn build_report(analysis: Analysis, status_filter: Option<Status>) -> RunReport {
    let mut outcomes = match status_filter {
        Some(status) => report::filter_by_status(analysis.outcomes, status),
        None => analysis.outcomes,
    };
    report::sort_outcomes(&mut outcomes);

    RunReport {
        summary: Summary::from_outcomes(&outcomes),
        outcomes,
        exported_to: None,
        outstanding: analysis.outstanding,
    }
}

/// Where the export goes, if anywhere, after timestamping.
pub fn output_path(args: &AnalyzeArgs, today: Date) -> Result<Option<PathBuf>> {
    let Some(base) = args.output.as_ref() else {
        return Ok(None);
    };
    if base.file_name().is_none() {
        bail!("Output path has no file name: {}", base.display());
    }
    if args.timestamp {
        Ok(Some(report::timestamped_path(base, today, args.by_year)))
    } else {
        Ok(Some(base.clone()))
    }
}
