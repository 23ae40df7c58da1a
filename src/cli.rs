use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::{
    DEFAULT_DEFECT_RATE, DEFAULT_MAX_DELAY_MS, DEFAULT_MIN_DELAY_MS, InspectionSettings,
};

#[derive(Parser)]
#[command(name = "loganalyzer")]
#[command(about = "A CLI tool for analyzing log files", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v for info, -vv for debug). RUST_LOG overrides it.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze log files based on configuration
    #[command(
        long_about = "Analyze multiple log files concurrently based on a JSON configuration file.\n\
                      Each log file is inspected by its own worker and the results are gathered into \
                      a single report. Supports filtering by status and timestamped output files."
    )]
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Path to configuration JSON file
    #[arg(short, long)]
    pub config: PathBuf,

    /// Path to output JSON file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Filter results by status (OK or FAILED)
    #[arg(long)]
    pub status: Option<String>,

    /// Add a YYMMDD timestamp to the output filename
    #[arg(long)]
    pub timestamp: bool,

    /// With --timestamp, place the output file in a directory named after the year
    #[arg(long, requires = "timestamp")]
    pub by_year: bool,

    /// Maximum number of logs inspected at the same time (unbounded by default)
    #[arg(long)]
    pub max_concurrency: Option<NonZeroUsize>,

    /// Shortest simulated inspection time in milliseconds
    #[arg(long, default_value_t = DEFAULT_MIN_DELAY_MS)]
    pub min_delay_ms: u64,

    /// Longest simulated inspection time in milliseconds
    #[arg(long, default_value_t = DEFAULT_MAX_DELAY_MS)]
    pub max_delay_ms: u64,

    /// Probability (0 to 1) that an accessible log reports a parsing error
    #[arg(long, default_value_t = DEFAULT_DEFECT_RATE)]
    pub defect_rate: f64,

    /// Seed for the simulated delays and parsing errors, for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop inspecting after this many seconds and report what finished
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AnalyzeArgs {
    pub fn settings(&self) -> InspectionSettings {
        InspectionSettings {
            min_delay: Duration::from_millis(self.min_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            defect_rate: self.defect_rate,
            seed: self.seed,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    fn parse(args: &[&str]) -> AnalyzeArgs {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Analyze(args) => args,
        }
    }

    #[rstest]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[rstest]
    fn analyze_defaults() {
        let args = parse(&["loganalyzer", "analyze", "-c", "logs.json"]);
        assert_eq!(args.config, PathBuf::from("logs.json"));
        assert_eq!(args.output, None);
        assert!(!args.timestamp);
        assert_eq!(args.max_concurrency, None);
        assert_eq!(args.settings(), InspectionSettings::default());
        assert_eq!(args.timeout(), None);
    }

    #[rstest]
    fn analyze_all_flags() {
        let args = parse(&[
            "loganalyzer",
            "-vv",
            "analyze",
            "--config",
            "logs.json",
            "--output",
            "reports/out.json",
            "--status",
            "FAILED",
            "--timestamp",
            "--by-year",
            "--max-concurrency",
            "4",
            "--min-delay-ms",
            "0",
            "--max-delay-ms",
            "5",
            "--defect-rate",
            "0",
            "--seed",
            "9",
            "--timeout",
            "30",
            "--json",
        ]);
        assert_eq!(args.output, Some(PathBuf::from("reports/out.json")));
        assert_eq!(args.status.as_deref(), Some("FAILED"));
        assert!(args.timestamp && args.by_year && args.json);
        assert_eq!(args.max_concurrency, NonZeroUsize::new(4));
        assert_eq!(args.settings().max_delay, Duration::from_millis(5));
        assert_eq!(args.settings().seed, Some(9));
        assert_eq!(args.timeout(), Some(Duration::from_secs(30)));
    }

    #[rstest]
    #[case::missing_config(&["loganalyzer", "analyze"])]
    #[case::zero_concurrency(&["loganalyzer", "analyze", "-c", "x.json", "--max-concurrency", "0"])]
    #[case::by_year_without_timestamp(&["loganalyzer", "analyze", "-c", "x.json", "--by-year"])]
    fn invalid_invocations_are_rejected(#[case] args: &[&str]) {
        assert!(Cli::try_parse_from(args).is_err());
    }
}
