use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

use loganalyzer::cli::Cli;

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("loganalyzer={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = loganalyzer::run(cli).await {
        eprintln!("{} {err:#}", style("Error:").red().bold());
        std::process::exit(1);
    }
}
