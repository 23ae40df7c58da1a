use anyhow::Result;
use console::{Term, style};
use serde::Serialize;

use crate::commands::analyze::RunReport;
use crate::models::{Outcome, Status};

pub struct Output {
    term: Term,
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self {
            term: Term::stdout(),
            json,
        }
    }

    fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let output = serde_json::to_string_pretty(value)?;
        self.term.write_line(&output)?;
        Ok(())
    }

    pub fn no_descriptors(&self) -> Result<()> {
        if self.json {
            return self.print_json(&RunReport::default());
        }
        self.term.write_line("No log configurations found")?;
        Ok(())
    }

    pub fn analysis_started(&self, count: usize) -> Result<()> {
        if self.json {
            return Ok(());
        }
        self.term.write_line(&format!(
            "Starting analysis of {} log files...",
            style(count).cyan().bold()
        ))?;
        Ok(())
    }

    pub fn report(&self, report: &RunReport) -> Result<()> {
        if self.json {
            return self.print_json(report);
        }

        self.results(&report.outcomes)?;

        if let Some(path) = &report.exported_to {
            self.term.write_line("")?;
            self.term.write_line(&format!(
                "{} {}",
                style("Results exported to:").green(),
                style(path).cyan()
            ))?;
        }

        self.summary(report)
    }

    fn results(&self, outcomes: &[Outcome]) -> Result<()> {
        self.term.write_line("")?;
        self.term
            .write_line(&style("=== Log Analysis Results ===").bold().to_string())?;
        for outcome in outcomes {
            self.term
                .write_line(&format!("ID: {}", style(outcome.log_id()).cyan().bold()))?;
            self.term
                .write_line(&format!("Path: {}", outcome.file_path()))?;
            self.term
                .write_line(&format!("Status: {}", styled_status(outcome.status())))?;
            self.term
                .write_line(&format!("Message: {}", outcome.message()))?;
            if let Some(detail) = outcome.error_details() {
                self.term
                    .write_line(&format!("Error: {}", style(detail).red()))?;
            }
            self.term.write_line("---")?;
        }
        Ok(())
    }

    fn summary(&self, report: &RunReport) -> Result<()> {
        let summary = &report.summary;

        self.term.write_line("")?;
        self.term
            .write_line(&style("=== Summary ===").bold().to_string())?;
        self.term
            .write_line(&format!("Total logs analyzed: {}", summary.total))?;
        self.term.write_line(&format!(
            "Successful: {}",
            style(summary.successful).green()
        ))?;
        self.term
            .write_line(&format!("Failed: {}", style(summary.failed).red()))?;
        if report.outstanding > 0 {
            self.term.write_line(&format!(
                "Not inspected (cancelled): {}",
                style(report.outstanding).yellow()
            ))?;
        }

        if !summary.failures.is_empty() {
            self.term.write_line("")?;
            self.term.write_line("Failed logs breakdown:")?;
            for failure in &summary.failures {
                self.term.write_line(&format!(
                    "- {}: {}",
                    style(&failure.log_id).cyan(),
                    failure.message
                ))?;
            }
        }
        Ok(())
    }
}

fn styled_status(status: Status) -> String {
    match status {
        Status::Success => style(status.as_str()).green().to_string(),
        Status::Failure => style(status.as_str()).red().to_string(),
    }
}
