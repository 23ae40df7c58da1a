use thiserror::Error;

use crate::models::{ErrorKind, Outcome};

pub const FORMAT_DEFECT_DETAIL: &str = "malformed line format";

/// Why a descriptor's path could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessCause {
    #[error("not found")]
    NotFound,
    #[error("inaccessible ({reason})")]
    Inaccessible { reason: String },
}

/// Failure of a single inspection. Never escapes a unit of work: the
/// inspector folds it into a failed `Outcome`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("file {cause}: {path}")]
    Access { path: String, cause: AccessCause },

    #[error("parsing error for log {log_id}: {detail}")]
    Format { log_id: String, detail: String },

    #[error("inspection of log {log_id} aborted: {reason}")]
    Aborted { log_id: String, reason: String },
}

impl AnalysisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::Access { .. } => ErrorKind::Access,
            AnalysisError::Format { .. } => ErrorKind::Format,
            AnalysisError::Aborted { .. } => ErrorKind::Aborted,
        }
    }

    /// Short human-readable message used as `Outcome::message`.
    pub fn summary(&self) -> &'static str {
        match self {
            AnalysisError::Access {
                cause: AccessCause::NotFound,
                ..
            } => "File not found.",
            AnalysisError::Access {
                cause: AccessCause::Inaccessible { .. },
                ..
            } => "File inaccessible.",
            AnalysisError::Format { .. } => "Parsing error.",
            AnalysisError::Aborted { .. } => "Inspection aborted.",
        }
    }
}

/// Returned when a run is cancelled before every unit finished.
#[derive(Debug, Error)]
#[error("analysis cancelled with {outstanding} log(s) not inspected")]
pub struct Cancelled {
    /// Outcomes of the units that finished before cancellation, in
    /// completion order.
    pub completed: Vec<Outcome>,
    pub outstanding: usize,
}
