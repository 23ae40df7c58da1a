//! The concurrent analysis engine: an inspector that turns one log
//! descriptor into one outcome, and a coordinator that runs one inspection
//! per descriptor and gathers the results.

mod coordinator;
mod error;
mod inspector;
pub mod jitter;

pub use coordinator::Coordinator;
pub use error::{AccessCause, AnalysisError, Cancelled, FORMAT_DEFECT_DETAIL};
pub use inspector::{Inspect, Inspector};
