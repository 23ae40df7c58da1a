mod descriptor;
mod outcome;

pub use descriptor::LogDescriptor;
pub use outcome::{ErrorKind, Outcome, SUCCESS_MESSAGE, Status};
