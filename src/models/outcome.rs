use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString, IntoStaticStr};

use super::LogDescriptor;
use crate::analysis::AnalysisError;

pub const SUCCESS_MESSAGE: &str = "Analysis completed successfully.";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    EnumString,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Status {
    #[serde(rename = "OK")]
    #[strum(to_string = "OK", serialize = "success")]
    Success,
    #[serde(rename = "FAILED")]
    #[strum(to_string = "FAILED", serialize = "failure")]
    Failure,
}

impl Status {
    /// The wire value, `OK` or `FAILED`.
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Which kind of `AnalysisError` produced a failed outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Access,
    Format,
    Aborted,
}

/// The result of inspecting one descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    log_id: String,
    file_path: String,
    status: Status,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_kind: Option<ErrorKind>,
}

impl Outcome {
    pub fn success(descriptor: &LogDescriptor) -> Self {
        Self {
            log_id: descriptor.id().to_owned(),
            file_path: descriptor.path().to_owned(),
            status: Status::Success,
            message: SUCCESS_MESSAGE.to_owned(),
            error_details: None,
            error_kind: None,
        }
    }

    pub fn failure(descriptor: &LogDescriptor, error: &AnalysisError) -> Self {
        Self {
            log_id: descriptor.id().to_owned(),
            file_path: descriptor.path().to_owned(),
            status: Status::Failure,
            message: error.summary().to_owned(),
            error_details: Some(error.to_string()),
            error_kind: Some(error.kind()),
        }
    }

    pub fn log_id(&self) -> &str {
        &self.log_id
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn error_details(&self) -> Option<&str> {
        self.error_details.as_deref()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error_kind
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AccessCause;
    use rstest::rstest;
    use std::str::FromStr;

    fn descriptor() -> LogDescriptor {
        LogDescriptor::new("api", "/var/log/api.log", "app")
    }

    // Status parsing backs the --status filter, so it accepts the wire
    // values in any case as well as the long names.
    #[rstest]
    #[case::wire_ok("OK", Status::Success)]
    #[case::lower_ok("ok", Status::Success)]
    #[case::long_success("Success", Status::Success)]
    #[case::wire_failed("FAILED", Status::Failure)]
    #[case::lower_failed("failed", Status::Failure)]
    #[case::long_failure("failure", Status::Failure)]
    fn status_parses_case_insensitively(#[case] input: &str, #[case] expected: Status) {
        assert_eq!(Status::from_str(input).unwrap(), expected);
    }

    #[rstest]
    fn status_rejects_unknown_values() {
        assert!(Status::from_str("pending").is_err());
    }

    #[rstest]
    fn status_displays_wire_value() {
        assert_eq!(Status::Success.as_ref(), "OK");
        assert_eq!(Status::Failure.as_str(), "FAILED");
    }

    // A successful outcome serializes without the failure-only fields.
    #[rstest]
    fn success_omits_error_fields() {
        let outcome = Outcome::success(&descriptor());
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["log_id"], "api");
        assert_eq!(json["file_path"], "/var/log/api.log");
        assert_eq!(json["status"], "OK");
        assert_eq!(json["message"], SUCCESS_MESSAGE);
        assert!(json.get("error_details").is_none());
        assert!(json.get("error_kind").is_none());
    }

    #[rstest]
    fn failure_carries_error_detail_and_kind() {
        let error = AnalysisError::Access {
            path: "/var/log/api.log".into(),
            cause: AccessCause::NotFound,
        };
        let outcome = Outcome::failure(&descriptor(), &error);
        assert_eq!(outcome.status(), Status::Failure);
        assert_eq!(outcome.message(), "File not found.");
        assert_eq!(
            outcome.error_details(),
            Some("file not found: /var/log/api.log")
        );
        assert_eq!(outcome.error_kind(), Some(ErrorKind::Access));

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "FAILED");
        assert_eq!(json["error_kind"], "access");
    }
}
