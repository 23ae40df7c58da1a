use serde::{Deserialize, Serialize};

/// One log file to inspect, as listed in the descriptor file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogDescriptor {
    id: String,
    path: String,
    #[serde(rename = "type", default)]
    kind: String,
}

impl LogDescriptor {
    pub fn new(id: impl Into<String>, path: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            kind: kind.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Advisory only; nothing branches on it.
    pub fn kind(&self) -> &str {
        &self.kind
    }
}
