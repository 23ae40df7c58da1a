use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::models::LogDescriptor;

pub const DEFAULT_MIN_DELAY_MS: u64 = 50;
pub const DEFAULT_MAX_DELAY_MS: u64 = 200;
pub const DEFAULT_DEFECT_RATE: f64 = 0.1;

/// Reads the JSON array of log descriptors at `path`.
pub fn load_descriptors(path: &Path) -> Result<Vec<LogDescriptor>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open config file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Tuning for the simulated inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct InspectionSettings {
    pub min_delay: Duration,
    pub max_delay: Duration,
    /// Probability in `[0, 1]` that an accessible log reports a format defect.
    pub defect_rate: f64,
    pub seed: Option<u64>,
}

impl Default for InspectionSettings {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(DEFAULT_MIN_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
            defect_rate: DEFAULT_DEFECT_RATE,
            seed: None,
        }
    }
}

impl InspectionSettings {
    pub fn validate(&self) -> Result<()> {
        if self.min_delay > self.max_delay {
            bail!(
                "Minimum delay ({}ms) exceeds maximum delay ({}ms)",
                self.min_delay.as_millis(),
                self.max_delay.as_millis()
            );
        }
        if !(0.0..=1.0).contains(&self.defect_rate) {
            bail!(
                "Defect rate must be between 0 and 1, got {}",
                self.defect_rate
            );
        }
        Ok(())
    }
}
