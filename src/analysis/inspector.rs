use std::future::Future;
use std::io;
use std::path::Path;

use tokio::fs;
use tracing::debug;

use super::error::{AccessCause, AnalysisError, FORMAT_DEFECT_DETAIL};
use super::jitter::{DefectInjector, DelayPolicy, RandomDefects, UniformDelay, duration_millis};
use crate::config::InspectionSettings;
use crate::models::{LogDescriptor, Outcome};

/// Turns one descriptor into exactly one outcome.
///
/// Implementations must not fail: every problem is reported through a
/// failed [`Outcome`].
pub trait Inspect: Send + Sync + 'static {
    fn inspect(&self, descriptor: &LogDescriptor) -> impl Future<Output = Outcome> + Send;
}

/// Checks that the log is readable, then simulates the analysis with a
/// delay and a chance of reporting a format defect.
pub struct Inspector {
    delay: Box<dyn DelayPolicy>,
    defects: Box<dyn DefectInjector>,
}

impl Inspector {
    pub fn new(delay: impl DelayPolicy + 'static, defects: impl DefectInjector + 'static) -> Self {
        Self {
            delay: Box::new(delay),
            defects: Box::new(defects),
        }
    }

    /// Builds the random delay and defect sources from settings. A seed
    /// makes both sequences reproducible.
    pub fn from_settings(settings: &InspectionSettings) -> Self {
        let delay = UniformDelay::new(settings.min_delay, settings.max_delay, settings.seed);
        let defects = RandomDefects::new(
            settings.defect_rate,
            settings.seed.map(|seed| seed.wrapping_add(1)),
        );
        Self::new(delay, defects)
    }

    async fn analyze(&self, descriptor: &LogDescriptor) -> Result<(), AnalysisError> {
        check_access(Path::new(descriptor.path()))
            .await
            .map_err(|cause| AnalysisError::Access {
                path: descriptor.path().to_owned(),
                cause,
            })?;

        let delay = self.delay.next_delay();
        debug!(
            log_id = descriptor.id(),
            delay_ms = duration_millis(delay),
            "simulating analysis"
        );
        tokio::time::sleep(delay).await;

        if self.defects.inject() {
            return Err(AnalysisError::Format {
                log_id: descriptor.id().to_owned(),
                detail: FORMAT_DEFECT_DETAIL.to_owned(),
            });
        }
        Ok(())
    }
}

impl Inspect for Inspector {
    async fn inspect(&self, descriptor: &LogDescriptor) -> Outcome {
        match self.analyze(descriptor).await {
            Ok(()) => Outcome::success(descriptor),
            Err(error) => {
                debug!(log_id = descriptor.id(), %error, "inspection failed");
                Outcome::failure(descriptor, &error)
            }
        }
    }
}

async fn check_access(path: &Path) -> Result<(), AccessCause> {
    let metadata = match fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Err(AccessCause::NotFound),
        Err(err) => {
            return Err(AccessCause::Inaccessible {
                reason: err.to_string(),
            });
        }
    };

    if metadata.is_dir() {
        return Err(AccessCause::Inaccessible {
            reason: "is a directory".to_owned(),
        });
    }
    // Opening a FIFO or device for reading can block indefinitely.
    if !metadata.is_file() {
        return Err(AccessCause::Inaccessible {
            reason: "not a regular file".to_owned(),
        });
    }

    fs::File::open(path)
        .await
        .map(drop)
        .map_err(|err| AccessCause::Inaccessible {
            reason: err.to_string(),
        })
}
