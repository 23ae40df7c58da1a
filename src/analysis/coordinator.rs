use std::num::NonZeroUsize;
use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

use super::error::{AnalysisError, Cancelled};
use super::inspector::Inspect;
use crate::models::{LogDescriptor, Outcome};

/// Fans descriptors out to concurrent units of work and collects one
/// outcome per descriptor, in completion order.
pub struct Coordinator<I> {
    inspector: Arc<I>,
    max_in_flight: Option<NonZeroUsize>,
}

/// What a unit of work reports back: the descriptor's position and its
/// outcome, or `None` when it stopped on cancellation.
type UnitReport = (usize, Option<Outcome>);

struct Dispatch {
    outcomes: Vec<Outcome>,
    outstanding: usize,
}

impl<I: Inspect> Coordinator<I> {
    /// Every descriptor gets its own unit immediately; there is no cap.
    pub fn new(inspector: I) -> Self {
        Self {
            inspector: Arc::new(inspector),
            max_in_flight: None,
        }
    }

    /// Caps how many units run at once. Remaining descriptors are admitted
    /// as running units finish.
    pub fn with_max_in_flight(mut self, limit: NonZeroUsize) -> Self {
        self.max_in_flight = Some(limit);
        self
    }

    pub fn inspector(&self) -> &I {
        &self.inspector
    }

    /// Inspects every descriptor and returns once all units are done.
    pub async fn analyze_all(&self, descriptors: Vec<LogDescriptor>) -> Vec<Outcome> {
        self.dispatch(descriptors, CancellationToken::new())
            .await
            .outcomes
    }

    /// Like [`analyze_all`](Self::analyze_all), but stops early when `token`
    /// is cancelled. Running units are dropped at their next suspension
    /// point and queued descriptors are never started; the outcomes that
    /// did complete come back inside the error.
    pub async fn analyze_with_cancellation(
        &self,
        descriptors: Vec<LogDescriptor>,
        token: &CancellationToken,
    ) -> Result<Vec<Outcome>, Cancelled> {
        let dispatch = self.dispatch(descriptors, token.clone()).await;
        if dispatch.outstanding == 0 {
            Ok(dispatch.outcomes)
        } else {
            Err(Cancelled {
                completed: dispatch.outcomes,
                outstanding: dispatch.outstanding,
            })
        }
    }

    #[instrument(skip_all, fields(descriptors = descriptors.len()))]
    async fn dispatch(
        &self,
        descriptors: Vec<LogDescriptor>,
        token: CancellationToken,
    ) -> Dispatch {
        let total = descriptors.len();
        let limit = self.max_in_flight.map_or(usize::MAX, NonZeroUsize::get);
        info!(limit = self.max_in_flight.map(NonZeroUsize::get), "dispatching units");

        let mut units: JoinSet<UnitReport> = JoinSet::new();
        let mut queue = descriptors.iter().enumerate();
        let mut admitted = 0;
        let mut settled = vec![false; total];
        let mut cancelled_units = 0;
        let mut outcomes = Vec::with_capacity(total);

        loop {
            while units.len() < limit && !token.is_cancelled() {
                let Some((index, descriptor)) = queue.next() else {
                    break;
                };
                self.spawn_unit(&mut units, index, descriptor.clone(), token.clone());
                admitted += 1;
            }

            let Some(joined) = units.join_next().await else {
                break;
            };
            match joined {
                Ok((index, Some(outcome))) => {
                    settled[index] = true;
                    debug!(
                        log_id = outcome.log_id(),
                        status = outcome.status().as_str(),
                        "unit finished"
                    );
                    outcomes.push(outcome);
                }
                Ok((index, None)) => {
                    settled[index] = true;
                    cancelled_units += 1;
                }
                Err(err) => error!(%err, "unit terminated without reporting"),
            }
        }

        // Units are admitted in input order, so 0..admitted were all spawned;
        // any of those that never reported must have panicked.
        for (index, descriptor) in descriptors.iter().enumerate().take(admitted) {
            if !settled[index] {
                let error = AnalysisError::Aborted {
                    log_id: descriptor.id().to_owned(),
                    reason: "worker task panicked".to_owned(),
                };
                outcomes.push(Outcome::failure(descriptor, &error));
            }
        }

        let outstanding = cancelled_units + (total - admitted);
        info!(completed = outcomes.len(), outstanding, "dispatch finished");
        Dispatch {
            outcomes,
            outstanding,
        }
    }

    fn spawn_unit(
        &self,
        units: &mut JoinSet<UnitReport>,
        index: usize,
        descriptor: LogDescriptor,
        token: CancellationToken,
    ) {
        let inspector = Arc::clone(&self.inspector);
        units.spawn(async move {
            let outcome = tokio::select! {
                () = token.cancelled() => None,
                outcome = inspector.inspect(&descriptor) => Some(outcome),
            };
            (index, outcome)
        });
    }
}
