//! Batch scheduler: runs a batch plan wave by wave against an icon client.
//! Owns concurrency, per-batch retry, inter-wave pacing, and progress; parsing and
//! transport stay in the client and provider.

use crate::error::{ClientError, ServiceClassification};
use crate::generation::client::{BatchContext, GeneratedIcons, IconClient};
use crate::generation::plan::{Batch, BatchPlan};
use crate::progress::{ProgressSink, ProgressTracker};
use crate::types::{IconRecord, PackMetadata};
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Configuration for the batch scheduler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Maximum batches in flight at once (also the wave size)
    pub concurrency: usize,
    /// Attempts per batch, including the first
    pub max_attempts: usize,
    /// Delay between attempts of the same batch
    pub retry_delay: Duration,
    /// Pause between waves to stay under the service's rate limit
    pub wave_delay: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            concurrency: 2,
            max_attempts: 3,
            retry_delay: Duration::from_millis(2000),
            wave_delay: Duration::from_millis(1000),
        }
    }
}

/// Result of one batch after it succeeded or ran out of attempts.
///
/// Empty `icons` means the batch delivered nothing; it is never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub batch_index: usize,
    pub icons: Vec<IconRecord>,
    pub metadata: Option<PackMetadata>,
    /// Classification of the final failed attempt, if the batch failed
    pub last_failure: Option<ServiceClassification>,
    pub attempts: usize,
}

impl BatchOutcome {
    fn succeeded(batch: Batch, generated: GeneratedIcons, attempts: usize) -> Self {
        let GeneratedIcons { metadata, mut icons } = generated;
        if icons.len() > batch.requested_count {
            debug!(
                batch_index = batch.index,
                requested = batch.requested_count,
                returned = icons.len(),
                "Dropping icons beyond the batch request"
            );
            icons.truncate(batch.requested_count);
        }
        Self {
            batch_index: batch.index,
            icons,
            metadata,
            last_failure: None,
            attempts,
        }
    }

    fn failed(batch: Batch, cause: ServiceClassification, attempts: usize) -> Self {
        Self {
            batch_index: batch.index,
            icons: Vec::new(),
            metadata: None,
            last_failure: Some(cause),
            attempts,
        }
    }

    fn skipped(batch: Batch) -> Self {
        Self {
            batch_index: batch.index,
            icons: Vec::new(),
            metadata: None,
            last_failure: None,
            attempts: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

/// Lifecycle of a single batch.
#[derive(Debug)]
enum BatchState {
    Planned,
    InFlight { attempt: usize },
    Retrying { attempt: usize, cause: ClientError },
    Settled(BatchOutcome),
}

/// Runs batch plans with a fixed concurrency ceiling.
pub struct BatchScheduler {
    config: SchedulerConfig,
    cancel: Option<CancellationToken>,
}

impl BatchScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    /// Stop starting new waves once `token` is cancelled.
    ///
    /// Calls already in flight are allowed to finish.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Run every batch in `plan` and return one outcome per batch, in plan order.
    pub async fn run<C: IconClient>(
        &self,
        client: &C,
        plan: &BatchPlan,
        progress: Option<&dyn ProgressSink>,
    ) -> Vec<BatchOutcome> {
        let concurrency = self.config.concurrency.max(1);
        let semaphore = Semaphore::new(concurrency);
        let total_batches = plan.batch_count();
        let mut tracker = ProgressTracker::new(plan.total, progress);
        let mut slots: Vec<Option<BatchOutcome>> = vec![None; total_batches];

        info!(
            theme = %plan.theme,
            total = plan.total,
            total_batches,
            concurrency,
            "Generation started"
        );

        for (wave_index, wave) in plan.waves(concurrency).enumerate() {
            if wave_index > 0 && !self.pace().await {
                break;
            }
            if self.is_cancelled() {
                break;
            }

            info!(
                wave_index,
                batches = ?wave.iter().map(|b| b.index).collect::<Vec<_>>(),
                "Wave started"
            );

            // slots are keyed by plan position, not by `Batch::index`
            let wave_start = wave_index * concurrency;
            let mut in_flight: FuturesUnordered<_> = wave
                .iter()
                .enumerate()
                .map(|(offset, batch)| {
                    self.run_batch(client, &plan.theme, *batch, total_batches, &semaphore)
                        .map(move |outcome| (wave_start + offset, outcome))
                })
                .collect();

            let mut delivered = 0usize;
            let mut failed = 0usize;
            while let Some((position, outcome)) = in_flight.next().await {
                delivered += outcome.icons.len();
                if outcome.last_failure.is_some() {
                    failed += 1;
                }
                slots[position] = Some(outcome);
            }

            let state = tracker.advance(delivered);
            info!(
                wave_index,
                delivered,
                failed,
                completed = state.completed,
                total = state.total,
                "Wave completed"
            );
        }

        let skipped = slots.iter().filter(|slot| slot.is_none()).count();
        if skipped > 0 {
            warn!(theme = %plan.theme, skipped, "Generation cancelled; remaining batches skipped");
        }

        plan.batches
            .iter()
            .zip(slots)
            .map(|(batch, slot)| slot.unwrap_or_else(|| BatchOutcome::skipped(*batch)))
            .collect()
    }

    /// Sleep between waves. Returns false if cancelled while waiting.
    async fn pace(&self) -> bool {
        match &self.cancel {
            Some(token) => {
                tokio::select! {
                    _ = token.cancelled() => false,
                    _ = sleep(self.config.wave_delay) => true,
                }
            }
            None => {
                sleep(self.config.wave_delay).await;
                true
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Drive one batch through its retry state machine.
    ///
    /// Failures are logged and collapsed into an empty outcome here; they never
    /// propagate past this point.
    async fn run_batch<C: IconClient>(
        &self,
        client: &C,
        theme: &str,
        batch: Batch,
        total_batches: usize,
        semaphore: &Semaphore,
    ) -> BatchOutcome {
        let context = BatchContext {
            batch_index: batch.index,
            total_batches,
        };
        let max_attempts = self.config.max_attempts.max(1);
        let mut state = BatchState::Planned;

        loop {
            state = match state {
                BatchState::Planned => BatchState::InFlight { attempt: 1 },
                BatchState::InFlight { attempt } => {
                    debug!(
                        batch_index = batch.index,
                        requested = batch.requested_count,
                        attempt,
                        "Batch request in flight"
                    );
                    let result = match semaphore.acquire().await {
                        Ok(_permit) => client.generate(theme, batch.requested_count, context).await,
                        Err(_) => Err(ClientError::service(
                            ServiceClassification::Unknown,
                            "Scheduler semaphore closed",
                        )),
                    };
                    // a reply with no icons spends an attempt like any other failure
                    let result = result.and_then(|generated| {
                        if generated.icons.is_empty() {
                            Err(ClientError::EmptyResponse)
                        } else {
                            Ok(generated)
                        }
                    });

                    match result {
                        Ok(generated) => {
                            BatchState::Settled(BatchOutcome::succeeded(batch, generated, attempt))
                        }
                        Err(cause) if attempt < max_attempts && cause.is_retryable() => {
                            warn!(
                                batch_index = batch.index,
                                attempt,
                                max_attempts,
                                error = %cause,
                                "Batch attempt failed, retrying"
                            );
                            BatchState::Retrying { attempt, cause }
                        }
                        Err(cause) => {
                            error!(
                                batch_index = batch.index,
                                attempts = attempt,
                                classification = %cause.classification(),
                                error = %cause,
                                "Batch failed permanently"
                            );
                            BatchState::Settled(BatchOutcome::failed(
                                batch,
                                cause.classification(),
                                attempt,
                            ))
                        }
                    }
                }
                BatchState::Retrying { attempt, cause } => {
                    debug!(
                        batch_index = batch.index,
                        next_attempt = attempt + 1,
                        delay_ms = self.config.retry_delay.as_millis(),
                        last_error = %cause,
                        "Batch backing off"
                    );
                    sleep(self.config.retry_delay).await;
                    BatchState::InFlight {
                        attempt: attempt + 1,
                    }
                }
                BatchState::Settled(outcome) => return outcome,
            };
        }
    }
}
