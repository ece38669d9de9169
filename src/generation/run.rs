//! Single generate entry point: validate, plan, schedule, aggregate.
//! The CLI and other callers use this only; no plan/scheduler orchestration in adapters.

use crate::error::ApiError;
use crate::generation::aggregate::aggregate;
use crate::generation::client::{IconClient, MAX_ICONS_PER_CALL};
use crate::generation::plan::BatchPlan;
use crate::generation::scheduler::{BatchScheduler, SchedulerConfig};
use crate::progress::ProgressSink;
use crate::types::IconPack;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Configuration for icon pack generation (`[generation]` config section)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Icons requested per provider call
    pub batch_size: usize,
    /// Maximum concurrent provider calls
    pub concurrency: usize,
    /// Attempts per batch, including the first
    pub max_attempts: usize,
    /// Delay between attempts (milliseconds)
    pub retry_delay_ms: u64,
    /// Delay between waves (milliseconds)
    pub wave_delay_ms: u64,
    /// Largest pack a single request may ask for
    pub max_total: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            batch_size: MAX_ICONS_PER_CALL,
            concurrency: 2,
            max_attempts: 3,
            retry_delay_ms: 2000,
            wave_delay_ms: 1000,
            max_total: 200,
        }
    }
}

impl GenerationConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.batch_size == 0 || self.batch_size > MAX_ICONS_PER_CALL {
            return Err(format!(
                "batch_size must be between 1 and {}, got {}",
                MAX_ICONS_PER_CALL, self.batch_size
            ));
        }
        if self.concurrency == 0 {
            return Err("concurrency must be at least 1".to_string());
        }
        if self.max_attempts == 0 {
            return Err("max_attempts must be at least 1".to_string());
        }
        if self.max_total == 0 {
            return Err("max_total must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            concurrency: self.concurrency,
            max_attempts: self.max_attempts,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            wave_delay: Duration::from_millis(self.wave_delay_ms),
        }
    }
}

/// Generate an icon pack of up to `total` icons for `theme`.
///
/// Per-batch failures are absorbed; the only generation failure is
/// [`ApiError::NoIconsGenerated`], when no batch delivered anything.
pub async fn generate_icon_pack<C: IconClient>(
    client: &C,
    theme: &str,
    total: usize,
    config: &GenerationConfig,
    on_progress: Option<&dyn ProgressSink>,
) -> Result<IconPack, ApiError> {
    IconPackGenerator::new(client, config.clone())?
        .generate(theme, total, on_progress)
        .await
}

/// Reusable generator bound to one client and configuration.
pub struct IconPackGenerator<C> {
    client: C,
    config: GenerationConfig,
    cancel: Option<CancellationToken>,
}

impl<C: IconClient> IconPackGenerator<C> {
    pub fn new(client: C, config: GenerationConfig) -> Result<Self, ApiError> {
        config.validate().map_err(ApiError::ConfigError)?;
        Ok(Self {
            client,
            config,
            cancel: None,
        })
    }

    /// Cancel between waves when `token` fires.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub async fn generate(
        &self,
        theme: &str,
        total: usize,
        on_progress: Option<&dyn ProgressSink>,
    ) -> Result<IconPack, ApiError> {
        if total == 0 || total > self.config.max_total {
            return Err(ApiError::InvalidRequest(format!(
                "Icon count must be between 1 and {}, got {}",
                self.config.max_total, total
            )));
        }

        let theme = theme.trim();
        let plan = BatchPlan::new(theme, total, self.config.batch_size);
        plan.validate()?;

        info!(
            theme,
            total,
            batches = plan.batch_count(),
            batch_size = self.config.batch_size,
            "Generating icon pack"
        );

        let mut scheduler = BatchScheduler::new(self.config.scheduler_config());
        if let Some(token) = &self.cancel {
            scheduler = scheduler.with_cancellation(token.clone());
        }

        let outcomes = scheduler.run(&self.client, &plan, on_progress).await;
        aggregate(theme, outcomes)
    }
}
