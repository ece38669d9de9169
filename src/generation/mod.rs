//! Icon pack generation: batch planning, the per-call client, the
//! concurrency-limited scheduler, and result aggregation.

pub mod aggregate;
pub mod client;
pub mod plan;
pub mod run;
pub mod scheduler;

pub use aggregate::aggregate;
pub use client::{
    parse_icon_response, strip_code_fences, BatchContext, GeneratedIcons, IconClient,
    ProviderIconClient, MAX_ICONS_PER_CALL,
};
pub use plan::{plan_batches, Batch, BatchPlan};
pub use run::{generate_icon_pack, GenerationConfig, IconPackGenerator};
pub use scheduler::{BatchOutcome, BatchScheduler, SchedulerConfig};
