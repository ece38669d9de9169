//! Iconforge: batched icon pack generation
//!
//! Turns a theme and a requested icon count into an icon pack by splitting the
//! request into batches, running them against a generative model with bounded
//! concurrency and retries, and merging whatever succeeded.

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod generation;
pub mod logging;
pub mod progress;
pub mod provider;
pub mod types;

pub use error::{ApiError, ClientError, ServiceClassification};
pub use generation::{generate_icon_pack, GenerationConfig, IconClient, IconPackGenerator};
pub use progress::{ProgressSink, ProgressState};
pub use types::{IconGroup, IconPack, IconRecord, PackMetadata};
