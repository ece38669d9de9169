//! Built-in defaults, applied before any file or environment source.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Create a Config builder with the default values applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("provider.type", "gemini")?
        .set_default("provider.model", "gemini-2.5-flash")?
        .set_default("generation.batch_size", 25i64)?
        .set_default("generation.concurrency", 2i64)?
        .set_default("generation.max_attempts", 3i64)?
        .set_default("generation.retry_delay_ms", 2000i64)?
        .set_default("generation.wave_delay_ms", 1000i64)?
        .set_default("generation.max_total", 200i64)?
        .set_default("logging.level", "info")
}
