//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

/// Map domain errors to the line printed on stderr.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::ProviderNotConfigured(_) | ApiError::ConfigError(_) => format!(
            "{}\nRun `iconforge config` to inspect the resolved configuration.",
            e
        ),
        _ => e.to_string(),
    }
}
