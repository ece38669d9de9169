//! Shared test utilities for integration tests
//!
//! A scripted icon client plus config-home isolation for loader tests.

use iconforge::error::{ClientError, ServiceClassification};
use iconforge::generation::{BatchContext, GeneratedIcons, IconClient};
use iconforge::types::{IconRecord, PackMetadata};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::Instant;

type Script = dyn Fn(usize, usize) -> Result<usize, ClientError> + Send + Sync;

/// One recorded client call.
#[derive(Debug, Clone, Copy)]
pub struct Call {
    pub batch_index: usize,
    pub attempt: usize,
    pub started: Instant,
}

/// Icon client whose answer for `(batch_index, attempt)` comes from a script.
/// `Ok(n)` returns `n` icons named `b{batch}-i{n}`.
pub struct MockIconClient {
    script: Box<Script>,
    calls: Mutex<Vec<Call>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    latency: Duration,
    metadata: Option<PackMetadata>,
}

impl MockIconClient {
    pub fn new(
        script: impl Fn(usize, usize) -> Result<usize, ClientError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            latency: Duration::from_millis(100),
            metadata: None,
        }
    }

    /// Every call returns exactly what was asked for.
    pub fn always_ok() -> Self {
        Self::new(|_, _| Ok(usize::MAX))
    }

    pub fn with_metadata(mut self, pack_name: &str, description: &str) -> Self {
        self.metadata = Some(PackMetadata {
            pack_name: pack_name.to_string(),
            description: description.to_string(),
        });
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl IconClient for MockIconClient {
    async fn generate(
        &self,
        _theme: &str,
        count: usize,
        context: BatchContext,
    ) -> Result<GeneratedIcons, ClientError> {
        let attempt = {
            let mut calls = self.calls.lock();
            let attempt = calls
                .iter()
                .filter(|call| call.batch_index == context.batch_index)
                .count()
                + 1;
            calls.push(Call {
                batch_index: context.batch_index,
                attempt,
                started: Instant::now(),
            });
            attempt
        };

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let returned = (self.script)(context.batch_index, attempt)?.min(count);
        Ok(GeneratedIcons {
            metadata: self.metadata.clone(),
            icons: (0..returned)
                .map(|i| {
                    IconRecord::new(
                        format!("b{}-i{}", context.batch_index, i),
                        "scripted icon",
                        "<path d=\"M8 8L40 40\" />",
                    )
                })
                .collect(),
        })
    }
}

pub fn rate_limited() -> ClientError {
    ClientError::service(ServiceClassification::RateLimited, "429 Too Many Requests")
}

pub fn unavailable() -> ClientError {
    ClientError::service(ServiceClassification::Unavailable, "503 Service Unavailable")
}

/// Global mutex to serialize config-home environment access across tests.
static CONFIG_ENV_MUTEX: Mutex<()> = parking_lot::const_mutex(());

/// Run `f` with `XDG_CONFIG_HOME` (and `HOME`) pointed at a fresh temp dir.
pub fn with_isolated_config_home<F, R>(f: F) -> R
where
    F: FnOnce(&TempDir) -> R,
{
    let _guard = CONFIG_ENV_MUTEX.lock();
    let home = TempDir::new().unwrap();
    let saved_home = std::env::var("HOME").ok();
    let saved_xdg = std::env::var("XDG_CONFIG_HOME").ok();

    std::env::set_var("HOME", home.path());
    std::env::set_var("XDG_CONFIG_HOME", home.path().join(".config"));

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| f(&home)));

    match saved_home {
        Some(value) => std::env::set_var("HOME", value),
        None => std::env::remove_var("HOME"),
    }
    match saved_xdg {
        Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }

    match result {
        Ok(value) => value,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}
