//! Property-based tests for progress reporting

use iconforge::error::{ClientError, ServiceClassification};
use iconforge::generation::{generate_icon_pack, BatchContext, GeneratedIcons, GenerationConfig, IconClient};
use iconforge::progress::{ProgressState, ProgressTracker};
use iconforge::types::IconRecord;
use parking_lot::Mutex;
use proptest::prelude::*;
use proptest::test_runner::{Config, TestRunner};

/// Returns a per-batch icon count (possibly more than asked) or fails.
struct ErraticClient {
    returns: Vec<Option<usize>>,
}

impl IconClient for ErraticClient {
    async fn generate(
        &self,
        _theme: &str,
        _count: usize,
        context: BatchContext,
    ) -> Result<GeneratedIcons, ClientError> {
        match self.returns.get(context.batch_index).copied().flatten() {
            Some(n) => Ok(GeneratedIcons {
                metadata: None,
                icons: (0..n)
                    .map(|i| IconRecord::new(format!("i{}", i), "icon", "<path d=\"M0 0\" />"))
                    .collect(),
            }),
            None => Err(ClientError::service(ServiceClassification::Unknown, "boom")),
        }
    }
}

/// The tracker never decreases and never passes the total
#[test]
fn test_tracker_monotonic_property() {
    let mut runner = TestRunner::default();

    runner
        .run(
            &(0usize..=200, prop::collection::vec(0usize..=60, 0..20)),
            |(total, deliveries)| {
                let mut tracker = ProgressTracker::new(total, None);
                let mut previous = tracker.state().completed;
                for delivered in deliveries {
                    let state = tracker.advance(delivered);
                    prop_assert!(state.completed >= previous);
                    prop_assert!(state.completed <= total);
                    previous = state.completed;
                }
                Ok(())
            },
        )
        .unwrap();
}

/// Across whole runs, reported progress is monotonic, bounded, and matches the pack
#[test]
fn test_run_progress_property() {
    let mut runner = TestRunner::new(Config::with_cases(48));

    runner
        .run(
            &(
                1usize..=120,
                1usize..=25,
                1usize..=4,
                prop::collection::vec(prop::option::of(0usize..=40), 0..12),
            ),
            |(total, batch_size, concurrency, returns)| {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_time()
                    .start_paused(true)
                    .build()
                    .unwrap();
                let client = ErraticClient { returns };
                let config = GenerationConfig {
                    batch_size,
                    concurrency,
                    ..GenerationConfig::default()
                };
                let seen = Mutex::new(Vec::new());
                let on_progress = |state: ProgressState| seen.lock().push(state);

                let result = runtime.block_on(generate_icon_pack(
                    &client,
                    "Robots",
                    total,
                    &config,
                    Some(&on_progress),
                ));

                let progress = seen.lock().clone();
                let waves = total.div_ceil(batch_size).div_ceil(concurrency);
                prop_assert_eq!(progress.len(), waves);
                prop_assert!(progress.windows(2).all(|w| w[0].completed <= w[1].completed));
                prop_assert!(progress.iter().all(|s| s.total == total && s.completed <= total));

                let final_completed = progress.last().map_or(0, |s| s.completed);
                match result {
                    Ok(pack) => {
                        prop_assert!(pack.icon_count() <= total);
                        prop_assert_eq!(pack.icon_count(), final_completed);
                    }
                    Err(_) => prop_assert_eq!(final_completed, 0),
                }
                Ok(())
            },
        )
        .unwrap();
}
