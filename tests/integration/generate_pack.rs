//! End-to-end generation through `generate_icon_pack` with a scripted client.

use crate::integration::test_utils::{rate_limited, unavailable, MockIconClient};
use iconforge::error::{ApiError, ServiceClassification};
use iconforge::generation::{generate_icon_pack, GenerationConfig, IconPackGenerator};
use iconforge::progress::ProgressState;
use parking_lot::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn config(batch_size: usize, concurrency: usize) -> GenerationConfig {
    GenerationConfig {
        batch_size,
        concurrency,
        ..GenerationConfig::default()
    }
}

fn names(pack: &iconforge::IconPack) -> Vec<String> {
    pack.icons().map(|(_, icon)| icon.name.clone()).collect()
}

#[tokio::test(start_paused = true)]
async fn robots_request_runs_two_waves() {
    let client = MockIconClient::always_ok();
    let seen = Mutex::new(Vec::new());
    let on_progress = |state: ProgressState| seen.lock().push(state);

    let pack = generate_icon_pack(&client, "Robots", 10, &config(4, 2), Some(&on_progress))
        .await
        .unwrap();

    assert!(pack.icon_count() <= 10);
    assert_eq!(pack.icon_count(), 10);

    let calls = client.calls();
    let batches: Vec<usize> = calls.iter().map(|call| call.batch_index).collect();
    assert_eq!(batches.len(), 3);
    assert_eq!(calls[0].started, calls[1].started, "first wave is concurrent");
    let mut first_wave = vec![calls[0].batch_index, calls[1].batch_index];
    first_wave.sort_unstable();
    assert_eq!(first_wave, vec![0, 1]);
    assert_eq!(calls[2].batch_index, 2);
    assert!(
        calls[2].started - calls[0].started >= Duration::from_millis(100 + 1000),
        "second wave waits for the first to settle plus the wave delay"
    );

    let progress = seen.lock().clone();
    assert!(progress.len() >= 2);
    assert_eq!(progress.last().map(|s| s.completed), Some(10));
    assert!(progress.iter().all(|s| s.total == 10));
}

#[tokio::test(start_paused = true)]
async fn every_batch_failing_yields_no_icons_generated() {
    let client = MockIconClient::new(|_, _| Err(unavailable()));

    let err = generate_icon_pack(&client, "Robots", 60, &config(25, 2), None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApiError::NoIconsGenerated {
            cause: ServiceClassification::Unavailable
        }
    ));
    assert!(err.to_string().contains("temporarily unavailable"));
    // 3 batches x 3 attempts
    assert_eq!(client.calls().len(), 9);
}

#[tokio::test(start_paused = true)]
async fn exactly_one_successful_batch_is_the_whole_pack() {
    let client = MockIconClient::new(|batch, _| {
        if batch == 2 {
            Ok(usize::MAX)
        } else {
            Err(rate_limited())
        }
    });

    let pack = generate_icon_pack(&client, "Robots", 20, &config(5, 2), None)
        .await
        .unwrap();

    let expected: Vec<String> = (0..5).map(|i| format!("b2-i{}", i)).collect();
    assert_eq!(names(&pack), expected);
}

#[tokio::test(start_paused = true)]
async fn retry_budget_is_respected() {
    // batch 0 recovers on its third attempt, batch 1 never recovers
    let client = MockIconClient::new(|batch, attempt| match (batch, attempt) {
        (0, 1) | (0, 2) => Err(rate_limited()),
        (1, _) => Err(unavailable()),
        _ => Ok(usize::MAX),
    });

    let pack = generate_icon_pack(&client, "Robots", 12, &config(4, 3), None)
        .await
        .unwrap();

    assert_eq!(pack.icon_count(), 8);
    let calls = client.calls();
    let attempts_for = |batch: usize| calls.iter().filter(|c| c.batch_index == batch).count();
    assert_eq!(attempts_for(0), 3);
    assert_eq!(attempts_for(1), 3);
    assert_eq!(attempts_for(2), 1);
    assert!(names(&pack).iter().all(|name| !name.starts_with("b1-")));
}

#[tokio::test(start_paused = true)]
async fn concurrency_ceiling_holds_across_waves() {
    let client = MockIconClient::always_ok();

    generate_icon_pack(&client, "Robots", 100, &config(10, 3), None)
        .await
        .unwrap();

    assert_eq!(client.calls().len(), 10);
    assert!(client.max_in_flight() <= 3);
    assert_eq!(client.max_in_flight(), 3);
}

#[tokio::test(start_paused = true)]
async fn progress_is_monotonic_and_bounded_under_partial_failure() {
    let client = MockIconClient::new(|batch, _| {
        if batch % 2 == 1 {
            Err(rate_limited())
        } else {
            Ok(3)
        }
    });
    let seen = Mutex::new(Vec::new());
    let on_progress = |state: ProgressState| seen.lock().push(state);

    let pack = generate_icon_pack(&client, "Robots", 50, &config(10, 2), Some(&on_progress))
        .await
        .unwrap();

    let progress = seen.lock().clone();
    assert_eq!(progress.len(), 3, "one update per wave");
    assert!(progress.windows(2).all(|w| w[0].completed <= w[1].completed));
    assert!(progress.iter().all(|s| s.completed <= s.total));
    assert_eq!(pack.icon_count(), 9);
    assert_eq!(progress.last().map(|s| s.completed), Some(9));
}

#[tokio::test(start_paused = true)]
async fn service_metadata_names_the_pack() {
    let client = MockIconClient::always_ok().with_metadata("Robo Kit", "Mechanical friends");

    let pack = generate_icon_pack(&client, "Robots", 3, &config(25, 2), None)
        .await
        .unwrap();

    assert_eq!(pack.pack_name, "Robo Kit");
    assert_eq!(pack.description, "Mechanical friends");
}

#[tokio::test(start_paused = true)]
async fn invalid_requests_never_reach_the_client() {
    let client = MockIconClient::always_ok();
    let cfg = config(25, 2);

    for (theme, total) in [("Robots", 0), ("Robots", 201), ("   ", 10)] {
        let err = generate_icon_pack(&client, theme, total, &cfg, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)), "{theme:?}/{total}");
    }
    assert!(client.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancellation_keeps_what_the_first_wave_delivered() {
    let client = MockIconClient::always_ok();
    let token = CancellationToken::new();
    let generator = IconPackGenerator::new(&client, config(5, 2))
        .unwrap()
        .with_cancellation(token.clone());

    let cancel_after_first_wave = |state: ProgressState| {
        if state.completed >= 10 {
            token.cancel();
        }
    };
    let pack = generator
        .generate("Robots", 30, Some(&cancel_after_first_wave))
        .await
        .unwrap();

    assert_eq!(pack.icon_count(), 10);
    assert_eq!(client.calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn cancelling_before_the_first_wave_reports_cancellation() {
    let client = MockIconClient::always_ok();
    let token = CancellationToken::new();
    token.cancel();
    let generator = IconPackGenerator::new(&client, config(5, 2))
        .unwrap()
        .with_cancellation(token);

    let err = generator.generate("Robots", 30, None).await.unwrap_err();

    assert!(matches!(err, ApiError::Cancelled));
    assert!(client.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn zero_icon_replies_use_the_retry_budget() {
    // first attempt of every batch comes back empty
    let client = MockIconClient::new(|_, attempt| if attempt == 1 { Ok(0) } else { Ok(usize::MAX) });

    let pack = generate_icon_pack(&client, "Robots", 8, &config(4, 2), None)
        .await
        .unwrap();

    assert_eq!(pack.icon_count(), 8);
    assert_eq!(client.calls().len(), 4);
}

#[test]
fn invalid_generation_config_is_a_config_error() {
    let client = MockIconClient::always_ok();
    let result = IconPackGenerator::new(&client, config(26, 2));
    assert!(matches!(result, Err(ApiError::ConfigError(_))));
}
