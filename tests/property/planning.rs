//! Property-based tests for the batch planner

use iconforge::generation::{plan_batches, BatchPlan};
use proptest::prelude::*;

/// Batches always cover the request exactly
#[test]
fn test_plan_covers_total_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(1usize..=1000, 1usize..=50), |(total, batch_size)| {
            let batches = plan_batches(total, batch_size);

            let sum: usize = batches.iter().map(|b| b.requested_count).sum();
            prop_assert_eq!(sum, total);
            prop_assert_eq!(batches.len(), total.div_ceil(batch_size));

            // every batch but the last is full, indices follow plan order
            for (position, batch) in batches.iter().enumerate() {
                prop_assert_eq!(batch.index, position);
                prop_assert!(batch.requested_count >= 1);
                prop_assert!(batch.requested_count <= batch_size);
                if position + 1 < batches.len() {
                    prop_assert_eq!(batch.requested_count, batch_size);
                }
            }

            Ok(())
        })
        .unwrap();
}

/// Planning the same request twice gives the same batches
#[test]
fn test_plan_determinism_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(0usize..=500, 0usize..=30), |(total, batch_size)| {
            let first = plan_batches(total, batch_size);
            let second = plan_batches(total, batch_size);
            prop_assert_eq!(&first, &second);
            if total == 0 || batch_size == 0 {
                prop_assert!(first.is_empty());
            }
            Ok(())
        })
        .unwrap();
}

/// Waves partition the plan in order, each at most `concurrency` wide
#[test]
fn test_waves_partition_plan_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(1usize..=300, 1usize..=25, 1usize..=8),
            |(total, batch_size, concurrency)| {
                let plan = BatchPlan::new("Robots", total, batch_size);
                prop_assert!(plan.validate().is_ok());

                let waves: Vec<_> = plan.waves(concurrency).collect();
                prop_assert_eq!(waves.len(), plan.batch_count().div_ceil(concurrency));

                let flattened: Vec<usize> = waves
                    .iter()
                    .flat_map(|wave| wave.iter().map(|b| b.index))
                    .collect();
                let expected: Vec<usize> = (0..plan.batch_count()).collect();
                prop_assert_eq!(flattened, expected);
                prop_assert!(waves.iter().all(|wave| wave.len() <= concurrency));

                Ok(())
            },
        )
        .unwrap();
}
