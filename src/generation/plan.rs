use crate::error::ApiError;
use serde::{Deserialize, Serialize};

/// A bounded sub-request; the unit of retry and concurrency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub index: usize,
    pub requested_count: usize,
}

/// Split `total` into `batch_size` chunks, the last taking the remainder.
///
/// Returns an empty plan when `total` or `batch_size` is zero.
pub fn plan_batches(total: usize, batch_size: usize) -> Vec<Batch> {
    if total == 0 || batch_size == 0 {
        return Vec::new();
    }
    let batch_count = total.div_ceil(batch_size);
    (0..batch_count)
        .map(|index| Batch {
            index,
            requested_count: if index + 1 == batch_count {
                total - batch_size * (batch_count - 1)
            } else {
                batch_size
            },
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPlan {
    pub theme: String,
    pub total: usize,
    pub batches: Vec<Batch>,
}

impl BatchPlan {
    pub fn new(theme: impl Into<String>, total: usize, batch_size: usize) -> Self {
        Self {
            theme: theme.into(),
            total,
            batches: plan_batches(total, batch_size),
        }
    }

    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// Group batches into consecutive waves of at most `concurrency` batches.
    pub fn waves(&self, concurrency: usize) -> impl Iterator<Item = &[Batch]> {
        self.batches.chunks(concurrency.max(1))
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.theme.trim().is_empty() {
            return Err(ApiError::InvalidRequest(
                "Theme cannot be empty".to_string(),
            ));
        }
        if self.batches.is_empty() {
            return Err(ApiError::InvalidRequest(
                "Batch plan must contain at least one batch".to_string(),
            ));
        }
        if self
            .batches
            .iter()
            .enumerate()
            .any(|(position, batch)| batch.index != position || batch.requested_count == 0)
        {
            return Err(ApiError::InvalidRequest(
                "Batch plan contains an empty or out-of-order batch".to_string(),
            ));
        }
        let planned: usize = self.batches.iter().map(|batch| batch.requested_count).sum();
        if planned != self.total {
            return Err(ApiError::InvalidRequest(format!(
                "Batch plan total mismatch: expected {}, got {}",
                self.total, planned
            )));
        }
        Ok(())
    }
}
