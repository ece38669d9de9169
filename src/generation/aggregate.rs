use crate::error::{ApiError, ServiceClassification};
use crate::generation::scheduler::BatchOutcome;
use crate::types::{IconGroup, IconPack, PackMetadata, DEFAULT_GROUP};
use tracing::{info, warn};

/// Merge batch outcomes into a single pack.
///
/// Icons keep batch order. Groups with the same name are merged in first-seen
/// order, and unlabeled icons land in [`DEFAULT_GROUP`]. Fails only when no batch
/// delivered a single icon: [`ApiError::Cancelled`] if no batch was even
/// attempted, [`ApiError::NoIconsGenerated`] otherwise.
pub fn aggregate(theme: &str, outcomes: Vec<BatchOutcome>) -> Result<IconPack, ApiError> {
    let total_icons: usize = outcomes.iter().map(|outcome| outcome.icons.len()).sum();
    if total_icons == 0 && !outcomes.is_empty() && outcomes.iter().all(|o| o.attempts == 0) {
        warn!(theme, batches = outcomes.len(), "Cancelled before any batch ran");
        return Err(ApiError::Cancelled);
    }
    if total_icons == 0 {
        let cause = outcomes
            .iter()
            .rev()
            .find_map(|outcome| outcome.last_failure)
            .unwrap_or(ServiceClassification::Unknown);
        warn!(
            theme,
            batches = outcomes.len(),
            cause = %cause,
            "No batch produced any icons"
        );
        return Err(ApiError::NoIconsGenerated { cause });
    }

    let mut metadata: Option<PackMetadata> = None;
    let mut groups: Vec<IconGroup> = Vec::new();
    let mut failed_batches = 0usize;

    for outcome in outcomes {
        if outcome.is_empty() {
            failed_batches += 1;
            continue;
        }
        if metadata.is_none() {
            metadata = outcome.metadata;
        }
        for icon in outcome.icons {
            let group_name = icon.group.as_deref().unwrap_or(DEFAULT_GROUP);
            match groups.iter_mut().find(|group| group.name == group_name) {
                Some(group) => group.icons.push(icon),
                None => groups.push(IconGroup {
                    name: group_name.to_string(),
                    icons: vec![icon],
                }),
            }
        }
    }

    let PackMetadata {
        pack_name,
        description,
    } = metadata.unwrap_or_else(|| synthesize_metadata(theme, total_icons));

    info!(
        theme,
        pack_name = %pack_name,
        icons = total_icons,
        groups = groups.len(),
        failed_batches,
        "Icon pack assembled"
    );

    Ok(IconPack {
        pack_name,
        description,
        groups,
    })
}

fn synthesize_metadata(theme: &str, icon_count: usize) -> PackMetadata {
    let theme = theme.trim();
    PackMetadata {
        pack_name: format!("{} Icons", theme),
        description: format!(
            "{} minimal line icons for the {} theme",
            icon_count, theme
        ),
    }
}
