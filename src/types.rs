//! Core data types: icon records, groups, and the assembled pack.

use serde::{Deserialize, Serialize};

/// Group name used for icons the service did not label.
pub const DEFAULT_GROUP: &str = "General";

/// A single generated icon.
///
/// `vector_body` is inner SVG markup (paths, circles, rects) drawn on a 48x48
/// grid with a 2-unit stroke and no fill. It is never a full `<svg>` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconRecord {
    pub name: String,
    pub description: String,
    pub vector_body: String,
    /// Category label assigned by the service, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl IconRecord {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        vector_body: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            vector_body: vector_body.into(),
            group: None,
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    fn matches_query(&self, query_lower: &str) -> bool {
        self.name.to_lowercase().contains(query_lower)
            || self.description.to_lowercase().contains(query_lower)
    }
}

/// Pack-level metadata the service may return alongside a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackMetadata {
    pub pack_name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconGroup {
    pub name: String,
    pub icons: Vec<IconRecord>,
}

/// The final aggregated pack handed to rendering and export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconPack {
    pub pack_name: String,
    pub description: String,
    pub groups: Vec<IconGroup>,
}

impl IconPack {
    pub fn icon_count(&self) -> usize {
        self.groups.iter().map(|group| group.icons.len()).sum()
    }

    pub fn group_names(&self) -> Vec<&str> {
        self.groups.iter().map(|group| group.name.as_str()).collect()
    }

    /// All icons paired with their group name, in pack order.
    pub fn icons(&self) -> impl Iterator<Item = (&str, &IconRecord)> {
        self.groups
            .iter()
            .flat_map(|group| group.icons.iter().map(move |icon| (group.name.as_str(), icon)))
    }

    /// Icons matching an optional group and a case-insensitive query over
    /// name and description. An empty query matches everything.
    pub fn filter<'a>(
        &'a self,
        group: Option<&'a str>,
        query: &str,
    ) -> Vec<(&'a str, &'a IconRecord)> {
        let query_lower = query.trim().to_lowercase();
        self.icons()
            .filter(|(group_name, _)| group.map_or(true, |wanted| wanted == *group_name))
            .filter(|(_, icon)| query_lower.is_empty() || icon.matches_query(&query_lower))
            .collect()
    }
}
