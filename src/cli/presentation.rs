//! CLI presentation: text tables, JSON, and progress lines.

use crate::error::ApiError;
use crate::progress::ProgressState;
use crate::types::{IconGroup, IconPack, IconRecord};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Themes suggested by `iconforge themes`.
pub const TRENDING_THEMES: &[&str] = &[
    "Artificial Intelligence",
    "Smart Home",
    "Cryptocurrency",
    "Medical & Health",
    "E-commerce",
    "Cloud Computing",
    "Cyber Security",
    "Education",
    "Eco & Nature",
    "Finance & Banking",
    "Gaming",
    "Travel",
    "Food & Delivery",
    "Social Media",
    "Photography",
    "Fitness",
    "Real Estate",
    "Automotive",
    "Music",
    "Weather",
];

fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// `Generated 25/50 icons (50%)`
pub fn format_progress_line(state: ProgressState) -> String {
    let percent = if state.total == 0 {
        100
    } else {
        state.completed * 100 / state.total
    };
    format!(
        "Generated {}/{} icons ({}%)",
        state.completed, state.total, percent
    )
}

/// Pack heading plus a table of the selected icons.
pub fn format_pack_text(pack: &IconPack, selected: &[(&str, &IconRecord)]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", format_section_heading(&pack.pack_name)));
    out.push_str(&format!("{}\n\n", pack.description.dimmed()));

    if selected.is_empty() {
        out.push_str("No icons match the current filter.\n");
        return out;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Group", "Name", "Description"]);
    for (group, icon) in selected {
        table.add_row(vec![
            group.to_string(),
            icon.name.clone(),
            icon.description.clone(),
        ]);
    }
    out.push_str(&format!("{}\n\n", table));

    let shown = if selected.len() == pack.icon_count() {
        format!("{} icons", pack.icon_count())
    } else {
        format!("{} of {} icons", selected.len(), pack.icon_count())
    };
    out.push_str(&format!(
        "{} in {} groups",
        shown.green(),
        pack.groups.len()
    ));
    out
}

/// The selected icons as a pack-shaped JSON document.
pub fn format_pack_json(pack: &IconPack, selected: &[(&str, &IconRecord)]) -> Result<String, ApiError> {
    let mut groups: Vec<IconGroup> = Vec::new();
    for (group_name, icon) in selected {
        match groups.last_mut() {
            Some(group) if group.name == *group_name => group.icons.push((*icon).clone()),
            _ => groups.push(IconGroup {
                name: group_name.to_string(),
                icons: vec![(*icon).clone()],
            }),
        }
    }
    let view = IconPack {
        pack_name: pack.pack_name.clone(),
        description: pack.description.clone(),
        groups,
    };
    serde_json::to_string_pretty(&view)
        .map_err(|e| ApiError::ExportError(format!("Failed to encode pack: {}", e)))
}

pub fn format_themes_text() -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Trending themes")));
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["#", "Theme"]);
    for (i, theme) in TRENDING_THEMES.iter().enumerate() {
        table.add_row(vec![(i + 1).to_string(), theme.to_string()]);
    }
    out.push_str(&table.to_string());
    out
}
