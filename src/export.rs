//! Pack export: standalone SVG files and a vector-editor import script.

use crate::error::ApiError;
use crate::types::{IconPack, IconRecord};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Icon grid edge, in SVG user units.
pub const ICON_GRID: u32 = 48;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Wrap an icon's inner markup in a complete 48x48 line-icon document.
pub fn svg_document(icon: &IconRecord) -> String {
    format!(
        "<svg xmlns=\"{ns}\" viewBox=\"0 0 {g} {g}\" width=\"{g}\" height=\"{g}\">\
         <g stroke=\"black\" stroke-width=\"2\" fill=\"none\" stroke-linecap=\"round\" stroke-linejoin=\"round\">\
         {body}</g></svg>",
        ns = SVG_NS,
        g = ICON_GRID,
        body = icon.vector_body,
    )
}

/// Replace everything outside `[A-Za-z0-9]` with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if sanitized.is_empty() {
        "icon".to_string()
    } else {
        sanitized
    }
}

/// Write one `.svg` per icon into `dir` (created if missing).
///
/// Files are named `<name>_<position>.svg` so duplicate names never collide.
pub fn write_svg_files(pack: &IconPack, dir: &Path) -> Result<Vec<PathBuf>, ApiError> {
    std::fs::create_dir_all(dir).map_err(|e| {
        ApiError::ExportError(format!("Failed to create {}: {}", dir.display(), e))
    })?;

    let mut written = Vec::with_capacity(pack.icon_count());
    for (position, (_, icon)) in pack.icons().enumerate() {
        let path = dir.join(format!("{}_{}.svg", sanitize_file_name(&icon.name), position));
        std::fs::write(&path, svg_document(icon)).map_err(|e| {
            ApiError::ExportError(format!("Failed to write {}: {}", path.display(), e))
        })?;
        written.push(path);
    }

    info!(
        dir = %dir.display(),
        files = written.len(),
        "Wrote SVG files"
    );
    Ok(written)
}

#[derive(Serialize)]
struct ScriptIcon {
    name: String,
    path: String,
}

/// Build an Illustrator (ExtendScript `.jsx`) script that recreates every icon
/// on a new layer named after the pack, laid out on an 80-unit grid.
pub fn illustrator_script(pack: &IconPack) -> Result<String, ApiError> {
    let icons: Vec<ScriptIcon> = pack
        .icons()
        .map(|(_, icon)| ScriptIcon {
            name: sanitize_file_name(&icon.name),
            // the script concatenates bodies into a double-quoted attribute context
            path: icon.vector_body.replace('"', "'"),
        })
        .collect();

    let icon_data = serde_json::to_string(&icons)
        .map_err(|e| ApiError::ExportError(format!("Failed to encode icon data: {}", e)))?;
    let layer_name = serde_json::to_string(&pack.pack_name)
        .map_err(|e| ApiError::ExportError(format!("Failed to encode pack name: {}", e)))?;
    let title = pack.pack_name.replace("*/", "* /");

    Ok(format!(
        r#"/*
  Iconforge - Adobe Illustrator Import Script
  Pack: {title}

  1. Open Adobe Illustrator.
  2. File > Scripts > Other Script... and pick this file.
  3. Choose a folder for the temporary SVG files when prompted.
*/

var iconData = {icon_data};

function main() {{
    if (app.documents.length === 0) {{
        app.documents.add(DocumentColorSpace.RGB, 1920, 1080);
    }}
    var doc = app.activeDocument;

    var folder = Folder.selectDialog("Select a folder to save temporary SVG files");
    if (!folder) {{
        alert("Script cancelled. No folder selected.");
        return;
    }}

    var x = 50;
    var y = -50;
    var gridSize = 80;
    var rowWidth = 800;

    var layer = doc.layers.add();
    layer.name = {layer_name};

    for (var i = 0; i < iconData.length; i++) {{
        var icon = iconData[i];
        var svgContent = '<svg xmlns="{ns}" viewBox="0 0 {g} {g}" width="{g}" height="{g}"><g stroke="black" stroke-width="2" fill="none" stroke-linecap="round" stroke-linejoin="round">' + icon.path + '</g></svg>';

        var f = new File(folder.fsName + "/" + icon.name + "_" + i + ".svg");
        f.open("w");
        f.write(svgContent);
        f.close();

        try {{
            var placedItem = layer.placedItems.add();
            placedItem.file = f;
            placedItem.position = [x, y];
            placedItem.embed();

            x += gridSize;
            if (x > rowWidth) {{
                x = 50;
                y -= gridSize;
            }}
        }} catch (e) {{
            // skip icons Illustrator cannot place
        }}
    }}

    alert("Successfully imported " + iconData.length + " icons!");
}}

main();
"#,
        title = title,
        icon_data = icon_data,
        layer_name = layer_name,
        ns = SVG_NS,
        g = ICON_GRID,
    ))
}
