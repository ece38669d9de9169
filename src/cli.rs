//! CLI domain: parse, route, output, and presentation only.
//! Generation itself lives behind `generate_icon_pack`; the route table only wires it up.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, OutputFormat};
pub use presentation::{
    format_pack_json, format_pack_text, format_progress_line, format_themes_text,
    TRENDING_THEMES,
};
pub use route::RunContext;
