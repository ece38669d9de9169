//! Config file and environment sources.

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Project-level config file, looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = "iconforge.toml";

/// `$XDG_CONFIG_HOME/iconforge/config.toml` (or the platform equivalent).
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "iconforge").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Add the user config file if it exists.
pub fn add_user_file(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    match user_config_path() {
        Some(path) if path.exists() => {
            debug!(config_path = %path.display(), "Loading user config");
            builder.add_source(File::from(path).format(FileFormat::Toml).required(false))
        }
        _ => builder,
    }
}

/// Add a TOML file source. Optional files are skipped when missing.
pub fn add_file(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
    required: bool,
) -> ConfigBuilder<DefaultState> {
    debug!(config_path = %path.display(), required, "Adding config file");
    builder.add_source(
        File::from(path.to_path_buf())
            .format(FileFormat::Toml)
            .required(required),
    )
}

/// `ICONFORGE__GENERATION__CONCURRENCY=4` style overrides.
pub fn environment() -> Environment {
    Environment::with_prefix("ICONFORGE")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
