//! Loader facade over the layered sources.

use super::merge::builder_with_defaults;
use super::sources::{self, PROJECT_CONFIG_FILE};
use super::IconforgeConfig;
use crate::error::ApiError;
use config::Environment;
use std::path::Path;

/// Loads [`IconforgeConfig`] from defaults, files and the environment.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, user file, `<project_root>/iconforge.toml` if present, environment.
    pub fn load(project_root: &Path) -> Result<IconforgeConfig, ApiError> {
        Self::build(
            true,
            &project_root.join(PROJECT_CONFIG_FILE),
            false,
            Some(sources::environment()),
        )
    }

    /// Like [`ConfigLoader::load`], with an explicit file that must exist in
    /// place of the project file.
    pub fn load_with_file(path: &Path) -> Result<IconforgeConfig, ApiError> {
        Self::build(true, path, true, Some(sources::environment()))
    }

    /// Defaults plus a single file; no user file and no environment.
    pub fn load_from_file(path: &Path) -> Result<IconforgeConfig, ApiError> {
        Self::build(false, path, true, None)
    }

    fn build(
        include_user_file: bool,
        file: &Path,
        required: bool,
        env: Option<Environment>,
    ) -> Result<IconforgeConfig, ApiError> {
        let mut builder = builder_with_defaults()?;
        if include_user_file {
            builder = sources::add_user_file(builder);
        }
        builder = sources::add_file(builder, file, required);
        if let Some(env) = env {
            builder = builder.add_source(env);
        }

        let config: IconforgeConfig = builder.build()?.try_deserialize()?;
        Ok(config)
    }
}
