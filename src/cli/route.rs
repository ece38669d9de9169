//! CLI route: single route table and run context. Dispatches to generation, export and presentation.

use crate::cli::parse::{Commands, OutputFormat};
use crate::cli::presentation::{
    format_pack_json, format_pack_text, format_progress_line, format_themes_text,
};
use crate::config::{ConfigLoader, IconforgeConfig};
use crate::error::ApiError;
use crate::export::{illustrator_script, write_svg_files};
use crate::generation::{IconClient, IconPackGenerator, ProviderIconClient};
use crate::progress::ProgressState;
use crate::provider::ProviderFactory;
use crate::types::IconPack;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Runtime context for CLI execution: resolved configuration only.
pub struct RunContext {
    config: IconforgeConfig,
}

impl RunContext {
    /// Load configuration from the project root, or from `config_path` when given.
    pub fn new(project_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_with_file(path)?,
            None => ConfigLoader::load(&project_root)?,
        };
        Self::from_config(config)
    }

    pub fn from_config(config: IconforgeConfig) -> Result<Self, ApiError> {
        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &IconforgeConfig {
        &self.config
    }

    pub async fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Generate {
                theme,
                count,
                out,
                script,
                format,
                group,
                search,
            } => {
                let provider = ProviderFactory::create_client(&self.config.provider)?;
                let client = ProviderIconClient::new(provider, self.config.provider.options.clone());

                let cancel = CancellationToken::new();
                let watcher = spawn_interrupt_watcher(cancel.clone());
                let pack = self.generate(client, theme, *count, cancel).await;
                watcher.abort();
                let pack = pack?;

                let request = GenerateOutput {
                    out: out.as_deref(),
                    script: script.as_deref(),
                    format: *format,
                    group: group.as_deref(),
                    search: search.as_deref().unwrap_or(""),
                };
                render_generated(&pack, &request)
            }
            Commands::Themes => Ok(format_themes_text()),
            Commands::Config => self
                .config
                .to_toml_masked()
                .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e))),
        }
    }

    /// Run generation with a progress line on stderr after every wave.
    pub async fn generate<C: IconClient>(
        &self,
        client: C,
        theme: &str,
        count: usize,
        cancel: CancellationToken,
    ) -> Result<IconPack, ApiError> {
        let generator =
            IconPackGenerator::new(client, self.config.generation.clone())?.with_cancellation(cancel);
        let report = |state: ProgressState| eprintln!("{}", format_progress_line(state));
        generator.generate(theme, count, Some(&report)).await
    }
}

/// Export and filter options for a finished pack.
pub struct GenerateOutput<'a> {
    pub out: Option<&'a Path>,
    pub script: Option<&'a Path>,
    pub format: OutputFormat,
    pub group: Option<&'a str>,
    pub search: &'a str,
}

fn render_generated(pack: &IconPack, request: &GenerateOutput<'_>) -> Result<String, ApiError> {
    if let Some(dir) = request.out {
        write_svg_files(pack, dir)?;
    }
    if let Some(path) = request.script {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, illustrator_script(pack)?)?;
        info!(script = %path.display(), "Wrote Illustrator script");
    }

    let selected = pack.filter(request.group, request.search);
    match request.format {
        OutputFormat::Json => format_pack_json(pack, &selected),
        OutputFormat::Text => Ok(format_pack_text(pack, &selected)),
    }
}

fn spawn_interrupt_watcher(cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received; finishing the current wave");
            cancel.cancel();
        }
    })
}
