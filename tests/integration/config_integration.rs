//! Layered config loading: user file, project file, explicit file.

use crate::integration::test_utils::with_isolated_config_home;
use iconforge::config::{user_config_path, ConfigLoader, ProviderType, PROJECT_CONFIG_FILE};
use tempfile::TempDir;

fn write_user_config(contents: &str) {
    let path = user_config_path().expect("user config path");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

#[test]
fn defaults_apply_without_any_file() {
    with_isolated_config_home(|_| {
        let project = TempDir::new().unwrap();
        let config = ConfigLoader::load(project.path()).unwrap();
        assert_eq!(config.provider.provider_type, ProviderType::Gemini);
        assert_eq!(config.provider.model, "gemini-2.5-flash");
        assert_eq!(config.generation.batch_size, 25);
        assert_eq!(config.generation.retry_delay_ms, 2000);
        assert_eq!(config.generation.wave_delay_ms, 1000);
        assert!(config.validate().is_ok());
    });
}

#[test]
fn project_file_overrides_user_file() {
    with_isolated_config_home(|home| {
        let path = user_config_path().unwrap();
        assert!(path.starts_with(home.path()));

        write_user_config(
            r#"
[provider]
model = "gemini-2.0-flash"

[generation]
concurrency = 5
max_attempts = 4
"#,
        );

        let project = TempDir::new().unwrap();
        std::fs::write(
            project.path().join(PROJECT_CONFIG_FILE),
            "[generation]\nconcurrency = 1\n",
        )
        .unwrap();

        let config = ConfigLoader::load(project.path()).unwrap();
        assert_eq!(config.provider.model, "gemini-2.0-flash");
        assert_eq!(config.generation.concurrency, 1);
        assert_eq!(config.generation.max_attempts, 4);
    });
}

#[test]
fn explicit_file_replaces_project_file() {
    with_isolated_config_home(|_| {
        let project = TempDir::new().unwrap();
        std::fs::write(
            project.path().join(PROJECT_CONFIG_FILE),
            "[generation]\nconcurrency = 1\n",
        )
        .unwrap();
        let explicit = project.path().join("ci.toml");
        std::fs::write(
            &explicit,
            "[provider]\ntype = \"openai\"\nmodel = \"gpt-4o-mini\"\n",
        )
        .unwrap();

        let config = ConfigLoader::load_with_file(&explicit).unwrap();
        assert_eq!(config.provider.provider_type, ProviderType::OpenAI);
        assert_eq!(config.generation.concurrency, 2);
    });
}

#[test]
fn explicit_file_must_exist() {
    with_isolated_config_home(|home| {
        let result = ConfigLoader::load_with_file(&home.path().join("missing.toml"));
        assert!(result.is_err());
    });
}

#[test]
fn invalid_values_are_reported_by_validate() {
    with_isolated_config_home(|_| {
        let project = TempDir::new().unwrap();
        std::fs::write(
            project.path().join(PROJECT_CONFIG_FILE),
            "[generation]\nbatch_size = 40\n\n[provider]\nendpoint = \"localhost\"\n",
        )
        .unwrap();

        let config = ConfigLoader::load(project.path()).unwrap();
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    });
}
