//! # Configuration Loader
//!
//! Reads a TOML file into [`CopyConfig`]. Keys missing from the file keep
//! their built-in defaults; nothing here validates selectors.

use anyhow::Context;
use std::path::{Path, PathBuf};

use cc_core::CopyConfig;

/// `<config dir>/chatcopy/config.toml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("chatcopy").join("config.toml"))
}

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns error if the file cannot be read, is not valid TOML, or has
/// values of the wrong type.
pub fn load_config(config_path: &Path) -> anyhow::Result<CopyConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    CopyConfig::from_toml(&toml_value)
        .with_context(|| format!("Invalid config in {}", config_path.display()))
}

/// Explicit path: must load. No path: the default file if it exists,
/// otherwise built-in defaults.
pub fn resolve_config(explicit: Option<&Path>) -> anyhow::Result<CopyConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match default_config_path() {
        Some(path) if path.exists() => load_config(&path),
        _ => {
            tracing::debug!("no config file, using defaults");
            Ok(CopyConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file
    }

    #[test]
    fn test_load_config_reads_overrides() {
        let temp_file = write_config(
            r#"
            marker_attribute = "data-copied"

            [selectors]
            action_containers = [".actions"]

            [fetch]
            base_url = "https://chat.example/"
            "#,
        );

        let config = load_config(temp_file.path()).unwrap();

        assert_eq!(config.marker_attribute, "data-copied");
        assert_eq!(config.selectors.action_containers, vec![".actions".to_string()]);
        assert_eq!(config.fetch.base_url.as_deref(), Some("https://chat.example/"));
        assert_eq!(
            config.selectors.message_roots,
            CopyConfig::default().selectors.message_roots
        );
    }

    #[test]
    fn test_load_config_empty_file_is_defaults() {
        let temp_file = write_config("");
        assert_eq!(load_config(temp_file.path()).unwrap(), CopyConfig::default());
    }

    #[test]
    fn test_load_config_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");

        let err = load_config(&missing).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read config file"));
    }

    #[test]
    fn test_load_config_reports_invalid_toml() {
        let temp_file = write_config("marker_attribute = ");
        let err = load_config(temp_file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config as TOML"));
    }

    #[test]
    fn test_resolve_config_requires_explicit_path_to_exist() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve_config(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
