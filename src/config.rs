use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/api/chat";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";

const APP_NAME: &str = "shai";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,
    #[serde(default = "default_ollama_model")]
    pub ollama_model: String,
    /// Free text injected verbatim into the system instruction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_context: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ollama_url: default_ollama_url(),
            ollama_model: default_ollama_model(),
            additional_context: None,
        }
    }
}

fn default_ollama_url() -> String {
    DEFAULT_OLLAMA_URL.to_string()
}

fn default_ollama_model() -> String {
    DEFAULT_OLLAMA_MODEL.to_string()
}

impl Config {
    /// Applies command-line overrides. Nothing here is written back to disk.
    pub fn with_overrides(mut self, url: Option<String>, model: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.ollama_url = url.trim().to_string();
        }
        if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
            self.ollama_model = model.trim().to_string();
        }
        self
    }

    pub fn additional_context(&self) -> Option<&str> {
        self.additional_context
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(format!(".{APP_NAME}"))))
        .context("Cannot resolve config directory")?;
    Ok(base.join(APP_NAME))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Result of loading the store: the config plus whether defaults were just written.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    pub path: PathBuf,
    pub created: bool,
}

pub fn load_or_create(path: &Path) -> Result<LoadedConfig> {
    if !path.exists() {
        let config = Config::default();
        save_config(path, &config)?;
        debug!(path = %path.display(), "wrote default config");
        return Ok(LoadedConfig {
            config,
            path: path.to_path_buf(),
            created: true,
        });
    }

    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let config: Config = serde_json::from_str(&text)
        .with_context(|| format!("Invalid config: {}", path.display()))?;
    Ok(LoadedConfig {
        config,
        path: path.to_path_buf(),
        created: false,
    })
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    let text = serde_json::to_string_pretty(cfg)?;
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn first_load_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let loaded = load_or_create(&path).unwrap();
        assert!(loaded.created);
        assert_eq!(loaded.config, Config::default());

        let stored: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(stored["ollama_url"], DEFAULT_OLLAMA_URL);
        assert_eq!(stored["ollama_model"], DEFAULT_OLLAMA_MODEL);
        assert!(stored.get("additional_context").is_none());

        let again = load_or_create(&path).unwrap();
        assert!(!again.created);
    }

    #[test]
    fn stored_values_are_used_as_is() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"ollama_url":"http://gpu-box:11434/api/chat","ollama_model":"qwen2.5","additional_context":"Prefer ffmpeg."}"#,
        )
        .unwrap();

        let cfg = load_or_create(&path).unwrap().config;
        assert_eq!(cfg.ollama_url, "http://gpu-box:11434/api/chat");
        assert_eq!(cfg.ollama_model, "qwen2.5");
        assert_eq!(cfg.additional_context(), Some("Prefer ffmpeg."));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"ollama_model":"mistral"}"#).unwrap();

        let cfg = load_or_create(&path).unwrap().config;
        assert_eq!(cfg.ollama_url, DEFAULT_OLLAMA_URL);
        assert_eq!(cfg.ollama_model, "mistral");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_or_create(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid config"));
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let cfg = Config::default().with_overrides(None, Some("phi3".to_string()));
        assert_eq!(cfg.ollama_model, "phi3");
        assert_eq!(cfg.ollama_url, DEFAULT_OLLAMA_URL);

        let cfg = Config::default().with_overrides(Some("  ".to_string()), None);
        assert_eq!(cfg.ollama_url, DEFAULT_OLLAMA_URL);
    }

    #[test]
    fn blank_additional_context_is_ignored() {
        let cfg = Config {
            additional_context: Some("   ".to_string()),
            ..Config::default()
        };
        assert_eq!(cfg.additional_context(), None);
    }
}
