//! Configuration file support.
//!
//! Lookup order for credentials: `FBPOST_APP_ID` / `FBPOST_APP_SECRET`
//! environment variables, then the config file, which lives at
//! `~/.config/fbpost/config.toml` on Linux unless `--config` points elsewhere.

use crate::clients::facebook::{FacebookCredentials, GRAPH_API_BASE};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_ID_ENV: &str = "FBPOST_APP_ID";
pub const APP_SECRET_ENV: &str = "FBPOST_APP_SECRET";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub facebook: FacebookConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacebookConfig {
    /// App id used as `client_id` in the token exchange.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    /// App secret used as `client_secret` in the token exchange.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_secret: Option<String>,
    /// Versioned Graph API root.
    pub api_base_url: String,
    /// Per-request timeout enforced by the HTTP client.
    pub timeout_secs: u64,
}

impl Default for FacebookConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            app_secret: None,
            api_base_url: GRAPH_API_BASE.to_string(),
            timeout_secs: 20,
        }
    }
}

impl FacebookConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn credentials(&self) -> Result<FacebookCredentials> {
        let app_id = self.app_id.clone().with_context(|| {
            format!("missing Facebook app id (set [facebook] app_id or {APP_ID_ENV})")
        })?;
        let app_secret = self.app_secret.clone().with_context(|| {
            format!("missing Facebook app secret (set [facebook] app_secret or {APP_SECRET_ENV})")
        })?;
        Ok(FacebookCredentials { app_id, app_secret })
    }
}

impl Config {
    /// Load from `path`, or the default location when `None`, then apply
    /// environment overrides. A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::get_config_path()?,
        };

        let mut config = Self::load_file(&path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Override credentials from the environment. Empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if let Some(id) = non_empty(APP_ID_ENV) {
            self.facebook.app_id = Some(id);
        }
        if let Some(secret) = non_empty(APP_SECRET_ENV) {
            self.facebook.app_secret = Some(secret);
        }
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("fbpost").join("config.toml"))
    }

    /// Write the commented template to `path` unless a file already exists.
    /// Returns whether anything was written.
    pub fn init_file(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(path, Self::default_toml())
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(true)
    }

    pub fn default_toml() -> String {
        format!(
            r#"# fbpost configuration
# Location: ~/.config/fbpost/config.toml (Linux)
#           ~/Library/Application Support/fbpost/config.toml (macOS)

[facebook]
# App credentials for the client-credentials token exchange.
# FBPOST_APP_ID and FBPOST_APP_SECRET take precedence when set.
# app_id = ""
# app_secret = ""

# Versioned Graph API root
api_base_url = "{GRAPH_API_BASE}"

# Per-request timeout in seconds
timeout_secs = 20
"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.facebook.api_base_url, GRAPH_API_BASE);
        assert_eq!(config.facebook.timeout(), Duration::from_secs(20));
    }

    #[test]
    fn test_load_file_reads_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[facebook]\napp_id = \"mockId\"\napp_secret = \"mockSecret\"\ntimeout_secs = 5\n",
        )
        .unwrap();

        let config = Config::load_file(&path).unwrap();
        assert_eq!(
            config.facebook.credentials().unwrap(),
            FacebookCredentials {
                app_id: "mockId".to_string(),
                app_secret: "mockSecret".to_string(),
            }
        );
        assert_eq!(config.facebook.timeout_secs, 5);
        assert_eq!(config.facebook.api_base_url, GRAPH_API_BASE);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[facebook\napp_id = 1").unwrap();
        assert!(Config::load_file(&path).is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = Config::default();
        config.facebook.app_id = Some("fromFile".to_string());

        let env: HashMap<&str, &str> = [(APP_ID_ENV, "fromEnv"), (APP_SECRET_ENV, "")].into();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.facebook.app_id.as_deref(), Some("fromEnv"));
        assert_eq!(config.facebook.app_secret, None);
    }

    #[test]
    fn test_missing_credentials_error_names_env_var() {
        let err = Config::default().facebook.credentials().unwrap_err();
        assert!(err.to_string().contains(APP_ID_ENV));
    }

    #[test]
    fn test_default_toml_parses_to_defaults() {
        let parsed: Config = toml::from_str(&Config::default_toml()).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_init_file_writes_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        assert!(Config::init_file(&path).unwrap());
        assert!(!Config::init_file(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), Config::default_toml());
    }
}
