//! Configuration loading for the reaphost daemon

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use reaphost_core::ReaperConfig;

/// Top-level configuration for the reaphost daemon
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Orchestrator API settings
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    /// Cloud inventory settings
    #[serde(default)]
    pub cloud: CloudConfig,
    /// Reconciliation loop settings
    #[serde(default)]
    pub reaper: ReaperConfig,
}

/// Orchestrator API settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Base URL of the orchestrator REST API, including the version path
    #[serde(default)]
    pub url: String,
}

/// Cloud inventory settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloudConfig {
    /// Region-scoped compute endpoint template; `{region}` is substituted
    /// per call
    #[serde(default)]
    pub endpoint: String,
}

impl Config {
    /// Load configuration from a file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> eyre::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from default paths or fall back to defaults
    ///
    /// # Errors
    /// Returns an error if a found file cannot be read or parsed.
    pub fn load_default() -> eyre::Result<Self> {
        // Check environment variable
        if let Ok(path) = std::env::var("REAPHOST_CONFIG") {
            return Self::load(&PathBuf::from(path));
        }

        // Try common paths
        let paths = [
            PathBuf::from("reaphost.toml"),
            PathBuf::from("/etc/reaphost/reaphost.toml"),
            dirs::config_dir()
                .map(|p| p.join("reaphost/reaphost.toml"))
                .unwrap_or_default(),
        ];

        for path in paths {
            if path.exists() {
                return Self::load(&path);
            }
        }

        tracing::warn!("no config file found, using defaults");
        Ok(Config::default())
    }

    /// Apply environment-style overrides on top of the loaded file
    pub fn apply_overrides(
        &mut self,
        orchestrator_url: Option<String>,
        cloud_endpoint: Option<String>,
    ) {
        if let Some(url) = orchestrator_url {
            self.orchestrator.url = url;
        }
        if let Some(endpoint) = cloud_endpoint {
            self.cloud.endpoint = endpoint;
        }
    }
}

/// Orchestrator API credentials, read from the environment only
#[derive(Debug, Clone)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

impl Credentials {
    /// Read credentials from `REAPHOST_ACCESS_KEY` / `REAPHOST_SECRET_KEY`
    ///
    /// # Errors
    /// Returns an error naming the missing variable.
    pub fn from_env() -> eyre::Result<Self> {
        let access_key = std::env::var("REAPHOST_ACCESS_KEY")
            .map_err(|_| eyre::eyre!("REAPHOST_ACCESS_KEY is not set"))?;
        let secret_key = std::env::var("REAPHOST_SECRET_KEY")
            .map_err(|_| eyre::eyre!("REAPHOST_SECRET_KEY is not set"))?;
        Ok(Self {
            access_key,
            secret_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_load_full_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [orchestrator]
            url = "https://orchestrator.example.test/v1"

            [cloud]
            endpoint = "https://compute.{{region}}.example.test"

            [reaper]
            interval_secs = 60
            dry_run = true
            "#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.orchestrator.url, "https://orchestrator.example.test/v1");
        assert_eq!(config.cloud.endpoint, "https://compute.{region}.example.test");
        assert_eq!(config.reaper.interval_secs, 60);
        assert!(config.reaper.dry_run);
        // Unset reaper fields keep their defaults.
        assert_eq!(config.reaper.page_size, 100);
    }

    #[test]
    fn test_defaults_when_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.orchestrator.url.is_empty());
        assert!(config.cloud.endpoint.is_empty());
        assert_eq!(config.reaper.interval_secs, 30);
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config: Config = toml::from_str(
            r#"
            [orchestrator]
            url = "https://from-file.example.test/v1"
            "#,
        )
        .unwrap();

        config.apply_overrides(
            Some("https://from-env.example.test/v1".to_string()),
            Some("https://compute.{region}.env.test".to_string()),
        );
        assert_eq!(config.orchestrator.url, "https://from-env.example.test/v1");
        assert_eq!(config.cloud.endpoint, "https://compute.{region}.env.test");

        config.apply_overrides(None, None);
        assert_eq!(config.orchestrator.url, "https://from-env.example.test/v1");
    }
}
