use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tabgate_facade::FacadeConfig;

pub const LOG_ENV: &str = "TABGATE_LOG";
pub const MANIFEST_ENV: &str = "TABGATE_MANIFEST";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Extension manifest declaring the optional capabilities. Relative paths
    /// resolve against the config file's directory.
    pub manifest: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub facade: FacadeConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        if content.trim().is_empty() {
            anyhow::bail!("Config file is empty: {}", path.display());
        }

        let mut config: AppConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        if config.manifest.is_relative() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            config.manifest = base.join(&config.manifest);
        }

        config
            .facade
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid facade config: {}", e))?;

        Ok(config)
    }

    /// Environment overrides win over the file.
    pub fn log_filter(&self) -> String {
        std::env::var(LOG_ENV).unwrap_or_else(|_| self.log_level.clone())
    }

    pub fn manifest_path(&self) -> PathBuf {
        std::env::var(MANIFEST_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| self.manifest.clone())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
