use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{Actor, DEFAULT_ACTOR_NAME};

/// User settings read at start-up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name recorded on activity entries
    pub actor_name: String,
    /// Optional avatar URL recorded on activity entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_avatar: Option<String>,
    /// Start from the built-in sample projects instead of an empty store
    pub seed_data: bool,
    /// Default log filter when RUST_LOG is not set
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            actor_name: DEFAULT_ACTOR_NAME.to_string(),
            actor_avatar: None,
            seed_data: true,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Loads the configuration from the provided path
    ///
    /// A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Save the configuration to the specified path
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(&self)?;

        // Ensure parent directories exist
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config to {:?}", path.as_ref()))?;

        Ok(())
    }

    pub fn actor(&self) -> Actor {
        Actor {
            name: self.actor_name.clone(),
            avatar: self.actor_avatar.clone(),
        }
    }
}

/// Gets the path to the config file
pub fn get_config_path() -> Result<PathBuf> {
    // Check if REQTRACK_CONFIG environment variable is set
    if let Ok(path) = std::env::var("REQTRACK_CONFIG") {
        return Ok(PathBuf::from(path));
    }

    // Default to ~/.reqtrack.yaml
    let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

    Ok(home_dir.join(".reqtrack.yaml"))
}
