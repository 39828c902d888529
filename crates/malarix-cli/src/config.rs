//! Configuration loading for Malarix.
//! Reads malarix.toml from the current directory or path in MALARIX_CONFIG env var.

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    #[serde(default = "default_models_dir")]
    pub dir: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self { dir: default_models_dir() }
    }
}

fn default_models_dir() -> String { "./models".to_string() }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_generator_script")]
    pub script: String,
    #[serde(default = "default_generator_timeout")]
    pub timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            script: default_generator_script(),
            timeout_secs: default_generator_timeout(),
        }
    }
}

fn default_generator_script()  -> String { "./padel.sh".to_string() }
fn default_generator_timeout() -> u64 { 300 }

impl Config {
    /// Load configuration from malarix.toml.
    /// Checks MALARIX_CONFIG env var first, then current directory.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("MALARIX_CONFIG")
            .unwrap_or_else(|_| "malarix.toml".to_string());

        if !Path::new(&path).exists() {
            anyhow::bail!(
                "Config file not found: {}\n\
                 Copy malarix.example.toml to malarix.toml and edit it.",
                path
            );
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
