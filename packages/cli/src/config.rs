use serde::{Deserialize, Serialize};
use sigen_generator::GeneratorSettings;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "sigen.config.json";

/// sigen configuration file format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory scanned for .cs files
    #[serde(default = "default_src_dir")]
    pub src_dir: String,

    /// Naming options, stored inline (`classPrefix`, `filenameSuffix`, `baseClass`)
    #[serde(flatten)]
    pub generator: GeneratorSettings,
}

fn default_src_dir() -> String {
    ".".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Invalid {}: {}", DEFAULT_CONFIG_NAME, e))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Get absolute path to source directory
    pub fn get_src_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.src_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            src_dir: default_src_dir(),
            generator: GeneratorSettings::default(),
        }
    }
}
