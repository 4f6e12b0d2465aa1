//! Configuration loading and cache directory selection

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use course_model::{ArtifactFormat, ArtifactSources};
use serde::{Deserialize, Serialize};

/// Cache directory used when running on Vercel, where only /tmp is writable
const SERVERLESS_CACHE_DIR: &str = "/tmp/models";

/// Cache directory used everywhere else, relative to the working directory
const LOCAL_CACHE_DIR: &str = "models";

/// Main configuration for the recommender service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Remote URLs of the model artifacts
    #[serde(default)]
    pub artifacts: ArtifactSources,

    /// Encoding of the artifact files
    #[serde(default)]
    pub format: ArtifactFormat,

    /// Where artifacts are cached (environment-dependent when unset)
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a JSON file, falling back to defaults when the
    /// file does not exist.
    pub fn load(config_file: &Path) -> Result<Self> {
        if config_file.exists() {
            let content = std::fs::read_to_string(config_file)
                .with_context(|| format!("Failed to read config file: {:?}", config_file))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {:?}", config_file))?;
            tracing::info!("Loaded configuration from {:?}", config_file);
            Ok(config)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults (artifacts must already be cached)",
                config_file
            );
            Ok(Config::default())
        }
    }

    /// Pick the cache directory: explicit override, then the config file,
    /// then the environment default.
    pub fn cache_dir(&self, override_dir: Option<&Path>) -> PathBuf {
        select_cache_dir(override_dir, self.cache_dir.as_deref(), on_vercel())
    }
}

fn on_vercel() -> bool {
    std::env::var("VERCEL").as_deref() == Ok("1")
}

fn select_cache_dir(override_dir: Option<&Path>, configured: Option<&Path>, serverless: bool) -> PathBuf {
    if let Some(dir) = override_dir.or(configured) {
        return dir.to_path_buf();
    }
    if serverless {
        PathBuf::from(SERVERLESS_CACHE_DIR)
    } else {
        PathBuf::from(LOCAL_CACHE_DIR)
    }
}
