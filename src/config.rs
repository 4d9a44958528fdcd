use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the model artifacts; defaults to the executable's directory
    #[serde(default)]
    pub model_dir: Option<PathBuf>,

    /// Serialized classifier file name
    #[serde(default = "default_model_file")]
    pub model_file: String,

    /// Feature-name metadata file name
    #[serde(default = "default_features_file")]
    pub features_file: String,

    /// Tracing filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_model_file() -> String {
    "job_recommendation_model.json".to_string()
}

fn default_features_file() -> String {
    "model_features.json".to_string()
}

fn default_log_filter() -> String {
    "job_match_api=info,tower_http=info".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Directory the artifacts are read from
    pub fn artifact_dir(&self) -> anyhow::Result<PathBuf> {
        if let Some(dir) = &self.model_dir {
            return Ok(dir.clone());
        }

        let exe = std::env::current_exe()
            .map_err(|e| anyhow::anyhow!("Failed to locate executable: {}", e))?;
        exe.parent()
            .map(PathBuf::from)
            .ok_or_else(|| anyhow::anyhow!("Executable has no parent directory"))
    }

    pub fn model_path(&self) -> anyhow::Result<PathBuf> {
        Ok(self.artifact_dir()?.join(&self.model_file))
    }

    pub fn features_path(&self) -> anyhow::Result<PathBuf> {
        Ok(self.artifact_dir()?.join(&self.features_file))
    }
}
