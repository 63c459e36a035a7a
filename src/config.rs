use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub voice: VoiceConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file holding the id → call record mapping
    pub responses_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Base URL of the voice provider's credential-issuance API
    pub api_base_url: String,
    pub api_key: Option<String>,
    pub secret_key: Option<String>,
    /// Lines spoken during a simulated call, alternating assistant/user
    pub simulated_script: Vec<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "call-desk".to_string(),
            http: HttpConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            responses_path: PathBuf::from("data/call-responses.json"),
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.hume.ai".to_string(),
            api_key: None,
            secret_key: None,
            simulated_script: vec![
                "Hello, this is the call desk. Do you have a moment?".to_string(),
                "Sure, go ahead.".to_string(),
                "Thanks, we'll follow up by email.".to_string(),
            ],
        }
    }
}

impl Config {
    /// Load configuration from `path` (any extension the `config` crate
    /// understands; the file is optional), then apply `CALL_DESK__*`
    /// environment overrides and the provider secrets.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("CALL_DESK").separator("__"))
            .build()
            .with_context(|| format!("Failed to load config from {}", path))?;

        let mut cfg: Config = settings
            .try_deserialize()
            .context("Invalid configuration")?;

        if let Ok(key) = std::env::var("HUME_API_KEY") {
            cfg.voice.api_key = Some(key);
        }
        if let Ok(secret) = std::env::var("HUME_SECRET_KEY") {
            cfg.voice.secret_key = Some(secret);
        }

        Ok(cfg)
    }

    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.service.http.bind, self.service.http.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let cfg = Config::load("/nonexistent/call-desk").unwrap();
        assert_eq!(cfg.service.name, "call-desk");
        assert_eq!(cfg.http_addr(), "127.0.0.1:3000");
        assert_eq!(
            cfg.storage.responses_path,
            PathBuf::from("data/call-responses.json")
        );
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("call-desk.toml");
        std::fs::write(&path, "[service.http]\nport = 8080\n").unwrap();

        let base = path.with_extension("");
        let cfg = Config::load(base.to_str().unwrap()).unwrap();
        assert_eq!(cfg.service.http.port, 8080);
        assert_eq!(cfg.service.http.bind, "127.0.0.1");
        assert_eq!(cfg.voice.api_base_url, "https://api.hume.ai");
    }
}
