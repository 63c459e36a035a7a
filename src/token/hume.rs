use super::TokenIssuer;
use crate::config::VoiceConfig;
use anyhow::{Context, Result};
use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Client-credentials token exchange against the Hume API
pub struct HumeTokenIssuer {
    client: Client,
    base_url: String,
    api_key: String,
    secret_key: String,
}

impl HumeTokenIssuer {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            secret_key: secret_key.into(),
        }
    }

    pub fn from_config(cfg: &VoiceConfig) -> Result<Self> {
        let api_key = cfg
            .api_key
            .clone()
            .context("HUME_API_KEY is not set")?;
        let secret_key = cfg
            .secret_key
            .clone()
            .context("HUME_SECRET_KEY is not set")?;

        Ok(Self::new(cfg.api_base_url.clone(), api_key, secret_key))
    }

    fn token_url(&self) -> String {
        format!("{}/oauth2-cc/token", self.base_url.trim_end_matches('/'))
    }

    fn basic_auth(&self) -> String {
        let credentials = format!("{}:{}", self.api_key, self.secret_key);
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(credentials)
        )
    }
}

#[async_trait::async_trait]
impl TokenIssuer for HumeTokenIssuer {
    async fn fetch_access_token(&self) -> Result<String> {
        let url = self.token_url();
        info!("Requesting access token from {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.basic_auth())
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .context("Token request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Token endpoint returned {}: {}", status, body);
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("Failed to parse token response")?;

        if token.access_token.is_empty() {
            anyhow::bail!("Token endpoint returned an empty token");
        }

        Ok(token.access_token)
    }
}
