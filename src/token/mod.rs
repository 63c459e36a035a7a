//! Access-token issuance for browser clients of the voice provider
//!
//! Secrets stay on the server; clients only ever see the short-lived token.

mod hume;

pub use hume::HumeTokenIssuer;

use anyhow::Result;

/// Source of voice-provider access tokens
#[async_trait::async_trait]
pub trait TokenIssuer: Send + Sync {
    async fn fetch_access_token(&self) -> Result<String>;
}
