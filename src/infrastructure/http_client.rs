// JSON-over-HTTP client shared by the remote panel sources
use crate::domain::error::PanelError;
use anyhow::Context;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Thin wrapper around `reqwest::Client` with a fixed timeout and the
/// provider error mapping every remote panel shares.
#[derive(Debug, Clone)]
pub struct JsonClient {
    client: reqwest::Client,
}

impl JsonClient {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }

    /// GET `url` and decode the body as `T`.
    ///
    /// `log_path` is what gets logged instead of the URL, since some
    /// providers take credentials in the query string.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        provider: &'static str,
        url: &str,
        log_path: &str,
    ) -> Result<T, PanelError> {
        tracing::debug!(provider, path = log_path, "fetching");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| transport(provider, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PanelError::Status {
                provider,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| transport(provider, e))?;
        serde_json::from_str(&body).map_err(|e| PanelError::parse(provider, e.to_string()))
    }
}

fn transport(provider: &'static str, error: reqwest::Error) -> PanelError {
    let detail = if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        "connection failed".to_string()
    } else {
        error.without_url().to_string()
    };
    PanelError::Transport { provider, detail }
}
