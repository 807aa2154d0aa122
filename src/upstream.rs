use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::header::HeaderMap;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::debug;

use crate::error::UpstreamError;
use crate::http_cache::ResponseCache;
use crate::http_client::http_client;

/// Markers of an anti-bot or error page served where JSON was expected.
const BLOCK_MARKERS: &[&str] = &["<!DOCTYPE", "<html", "Access Denied"];

/// Cached JSON GETs against one provider's base URL.
pub struct UpstreamClient {
    provider: &'static str,
    base_url: String,
    timeout: Duration,
    client: Client,
    cache: Arc<ResponseCache>,
}

impl UpstreamClient {
    pub fn new(
        provider: &'static str,
        base_url: &str,
        timeout: Duration,
        headers: HeaderMap,
        cache: Arc<ResponseCache>,
    ) -> Result<Self> {
        Ok(Self {
            provider,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            client: http_client(timeout, headers)?,
            cache,
        })
    }

    pub fn url_for(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Url, UpstreamError> {
        let raw = format!("{}{}", self.base_url, endpoint);
        Url::parse_with_params(&raw, params.iter().map(|(k, v)| (*k, v.as_str())))
            .map_err(|err| UpstreamError::Url(format!("{raw}: {err}")))
    }

    pub async fn fetch_resource(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Value, UpstreamError> {
        let url = self.url_for(endpoint, params)?;
        let key = url.as_str().to_string();
        if let Some(hit) = self.cache.get(&key) {
            debug!(provider = self.provider, url = %key, "cache hit");
            return Ok(hit);
        }

        debug!(provider = self.provider, url = %key, "fetching");
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(UpstreamError::Http {
                provider: self.provider,
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }
        let body = resp.text().await.map_err(|err| self.transport_error(err))?;
        let data = parse_json_body(self.provider, &body)?;
        self.cache.insert(&key, data.clone());
        Ok(data)
    }

    fn transport_error(&self, err: reqwest::Error) -> UpstreamError {
        if err.is_timeout() {
            UpstreamError::Timeout {
                provider: self.provider,
                secs: self.timeout.as_secs(),
            }
        } else {
            UpstreamError::Transport {
                provider: self.provider,
                source: err,
            }
        }
    }
}

pub fn is_blocked_body(body: &str) -> bool {
    BLOCK_MARKERS.iter().any(|marker| body.contains(marker))
}

/// Turns a successful response body into JSON. A body that fails to parse
/// and carries a block marker is reported as blocked.
pub fn parse_json_body(provider: &'static str, body: &str) -> Result<Value, UpstreamError> {
    serde_json::from_str(body.trim()).map_err(|source| {
        if is_blocked_body(body) {
            UpstreamError::Blocked { provider }
        } else {
            UpstreamError::InvalidJson { provider, source }
        }
    })
}
