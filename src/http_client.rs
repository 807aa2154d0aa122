use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use reqwest::header::HeaderMap;

pub const REQUEST_TIMEOUT_SECS: u64 = 15;

pub fn http_client(timeout: Duration, default_headers: HeaderMap) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .default_headers(default_headers)
        .build()
        .context("failed to build http client")
}
