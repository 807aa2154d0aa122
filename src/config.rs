use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};

use crate::community_fetch::COMMUNITY_API_BASE;
use crate::http_cache::DEFAULT_CACHE_TTL;
use crate::http_client::REQUEST_TIMEOUT_SECS;
use crate::official_fetch::OFFICIAL_API_BASE;
use crate::provider::ProviderKind;

#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderKind,
    /// Platform label (`ps5`, `pc`, ...) or raw platform code for the official API.
    pub platform: String,
    pub bind_addr: SocketAddr,
    pub club_database_path: PathBuf,
    pub official_api_base: String,
    pub community_api_base: String,
    pub cache_ttl: Duration,
    pub request_timeout: Duration,
}

impl Config {
    /// Reads `.env.local` / `.env` first if present, then the process environment.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let provider = match get("PROVIDER") {
            Some(raw) => raw.parse::<ProviderKind>().map_err(|err| anyhow!(err))?,
            None => ProviderKind::Community,
        };
        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| "127.0.0.1:3000".to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be host:port")?;
        let cache_ttl = get("CACHE_TTL_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_CACHE_TTL);
        let request_timeout = get("REQUEST_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(REQUEST_TIMEOUT_SECS)
            .max(1);

        Ok(Self {
            provider,
            platform: get("PLATFORM").unwrap_or_else(|| "ps5".to_string()),
            bind_addr,
            club_database_path: get("CLUB_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/clubs-database.json")),
            official_api_base: get("OFFICIAL_API_BASE")
                .unwrap_or_else(|| OFFICIAL_API_BASE.to_string()),
            community_api_base: get("COMMUNITY_API_BASE")
                .unwrap_or_else(|| COMMUNITY_API_BASE.to_string()),
            cache_ttl,
            request_timeout: Duration::from_secs(request_timeout),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::Config;
    use crate::provider::ProviderKind;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = config_from(&[]).expect("defaults are valid");
        assert_eq!(cfg.provider, ProviderKind::Community);
        assert_eq!(cfg.platform, "ps5");
        assert_eq!(cfg.cache_ttl, Duration::from_secs(300));
        assert_eq!(cfg.request_timeout, Duration::from_secs(15));
        assert_eq!(cfg.bind_addr.port(), 3000);
    }

    #[test]
    fn overrides_and_bad_numbers() {
        let cfg = config_from(&[
            ("PROVIDER", "official"),
            ("CACHE_TTL_SECS", "abc"),
            ("REQUEST_TIMEOUT_SECS", "5"),
            ("BIND_ADDR", "0.0.0.0:8080"),
        ])
        .expect("valid config");
        assert_eq!(cfg.provider, ProviderKind::Official);
        assert_eq!(cfg.cache_ttl, Duration::from_secs(300));
        assert_eq!(cfg.request_timeout, Duration::from_secs(5));
        assert_eq!(cfg.bind_addr.port(), 8080);
    }

    #[test]
    fn unknown_provider_is_an_error() {
        assert!(config_from(&[("PROVIDER", "espn")]).is_err());
        assert!(config_from(&[("BIND_ADDR", "nope")]).is_err());
    }
}
