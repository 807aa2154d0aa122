pub mod aggregate;
pub mod community_fetch;
pub mod config;
pub mod directory;
pub mod error;
pub mod fields;
pub mod http_cache;
pub mod http_client;
pub mod model;
pub mod normalize;
pub mod official_fetch;
pub mod provider;
pub mod routes;
pub mod service;
pub mod upstream;

use std::sync::Arc;

use anyhow::Result;

use crate::community_fetch::CommunityProvider;
use crate::config::Config;
use crate::directory::ClubDirectory;
use crate::http_cache::ResponseCache;
use crate::official_fetch::OfficialProvider;
use crate::provider::{ProviderKind, StatsProvider};
use crate::routes::AppState;

pub fn build_provider(config: &Config, cache: Arc<ResponseCache>) -> Result<Arc<dyn StatsProvider>> {
    let provider: Arc<dyn StatsProvider> = match config.provider {
        ProviderKind::Community => Arc::new(CommunityProvider::new(
            &config.community_api_base,
            config.request_timeout,
            cache,
        )?),
        ProviderKind::Official => Arc::new(OfficialProvider::new(
            &config.official_api_base,
            &config.platform,
            config.request_timeout,
            cache,
        )?),
    };
    Ok(provider)
}

pub fn build_state(config: &Config) -> Result<AppState> {
    let cache = Arc::new(ResponseCache::new(config.cache_ttl));
    Ok(AppState {
        provider: build_provider(config, cache)?,
        directory: Arc::new(ClubDirectory::load_or_empty(&config.club_database_path)),
    })
}
