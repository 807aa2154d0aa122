use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::debug;

use crate::aggregate::aggregate_players;
use crate::error::UpstreamError;
use crate::http_cache::ResponseCache;
use crate::model::{ClubInfo, Match, PlayerAggregate};
use crate::normalize::normalize_community_match;
use crate::provider::{MatchQuery, PLAYER_HISTORY_LIMIT, StatsProvider, sort_recent_first};
use crate::upstream::UpstreamClient;

pub const COMMUNITY_API_BASE: &str = "https://api.ourproclub.app/api";
const PROVIDER: &str = "community";

/// Community provider: only match history is available, everything else is
/// derived from it.
pub struct CommunityProvider {
    upstream: UpstreamClient,
}

impl CommunityProvider {
    pub fn new(base_url: &str, timeout: Duration, cache: Arc<ResponseCache>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(Self {
            upstream: UpstreamClient::new(PROVIDER, base_url, timeout, headers, cache)?,
        })
    }

    pub async fn fetch_match_history(
        &self,
        club_id: &str,
        limit: usize,
    ) -> Result<Vec<Value>, UpstreamError> {
        let data = self
            .upstream
            .fetch_resource(
                "/match/history",
                &[("clubId", club_id.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        Ok(history_records(data))
    }
}

/// The history endpoint answers with a bare array; a `{ "matches": [...] }`
/// wrapper is tolerated.
pub fn history_records(data: Value) -> Vec<Value> {
    match data {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("matches") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

#[async_trait]
impl StatsProvider for CommunityProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    /// Named after the club's side of its most recent match.
    async fn club_info(&self, club_id: &str) -> Result<Option<ClubInfo>, UpstreamError> {
        let records = self.fetch_match_history(club_id, 1).await?;
        Ok(records.first().map(|raw| ClubInfo {
            club_id: club_id.to_string(),
            name: normalize_community_match(raw, club_id).club_name,
        }))
    }

    async fn matches(&self, club_id: &str, query: &MatchQuery) -> Result<Vec<Match>, UpstreamError> {
        let records = self.fetch_match_history(club_id, query.limit).await?;
        let mut matches: Vec<Match> = records
            .iter()
            .map(|raw| normalize_community_match(raw, club_id))
            .filter(|m| query.match_type.as_ref().is_none_or(|t| m.match_type == *t))
            .collect();
        sort_recent_first(&mut matches);
        matches.truncate(query.limit);
        debug!(club_id, count = matches.len(), "community matches normalized");
        Ok(matches)
    }

    async fn players(
        &self,
        club_id: &str,
        limit: usize,
    ) -> Result<Vec<PlayerAggregate>, UpstreamError> {
        let matches = self
            .matches(club_id, &MatchQuery::recent(PLAYER_HISTORY_LIMIT))
            .await?;
        let mut players = aggregate_players(&matches);
        players.truncate(limit);
        Ok(players)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::history_records;

    #[test]
    fn history_accepts_bare_and_wrapped_arrays() {
        assert_eq!(history_records(json!([{"id": 1}])).len(), 1);
        assert_eq!(history_records(json!({"matches": [{"id": 1}, {"id": 2}]})).len(), 2);
        assert!(history_records(json!({"error": "nope"})).is_empty());
        assert!(history_records(json!(null)).is_empty());
    }
}
