use std::str::FromStr;

use async_trait::async_trait;

use crate::error::UpstreamError;
use crate::model::{
    ClubDirectoryEntry, ClubInfo, ClubRecord, Match, MatchType, PlayerAggregate, SeasonRecord,
};

/// Matches scanned when a provider has to derive player careers from history.
pub const PLAYER_HISTORY_LIMIT: usize = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct MatchQuery {
    pub limit: usize,
    pub match_type: Option<MatchType>,
}

impl MatchQuery {
    pub fn recent(limit: usize) -> Self {
        Self {
            limit,
            match_type: None,
        }
    }
}

/// One upstream stats source, reshaped into the canonical model.
///
/// `matches` returns at most `limit` matches, most recent first.
#[async_trait]
pub trait StatsProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn club_info(&self, club_id: &str) -> Result<Option<ClubInfo>, UpstreamError>;

    async fn matches(&self, club_id: &str, query: &MatchQuery) -> Result<Vec<Match>, UpstreamError>;

    /// At most `limit` players, most appearances first.
    async fn players(&self, club_id: &str, limit: usize)
        -> Result<Vec<PlayerAggregate>, UpstreamError>;

    /// Provider-side all-time record, for providers that keep one.
    async fn club_record(&self, _club_id: &str) -> Result<Option<ClubRecord>, UpstreamError> {
        Ok(None)
    }

    async fn season_record(&self, _club_id: &str) -> Result<Option<SeasonRecord>, UpstreamError> {
        Ok(None)
    }

    /// Name search against the provider itself, when it offers one.
    async fn search_clubs(&self, _query: &str) -> Result<Vec<ClubDirectoryEntry>, UpstreamError> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Community,
    Official,
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "community" | "ourproclub" | "opc" => Ok(ProviderKind::Community),
            "official" | "ea" => Ok(ProviderKind::Official),
            other => Err(format!("unknown provider '{other}'")),
        }
    }
}

/// Most recent first; matches without a timestamp sink to the end.
pub fn sort_recent_first(matches: &mut [Match]) {
    matches.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}
