use serde::Serialize;
use tracing::{info, warn};

use crate::aggregate::aggregate_club;
use crate::directory::ClubDirectory;
use crate::error::{NOT_FOUND_HINT, ServiceError};
use crate::model::{ClubAggregate, ClubRecord, Match, PlayerAggregate, SeasonRecord};
use crate::provider::{MatchQuery, StatsProvider};

pub const STATS_MATCH_LIMIT: usize = 500;
pub const RECENT_MATCH_LIMIT: usize = 50;
pub const MEMBER_LIMIT: usize = 500;
const UNKNOWN_CLUB: &str = "Unknown Club";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubHeader {
    pub club_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubDetail {
    pub info: ClubHeader,
    pub stats: Option<ClubAggregate>,
    /// Provider-reported all-time record, when the provider keeps one.
    pub provider_stats: Option<ClubRecord>,
    pub seasonal_stats: Option<SeasonRecord>,
    pub members: Vec<PlayerAggregate>,
    pub matches: Vec<Match>,
}

/// Fetches the club's stats, recent matches, players, info and provider
/// records concurrently.
///
/// Each slice degrades to empty on failure; the club is only reported missing
/// when neither stats nor matches came back.
pub async fn club_detail(
    provider: &dyn StatsProvider,
    directory: &ClubDirectory,
    club_id: &str,
) -> Result<ClubDetail, ServiceError> {
    let stats_query = MatchQuery::recent(STATS_MATCH_LIMIT);
    let recent_query = MatchQuery::recent(RECENT_MATCH_LIMIT);
    let (stats_matches, recent, players, info, record, season) = tokio::join!(
        provider.matches(club_id, &stats_query),
        provider.matches(club_id, &recent_query),
        provider.players(club_id, MEMBER_LIMIT),
        provider.club_info(club_id),
        provider.club_record(club_id),
        provider.season_record(club_id),
    );

    // Both match slices failing is an outage, not a missing club.
    let recent = match (&stats_matches, recent) {
        (Err(_), Err(err)) => {
            warn!(club_id, provider = provider.name(), error = %err, "club matches unavailable");
            return Err(ServiceError::Upstream(err));
        }
        (_, recent) => recent,
    };

    let stats = slice_or_default("stats", club_id, stats_matches)
        .filter(|m| !m.is_empty())
        .map(|m| aggregate_club(club_id, &m));
    let matches = slice_or_default("matches", club_id, recent).unwrap_or_default();
    let members = slice_or_default("players", club_id, players).unwrap_or_default();
    let info = slice_or_default("info", club_id, info).flatten();
    let provider_stats = slice_or_default("provider_stats", club_id, record).flatten();
    let seasonal_stats = slice_or_default("seasonal_stats", club_id, season).flatten();

    if stats.is_none() && matches.is_empty() {
        info!(club_id, provider = provider.name(), "no data for club");
        return Err(ServiceError::NotFound {
            hint: NOT_FOUND_HINT,
        });
    }

    let name = stats
        .as_ref()
        .map(|s| s.club_name.clone())
        .or_else(|| matches.first().map(|m| m.club_name.clone()))
        .or_else(|| info.map(|i| i.name))
        .or_else(|| directory.find(club_id).map(|c| c.name.clone()))
        .unwrap_or_else(|| UNKNOWN_CLUB.to_string());

    Ok(ClubDetail {
        info: ClubHeader {
            club_id: club_id.to_string(),
            name,
        },
        stats,
        provider_stats,
        seasonal_stats,
        members,
        matches,
    })
}

fn slice_or_default<T, E: std::fmt::Display>(
    slice: &'static str,
    club_id: &str,
    res: Result<T, E>,
) -> Option<T> {
    match res {
        Ok(v) => Some(v),
        Err(err) => {
            warn!(club_id, slice, error = %err, "upstream slice failed, degrading");
            None
        }
    }
}
