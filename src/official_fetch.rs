use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use futures::future::join_all;
use once_cell::sync::Lazy;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderName, HeaderValue, ORIGIN, REFERER, USER_AGENT,
};
use serde_json::Value;
use tracing::warn;

use crate::aggregate::finish_player;
use crate::error::UpstreamError;
use crate::fields::{f64_field, pick_string, u32_field};
use crate::http_cache::ResponseCache;
use crate::model::{
    ClubDirectoryEntry, ClubInfo, ClubRecord, Match, MatchType, PlayerAggregate, SeasonRecord,
};
use crate::normalize::normalize_official_match;
use crate::provider::{MatchQuery, StatsProvider, sort_recent_first};
use crate::upstream::UpstreamClient;

pub const OFFICIAL_API_BASE: &str = "https://proclubs.ea.com/api/fc";
const PROVIDER: &str = "official";

/// Platform labels accepted from callers and the code the API expects.
pub const PLATFORMS: &[(&str, &str, &str)] = &[
    ("ps5", "common-gen5", "PlayStation 5"),
    ("xbox-series", "common-gen5", "Xbox Series X|S"),
    ("pc", "common-gen5", "PC"),
    ("ps4", "ps4", "PlayStation 4"),
    ("xbox-one", "xboxone", "Xbox One"),
];

/// Without a browser-like header set the API answers with an HTML block page.
static BROWSER_HEADERS: Lazy<HeaderMap> = Lazy::new(|| {
    let mut h = HeaderMap::new();
    h.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
    h.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    h.insert(ORIGIN, HeaderValue::from_static("https://www.ea.com"));
    h.insert(REFERER, HeaderValue::from_static("https://www.ea.com/"));
    let sec: [(&str, &str); 6] = [
        (
            "sec-ch-ua",
            "\"Not_A Brand\";v=\"8\", \"Chromium\";v=\"120\", \"Google Chrome\";v=\"120\"",
        ),
        ("sec-ch-ua-mobile", "?0"),
        ("sec-ch-ua-platform", "\"Windows\""),
        ("sec-fetch-dest", "empty"),
        ("sec-fetch-mode", "cors"),
        ("sec-fetch-site", "same-site"),
    ];
    for (name, value) in sec {
        h.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    h.insert(
        USER_AGENT,
        HeaderValue::from_static(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        ),
    );
    h
});

/// Match types fetched when the caller does not filter.
const DEFAULT_MATCH_TYPES: [MatchType; 2] = [MatchType::League, MatchType::Playoff];

pub fn platform_code(platform: &str) -> &str {
    PLATFORMS
        .iter()
        .find(|(label, _, _)| *label == platform)
        .map(|(_, code, _)| *code)
        .unwrap_or(platform)
}

pub fn platform_label(platform: &str) -> Option<&'static str> {
    PLATFORMS
        .iter()
        .find(|(label, _, _)| *label == platform)
        .map(|(_, _, name)| *name)
}

pub struct OfficialProvider {
    upstream: UpstreamClient,
    platform: String,
}

impl OfficialProvider {
    pub fn new(
        base_url: &str,
        platform: &str,
        timeout: Duration,
        cache: Arc<ResponseCache>,
    ) -> Result<Self> {
        Ok(Self {
            upstream: UpstreamClient::new(
                PROVIDER,
                base_url,
                timeout,
                BROWSER_HEADERS.clone(),
                cache,
            )?,
            platform: platform_code(platform).to_string(),
        })
    }

    async fn fetch_keyed(&self, endpoint: &str, club_id: &str) -> Result<Value, UpstreamError> {
        let data = self
            .upstream
            .fetch_resource(
                endpoint,
                &[
                    ("clubIds", club_id.to_string()),
                    ("platform", self.platform.clone()),
                ],
            )
            .await?;
        Ok(data.get(club_id).cloned().unwrap_or(Value::Null))
    }

    async fn matches_of_type(
        &self,
        club_id: &str,
        match_type: &MatchType,
    ) -> Result<Vec<Match>, UpstreamError> {
        let data = self
            .upstream
            .fetch_resource(
                "/clubs/matches",
                &[
                    ("clubIds", club_id.to_string()),
                    ("platform", self.platform.clone()),
                    ("matchType", match_type.code().to_string()),
                ],
            )
            .await?;
        let records = match data {
            Value::Array(items) => items,
            other => match other.get(club_id) {
                Some(Value::Array(items)) => items.clone(),
                _ => Vec::new(),
            },
        };
        Ok(records
            .iter()
            .map(|raw| normalize_official_match(raw, club_id, Some(match_type)))
            .collect())
    }
}

/// One member line from `/members/stats`. The endpoint already reports
/// career rates, so they are taken as-is rather than recomputed.
pub fn member_to_player(raw: &Value) -> PlayerAggregate {
    let matches = u32_field(raw, "gamesPlayed");
    let avg_rating = f64_field(raw, "ratingAve");
    let mut p = finish_player(PlayerAggregate {
        name: pick_string(raw, &["name", "proName"]).unwrap_or_default(),
        position: pick_string(raw, &["favoritePosition", "proPos"]).unwrap_or_default(),
        matches,
        goals: u32_field(raw, "goals"),
        assists: u32_field(raw, "assists"),
        shots: u32_field(raw, "shots"),
        saves: u32_field(raw, "saves"),
        passes_made: u32_field(raw, "passesMade"),
        tackles_made: u32_field(raw, "tacklesMade"),
        red_cards: u32_field(raw, "redCards"),
        man_of_the_match: u32_field(raw, "manOfTheMatch"),
        clean_sheets: u32_field(raw, "cleanSheetsGK").saturating_add(u32_field(raw, "cleanSheetsDef")),
        total_rating: avg_rating * f64::from(matches),
        ..PlayerAggregate::default()
    });
    p.avg_rating = avg_rating;
    p.pass_accuracy = u32_field(raw, "passSuccessRate");
    p.tackle_success = u32_field(raw, "tackleSuccessRate");
    p
}

/// `/clubs/stats` entry for one club; `None` when the club is not in the answer.
pub fn club_record_from_value(raw: &Value) -> Option<ClubRecord> {
    raw.as_object()?;
    Some(ClubRecord {
        games_played: u32_field(raw, "gamesPlayed"),
        wins: u32_field(raw, "wins"),
        draws: u32_field(raw, "ties"),
        losses: u32_field(raw, "losses"),
        goals_for: u32_field(raw, "goals"),
        goals_against: u32_field(raw, "goalsAgainst"),
        skill_rating: u32_field(raw, "skillRating"),
    })
}

/// `/clubs/seasonalStats` entry for one club.
pub fn season_record_from_value(raw: &Value) -> Option<SeasonRecord> {
    raw.as_object()?;
    Some(SeasonRecord {
        wins: u32_field(raw, "wins"),
        draws: u32_field(raw, "ties"),
        losses: u32_field(raw, "losses"),
        points: u32_field(raw, "points"),
        current_division: u32_field(raw, "currentDivision"),
        best_division: u32_field(raw, "bestDivision"),
        seasons: u32_field(raw, "seasons"),
        titles_won: u32_field(raw, "titlesWon"),
    })
}

#[async_trait]
impl StatsProvider for OfficialProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn club_info(&self, club_id: &str) -> Result<Option<ClubInfo>, UpstreamError> {
        let info = self.fetch_keyed("/clubs/info", club_id).await?;
        Ok(pick_string(&info, &["name"]).map(|name| ClubInfo {
            club_id: club_id.to_string(),
            name,
        }))
    }

    async fn club_record(&self, club_id: &str) -> Result<Option<ClubRecord>, UpstreamError> {
        let raw = self.fetch_keyed("/clubs/stats", club_id).await?;
        Ok(club_record_from_value(&raw))
    }

    async fn season_record(&self, club_id: &str) -> Result<Option<SeasonRecord>, UpstreamError> {
        let raw = self.fetch_keyed("/clubs/seasonalStats", club_id).await?;
        Ok(season_record_from_value(&raw))
    }

    async fn matches(&self, club_id: &str, query: &MatchQuery) -> Result<Vec<Match>, UpstreamError> {
        let types: Vec<MatchType> = match &query.match_type {
            Some(t) => vec![t.clone()],
            None => DEFAULT_MATCH_TYPES.to_vec(),
        };
        let results = join_all(types.iter().map(|t| self.matches_of_type(club_id, t))).await;

        let mut matches = Vec::new();
        let mut first_err = None;
        let mut any_ok = false;
        for (t, res) in types.iter().zip(results) {
            match res {
                Ok(mut batch) => {
                    any_ok = true;
                    matches.append(&mut batch);
                }
                Err(err) => {
                    warn!(club_id, match_type = %t, error = %err, "official matches fetch failed");
                    first_err.get_or_insert(err);
                }
            }
        }
        if let (false, Some(err)) = (any_ok, first_err) {
            return Err(err);
        }
        sort_recent_first(&mut matches);
        matches.truncate(query.limit);
        Ok(matches)
    }

    async fn players(
        &self,
        club_id: &str,
        limit: usize,
    ) -> Result<Vec<PlayerAggregate>, UpstreamError> {
        let data = self
            .upstream
            .fetch_resource(
                "/members/stats",
                &[
                    ("clubId", club_id.to_string()),
                    ("platform", self.platform.clone()),
                ],
            )
            .await?;
        let mut players: Vec<PlayerAggregate> = data
            .get("members")
            .and_then(Value::as_array)
            .map(|members| members.iter().map(member_to_player).collect())
            .unwrap_or_default();
        players.sort_by(|a, b| {
            b.matches
                .cmp(&a.matches)
                .then_with(|| b.avg_rating.total_cmp(&a.avg_rating))
        });
        players.truncate(limit);
        Ok(players)
    }

    async fn search_clubs(&self, query: &str) -> Result<Vec<ClubDirectoryEntry>, UpstreamError> {
        let data = self
            .upstream
            .fetch_resource(
                "/clubs/search",
                &[
                    ("clubName", query.to_string()),
                    ("platform", self.platform.clone()),
                ],
            )
            .await?;
        Ok(search_entries(&data))
    }
}

pub fn search_entries(data: &Value) -> Vec<ClubDirectoryEntry> {
    let Some(items) = data.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let id = pick_string(item, &["clubId", "id"])?;
            let name = item
                .get("clubInfo")
                .and_then(|info| pick_string(info, &["name"]))
                .or_else(|| pick_string(item, &["clubName", "name"]))
                .unwrap_or_default();
            Some(ClubDirectoryEntry { id, name })
        })
        .collect()
}
