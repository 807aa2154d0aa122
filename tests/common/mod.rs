#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::Router;

use proclubs_dashboard::aggregate::aggregate_players;
use proclubs_dashboard::error::UpstreamError;
use proclubs_dashboard::http_cache::Clock;
use proclubs_dashboard::model::{
    ClubDirectoryEntry, ClubInfo, ClubRecord, Match, PlayerAggregate, SeasonRecord,
};
use proclubs_dashboard::normalize::normalize_community_match;
use proclubs_dashboard::provider::{MatchQuery, StatsProvider};

pub fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

pub fn read_fixture(name: &str) -> String {
    fs::read_to_string(fixture_path(name)).expect("fixture file should be readable")
}

pub fn fixture_json(name: &str) -> serde_json::Value {
    serde_json::from_str(&read_fixture(name)).expect("fixture should be valid json")
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn serve_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub server");
    let addr = listener.local_addr().expect("stub server address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub server");
    });
    format!("http://{addr}")
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap()
    }
}

pub fn fixture_matches(club_id: &str) -> Vec<Match> {
    fixture_json("community_history.json")
        .as_array()
        .expect("array fixture")
        .iter()
        .map(|m| normalize_community_match(m, club_id))
        .collect()
}

/// Which slices of the provider should fail.
#[derive(Debug, Default, Clone, Copy)]
pub struct Failures {
    pub matches: bool,
    pub players: bool,
    pub info: bool,
    pub records: bool,
}

/// In-memory provider serving the community fixture for club 100.
pub struct FixtureProvider {
    pub matches: Vec<Match>,
    pub fail: Failures,
    pub match_calls: AtomicUsize,
}

impl FixtureProvider {
    pub fn new(matches: Vec<Match>) -> Self {
        Self {
            matches,
            fail: Failures::default(),
            match_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(matches: Vec<Match>, fail: Failures) -> Self {
        Self {
            fail,
            ..Self::new(matches)
        }
    }
}

fn blocked() -> UpstreamError {
    UpstreamError::Blocked { provider: "fixture" }
}

#[async_trait]
impl StatsProvider for FixtureProvider {
    fn name(&self) -> &'static str {
        "fixture"
    }

    async fn club_info(&self, club_id: &str) -> Result<Option<ClubInfo>, UpstreamError> {
        if self.fail.info {
            return Err(blocked());
        }
        Ok((club_id == "100").then(|| ClubInfo {
            club_id: club_id.to_string(),
            name: "Night Owls (info)".to_string(),
        }))
    }

    async fn matches(&self, club_id: &str, query: &MatchQuery) -> Result<Vec<Match>, UpstreamError> {
        self.match_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.matches {
            return Err(blocked());
        }
        Ok(self
            .matches
            .iter()
            .filter(|m| m.club_id == club_id)
            .filter(|m| query.match_type.as_ref().is_none_or(|t| m.match_type == *t))
            .take(query.limit)
            .cloned()
            .collect())
    }

    async fn players(&self, club_id: &str, limit: usize) -> Result<Vec<PlayerAggregate>, UpstreamError> {
        if self.fail.players {
            return Err(blocked());
        }
        let matches = self.matches(club_id, &MatchQuery::recent(500)).await?;
        let mut players = aggregate_players(&matches);
        players.truncate(limit);
        Ok(players)
    }

    async fn club_record(&self, club_id: &str) -> Result<Option<ClubRecord>, UpstreamError> {
        if self.fail.records {
            return Err(blocked());
        }
        Ok((club_id == "100").then(|| ClubRecord {
            games_played: 120,
            wins: 70,
            draws: 20,
            losses: 30,
            goals_for: 250,
            goals_against: 140,
            skill_rating: 1850,
        }))
    }

    async fn season_record(&self, club_id: &str) -> Result<Option<SeasonRecord>, UpstreamError> {
        if self.fail.records {
            return Err(blocked());
        }
        Ok((club_id == "100").then(|| SeasonRecord {
            wins: 4,
            draws: 1,
            losses: 2,
            points: 13,
            current_division: 3,
            best_division: 1,
            seasons: 12,
            titles_won: 2,
        }))
    }

    async fn search_clubs(&self, query: &str) -> Result<Vec<ClubDirectoryEntry>, UpstreamError> {
        Ok(vec![ClubDirectoryEntry {
            id: "999".to_string(),
            name: format!("Remote {query}"),
        }])
    }
}
