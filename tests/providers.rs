mod common;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::{Query, State};
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::{Value, json};
use tower::util::ServiceExt;

use proclubs_dashboard::community_fetch::CommunityProvider;
use proclubs_dashboard::directory::ClubDirectory;
use proclubs_dashboard::error::UpstreamError;
use proclubs_dashboard::http_cache::ResponseCache;
use proclubs_dashboard::model::MatchType;
use proclubs_dashboard::official_fetch::OfficialProvider;
use proclubs_dashboard::provider::{MatchQuery, StatsProvider};
use proclubs_dashboard::routes::{AppState, build_router};

use common::{fixture_json, serve_stub};

const TIMEOUT: Duration = Duration::from_secs(5);

async fn community_history(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let limit = params
        .get("limit")
        .and_then(|l| l.parse::<usize>().ok())
        .unwrap_or(usize::MAX);
    let history = fixture_json("community_history.json");
    let items: Vec<Value> = history
        .as_array()
        .expect("array fixture")
        .iter()
        .take(limit)
        .cloned()
        .collect();
    Json(Value::Array(items))
}

async fn community_provider() -> CommunityProvider {
    let base = serve_stub(Router::new().route("/match/history", get(community_history))).await;
    CommunityProvider::new(&base, TIMEOUT, Arc::new(ResponseCache::default()))
        .expect("provider builds")
}

#[derive(Clone, Copy)]
struct OfficialStub {
    fail_league: bool,
    fail_playoff: bool,
}

fn playoff_matches() -> Value {
    json!({
        "100": [{
            "matchId": "9002",
            "timestamp": 1_700_006_000,
            "clubs": {
                "100": { "goals": "0", "details": { "name": "Night Owls" } },
                "555": { "goals": "3", "details": { "name": "Ghosts" } }
            },
            "players": {}
        }]
    })
}

async fn official_matches(
    State(stub): State<OfficialStub>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    match params.get("matchType").map(String::as_str) {
        Some("leagueMatch") if !stub.fail_league => {
            Json(json!({ "100": fixture_json("official_matches.json") })).into_response()
        }
        Some("playoffMatch") if !stub.fail_playoff => Json(playoff_matches()).into_response(),
        _ => (StatusCode::BAD_GATEWAY, "down").into_response(),
    }
}

async fn official_provider(stub: OfficialStub) -> OfficialProvider {
    let router = Router::new()
        .route("/clubs/matches", get(official_matches))
        .route(
            "/clubs/info",
            get(|| async { Json(json!({ "100": { "name": "Night Owls", "clubId": 100 } })) }),
        )
        .route(
            "/clubs/stats",
            get(|| async {
                Json(json!({ "100": {
                    "gamesPlayed": "120", "wins": "70", "ties": "20", "losses": "30",
                    "goals": "250", "goalsAgainst": "140", "skillRating": "1850"
                } }))
            }),
        )
        .route(
            "/clubs/seasonalStats",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
        )
        .route(
            "/members/stats",
            get(|| async {
                Json(json!({ "members": [
                    { "name": "Ace", "gamesPlayed": "40", "ratingAve": "7.4" },
                    { "name": "Bolt", "gamesPlayed": "55", "ratingAve": "7.1" },
                    { "name": "Cat", "gamesPlayed": "12", "ratingAve": "6.8" }
                ] }))
            }),
        )
        .with_state(stub);
    let base = serve_stub(router).await;
    OfficialProvider::new(&base, "ps5", TIMEOUT, Arc::new(ResponseCache::default()))
        .expect("provider builds")
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn app(provider: Arc<dyn StatsProvider>) -> Router {
    build_router(AppState {
        provider,
        directory: Arc::new(ClubDirectory::default()),
    })
}

#[tokio::test]
async fn community_club_info_comes_from_latest_match() {
    let provider = community_provider().await;
    let info = provider
        .club_info("100")
        .await
        .expect("history available")
        .expect("club has a match");
    assert_eq!(info.club_id, "100");
    assert_eq!(info.name, "Night Owls");

    let opponent = provider
        .club_info("200")
        .await
        .expect("history available")
        .expect("record exists");
    assert_eq!(opponent.name, "Day Larks");
}

#[tokio::test]
async fn community_players_limit_counts_players() {
    let provider = community_provider().await;
    let all = provider.players("100", 500).await.expect("players");
    assert_eq!(all.len(), 3);

    let top = provider.players("100", 2).await.expect("players");
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].name, "Ace");
    // Careers still span the whole history, not two matches.
    assert_eq!(top[0].matches, 3);
}

#[tokio::test]
async fn members_route_caps_player_count_for_both_providers() {
    let community: Arc<dyn StatsProvider> = Arc::new(community_provider().await);
    let official: Arc<dyn StatsProvider> = Arc::new(
        official_provider(OfficialStub {
            fail_league: false,
            fail_playoff: false,
        })
        .await,
    );
    for provider in [community, official] {
        let (status, body) = get_json(app(provider), "/api/clubs/100/members?limit=2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["members"].as_array().unwrap().len(), 2);
    }
}

#[tokio::test]
async fn official_matches_merge_league_and_playoff() {
    let provider = official_provider(OfficialStub {
        fail_league: false,
        fail_playoff: false,
    })
    .await;
    let matches = provider
        .matches("100", &MatchQuery::recent(50))
        .await
        .expect("both types succeed");
    let ids: Vec<&str> = matches.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["9002", "9001", "9000"]);
    assert_eq!(matches[0].match_type, MatchType::Playoff);
    assert_eq!(matches[1].match_type, MatchType::League);
}

#[tokio::test]
async fn official_matches_survive_one_failing_type() {
    let provider = official_provider(OfficialStub {
        fail_league: true,
        fail_playoff: false,
    })
    .await;
    let matches = provider
        .matches("100", &MatchQuery::recent(50))
        .await
        .expect("playoff still answers");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id, "9002");
}

#[tokio::test]
async fn official_matches_fail_when_every_type_fails() {
    let provider = official_provider(OfficialStub {
        fail_league: true,
        fail_playoff: true,
    })
    .await;
    let err = provider
        .matches("100", &MatchQuery::recent(50))
        .await
        .expect_err("nothing answered");
    assert!(matches!(err, UpstreamError::Http { status: 502, .. }), "{err:?}");
}

#[tokio::test]
async fn official_detail_carries_provider_records() {
    let provider: Arc<dyn StatsProvider> = Arc::new(
        official_provider(OfficialStub {
            fail_league: false,
            fail_playoff: false,
        })
        .await,
    );
    let (status, body) = get_json(app(provider), "/api/clubs/100").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["name"], "Night Owls");
    assert_eq!(body["providerStats"]["wins"], 70);
    assert_eq!(body["providerStats"]["draws"], 20);
    assert_eq!(body["providerStats"]["skillRating"], 1850);
    // Seasonal endpoint is down; that slice alone degrades.
    assert!(body["seasonalStats"].is_null());
    assert_eq!(body["stats"]["totalMatches"], 3);
    assert_eq!(body["members"][0]["name"], "Bolt");
}
