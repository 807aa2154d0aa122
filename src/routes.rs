use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::directory::{ClubDirectory, DEFAULT_SEARCH_LIMIT, SearchOutcome};
use crate::error::ServiceError;
use crate::model::{Match, MatchType, PlayerAggregate};
use crate::provider::{MatchQuery, StatsProvider};
use crate::service::{ClubDetail, club_detail};

pub const MIN_LIMIT: usize = 1;
pub const MAX_LIMIT: usize = 1000;
const DEFAULT_MATCHES_LIMIT: usize = 100;
const DEFAULT_MEMBERS_LIMIT: usize = 500;
const MAX_CLUB_ID_LEN: usize = 20;

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn StatsProvider>,
    pub directory: Arc<ClubDirectory>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/clubs/search", get(search))
        .route("/api/clubs/:club_id", get(club))
        .route("/api/clubs/:club_id/matches", get(club_matches))
        .route("/api/clubs/:club_id/members", get(club_members))
        .with_state(state)
}

/// Parses a caller-supplied limit; junk falls back to `default`, numbers are
/// clamped into `MIN_LIMIT..=MAX_LIMIT`.
pub fn clamp_limit(raw: Option<&str>, default: usize) -> usize {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v != 0)
        .map(|v| v.clamp(MIN_LIMIT as i64, MAX_LIMIT as i64) as usize)
        .unwrap_or(default)
}

pub fn validate_club_id(raw: &str) -> Result<&str, ServiceError> {
    let id = raw.trim();
    if id.is_empty() || id.len() > MAX_CLUB_ID_LEN || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ServiceError::InvalidInput(format!(
            "club id must be numeric, got '{}'",
            id.chars().take(MAX_CLUB_ID_LEN).collect::<String>()
        )));
    }
    Ok(id)
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "provider": state.provider.name(),
        "clubs": state.directory.len(),
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub name: Option<String>,
    pub limit: Option<String>,
    pub remote: Option<String>,
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchOutcome>, ServiceError> {
    let query = params.name.or(params.query).unwrap_or_default();
    let limit = clamp_limit(params.limit.as_deref(), DEFAULT_SEARCH_LIMIT);
    let mut outcome = state.directory.search(&query, limit);

    let remote = matches!(params.remote.as_deref(), Some("1" | "true"));
    if remote && outcome.clubs.is_empty() && outcome.message.is_none() {
        let query = outcome.query.clone().unwrap_or_default();
        let mut clubs = state.provider.search_clubs(query.trim()).await?;
        clubs.truncate(limit.min(crate::directory::MAX_SEARCH_LIMIT));
        debug!(query = %query, hits = clubs.len(), "remote club search");
        outcome.total = clubs.len();
        outcome.clubs = clubs;
    }
    Ok(Json(outcome))
}

async fn club(
    State(state): State<AppState>,
    Path(club_id): Path<String>,
) -> Result<Json<ClubDetail>, ServiceError> {
    let club_id = validate_club_id(&club_id)?;
    let detail = club_detail(state.provider.as_ref(), &state.directory, club_id).await?;
    Ok(Json(detail))
}

#[derive(Debug, Default, Deserialize)]
pub struct MatchesParams {
    pub limit: Option<String>,
    #[serde(rename = "matchType")]
    pub match_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MatchesResponse {
    pub matches: Vec<Match>,
}

async fn club_matches(
    State(state): State<AppState>,
    Path(club_id): Path<String>,
    Query(params): Query<MatchesParams>,
) -> Result<Json<MatchesResponse>, ServiceError> {
    let club_id = validate_club_id(&club_id)?;
    let query = MatchQuery {
        limit: clamp_limit(params.limit.as_deref(), DEFAULT_MATCHES_LIMIT),
        match_type: params
            .match_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(MatchType::from_code),
    };
    let matches = state.provider.matches(club_id, &query).await?;
    Ok(Json(MatchesResponse { matches }))
}

#[derive(Debug, Default, Deserialize)]
pub struct MembersParams {
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MembersResponse {
    pub members: Vec<PlayerAggregate>,
}

async fn club_members(
    State(state): State<AppState>,
    Path(club_id): Path<String>,
    Query(params): Query<MembersParams>,
) -> Result<Json<MembersResponse>, ServiceError> {
    let club_id = validate_club_id(&club_id)?;
    let limit = clamp_limit(params.limit.as_deref(), DEFAULT_MEMBERS_LIMIT);
    let members = state.provider.players(club_id, limit).await?;
    Ok(Json(MembersResponse { members }))
}
