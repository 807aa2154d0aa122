//! Raw provider match records to the canonical [`Match`].
//!
//! Community (`match_data` / `player_data`) and official (`clubs` / `players`)
//! records carry the same per-club and per-player keys but nest them
//! differently; both funnel into [`build_match`].

use chrono::DateTime;
use serde_json::{Map, Value};

use crate::fields::{as_string, flag_field, i64_field, pick_string, player_stats_from_value, u32_field};
use crate::model::{Match, MatchResult, MatchType, Opponent, PlayerMatchStats, Score};

const DEFAULT_CLUB_NAME: &str = "Your Club";
const DEFAULT_OPPONENT_NAME: &str = "Unknown";

/// Normalizes either provider's record, detecting the shape from its keys.
pub fn normalize(raw: &Value, perspective_club_id: &str) -> Match {
    if raw.get("match_data").is_some() || raw.get("player_data").is_some() {
        normalize_community_match(raw, perspective_club_id)
    } else {
        normalize_official_match(raw, perspective_club_id, None)
    }
}

/// Community record. An empty perspective falls back to the record's own `club_id`.
pub fn normalize_community_match(raw: &Value, perspective_club_id: &str) -> Match {
    let record_club_id = pick_string(raw, &["club_id"]).unwrap_or_default();
    let perspective = if perspective_club_id.trim().is_empty() {
        record_club_id.clone()
    } else {
        perspective_club_id.trim().to_string()
    };
    // `club_name` names the record owner, which may be the other side.
    let club_name = if perspective == record_club_id {
        pick_string(raw, &["club_name"])
    } else {
        None
    };
    let clubs = raw
        .get("match_data")
        .and_then(|d| d.get("clubs"))
        .and_then(Value::as_object);

    let players = raw
        .get("player_data")
        .and_then(Value::as_object)
        .map(|entries| {
            entries
                .iter()
                .map(|(name, stats)| player_stats_from_value(name, stats))
                .collect()
        })
        .unwrap_or_default();

    build_match(RawMatch {
        id: pick_string(raw, &["id", "match_id"]).unwrap_or_default(),
        club_name,
        match_type: MatchType::from_code(&pick_string(raw, &["match_type"]).unwrap_or_default()),
        timestamp: i64_field(raw, "match_date"),
        clubs,
        explicit_result: raw.get("result"),
        perspective,
        players,
    })
}

/// Official record. Players are grouped per club id; only the perspective
/// club's block is kept.
pub fn normalize_official_match(
    raw: &Value,
    perspective_club_id: &str,
    match_type: Option<&MatchType>,
) -> Match {
    let perspective = perspective_club_id.trim().to_string();
    let clubs = raw.get("clubs").and_then(Value::as_object);

    let players = raw
        .get("players")
        .and_then(|p| p.get(&perspective))
        .and_then(Value::as_object)
        .map(|entries| {
            entries
                .iter()
                .map(|(player_id, stats)| {
                    let name = pick_string(stats, &["playername", "name"])
                        .unwrap_or_else(|| player_id.clone());
                    player_stats_from_value(&name, stats)
                })
                .collect()
        })
        .unwrap_or_default();

    let match_type = match match_type {
        Some(t) => t.clone(),
        None => pick_string(raw, &["matchType", "match_type"])
            .map(|code| MatchType::from_code(&code))
            .unwrap_or(MatchType::League),
    };

    build_match(RawMatch {
        id: pick_string(raw, &["matchId", "id"]).unwrap_or_default(),
        club_name: None,
        match_type,
        timestamp: i64_field(raw, "timestamp"),
        clubs,
        explicit_result: None,
        perspective,
        players,
    })
}

struct RawMatch<'a> {
    id: String,
    club_name: Option<String>,
    match_type: MatchType,
    timestamp: i64,
    clubs: Option<&'a Map<String, Value>>,
    explicit_result: Option<&'a Value>,
    perspective: String,
    players: Vec<PlayerMatchStats>,
}

fn build_match(raw: RawMatch<'_>) -> Match {
    let own = raw.clubs.and_then(|c| c.get(&raw.perspective));
    let opponent_entry = raw
        .clubs
        .and_then(|c| c.iter().find(|(id, _)| **id != raw.perspective));

    let own_goals = own.map(|c| u32_field(c, "goals"));
    let opponent_goals = opponent_entry.map(|(_, c)| u32_field(c, "goals"));

    let result = match (own_goals, opponent_goals) {
        (Some(own), Some(opp)) => MatchResult::from_goals(own, opp),
        _ => own
            .and_then(|c| c.get("result"))
            .or(raw.explicit_result)
            .and_then(parse_explicit_result)
            .unwrap_or_else(|| {
                MatchResult::from_goals(own_goals.unwrap_or(0), opponent_goals.unwrap_or(0))
            }),
    };

    let club_name = raw
        .club_name
        .or_else(|| own.and_then(club_display_name))
        .unwrap_or_else(|| DEFAULT_CLUB_NAME.to_string());

    let opponent = opponent_entry.map(|(id, club)| Opponent {
        id: id.clone(),
        name: club_display_name(club).unwrap_or_else(|| DEFAULT_OPPONENT_NAME.to_string()),
        goals: opponent_goals.unwrap_or(0),
        winner_by_dnf: flag_field(club, "winnerByDnf"),
    });

    let mut players = raw.players;
    players.sort_by(|a, b| b.rating.total_cmp(&a.rating));

    Match {
        id: raw.id,
        club_id: raw.perspective,
        club_name,
        match_type_label: raw.match_type.label().to_string(),
        match_type: raw.match_type,
        timestamp: raw.timestamp,
        match_date: DateTime::from_timestamp(raw.timestamp, 0)
            .map(|d| d.to_rfc3339())
            .unwrap_or_default(),
        result,
        score: Score {
            own: own_goals.unwrap_or(0),
            opponent: opponent_goals.unwrap_or(0),
        },
        opponent,
        winner_by_dnf: own.is_some_and(|c| flag_field(c, "winnerByDnf")),
        players,
    }
}

fn club_display_name(club: &Value) -> Option<String> {
    pick_string(club, &["clubName", "name"])
        .or_else(|| club.get("details").and_then(|d| pick_string(d, &["name"])))
}

/// Official codes are `1` win, `2` loss, `4` draw; word forms are accepted too.
fn parse_explicit_result(value: &Value) -> Option<MatchResult> {
    let raw = as_string(value)?.to_ascii_lowercase();
    match raw.as_str() {
        "1" | "win" | "w" => Some(MatchResult::Win),
        "2" | "loss" | "l" => Some(MatchResult::Loss),
        "4" | "draw" | "tie" | "d" => Some(MatchResult::Draw),
        _ => None,
    }
}
