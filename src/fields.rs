//! Parse-or-default helpers for upstream JSON.
//!
//! Both providers encode most numbers as strings and occasionally send junk
//! such as `"N/A"`. Nothing in here fails: a field that cannot be read is 0,
//! `false` or an empty string.

use serde_json::Value;

use crate::model::{PlayerMatchStats, archetype_label};

type CounterSetter = fn(&mut PlayerMatchStats, u32);

/// Canonical per-match counters and the upstream key each one is read from.
/// Both providers share these keys.
pub const PLAYER_COUNTERS: &[(&str, CounterSetter)] = &[
    ("goals", |p, v| p.goals = v),
    ("assists", |p, v| p.assists = v),
    ("shots", |p, v| p.shots = v),
    ("saves", |p, v| p.saves = v),
    ("passesmade", |p, v| p.passes_made = v),
    ("passattempts", |p, v| p.pass_attempts = v),
    ("tacklesmade", |p, v| p.tackles_made = v),
    ("tackleattempts", |p, v| p.tackle_attempts = v),
    ("interceptions", |p, v| p.interceptions = v),
    ("dribbles", |p, v| p.dribbles = v),
    ("secondAssists", |p, v| p.second_assists = v),
    ("redcards", |p, v| p.red_cards = v),
    ("cleansheetsgk", |p, v| p.clean_sheet_gk = v),
    ("cleansheetsdef", |p, v| p.clean_sheet_def = v),
    ("secondsPlayed", |p, v| p.seconds_played = v),
];

/// Builds one player's match line from a raw stat dictionary.
pub fn player_stats_from_value(name: &str, raw: &Value) -> PlayerMatchStats {
    let archetype_id = str_field(raw, "archetypeid");
    let mut stats = PlayerMatchStats {
        name: name.trim().to_string(),
        position: str_field(raw, "pos"),
        archetype: archetype_label(&archetype_id).to_string(),
        archetype_id,
        rating: f64_field(raw, "rating"),
        man_of_the_match: flag_field(raw, "mom"),
        ..PlayerMatchStats::default()
    };
    for (key, set) in PLAYER_COUNTERS {
        set(&mut stats, u32_field(raw, key));
    }
    stats.minutes_played = seconds_to_minutes(stats.seconds_played);
    stats
}

pub fn seconds_to_minutes(seconds: u32) -> u32 {
    (f64::from(seconds) / 60.0).round() as u32
}

pub fn u32_field(value: &Value, key: &str) -> u32 {
    value.get(key).map(parse_u32).unwrap_or(0)
}

pub fn i64_field(value: &Value, key: &str) -> i64 {
    value.get(key).map(parse_i64).unwrap_or(0)
}

pub fn f64_field(value: &Value, key: &str) -> f64 {
    value.get(key).map(parse_f64).unwrap_or(0.0)
}

pub fn str_field(value: &Value, key: &str) -> String {
    value.get(key).and_then(as_string).unwrap_or_default()
}

/// Upstream flags are `"1"`/`"0"` strings, sometimes numbers or booleans.
pub fn flag_field(value: &Value, key: &str) -> bool {
    match value.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(other) => parse_i64(other) == 1,
        None => false,
    }
}

pub fn pick_string(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .filter_map(as_string)
        .find(|s| !s.is_empty())
}

pub fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Integer counters: leading integer part wins, so `"7.9"` reads as 7.
pub fn parse_u32(value: &Value) -> u32 {
    u32::try_from(parse_i64(value).max(0)).unwrap_or(u32::MAX)
}

pub fn parse_i64(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite())
                        .map(|f| f.trunc() as i64)
                })
                .unwrap_or(0)
        }
        _ => 0,
    }
}

pub fn parse_f64(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite()).unwrap_or(0.0)
}
