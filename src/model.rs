use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Archetype labels keyed by the upstream `archetypeid` code.
pub const ARCHETYPES: &[(&str, &str)] = &[
    ("1", "Shot Stopper"),
    ("2", "Sweeper Keeper"),
    ("3", "Progressor"),
    ("4", "Boss"),
    ("5", "Engine"),
    ("6", "Marauder"),
    ("7", "Recycler"),
    ("8", "Maestro"),
    ("9", "Creator"),
    ("10", "Spark"),
    ("11", "Magician"),
    ("12", "Finisher"),
    ("13", "Target"),
];

pub const UNKNOWN_ARCHETYPE: &str = "Unknown";

pub fn archetype_label(code: &str) -> &'static str {
    let code = code.trim();
    ARCHETYPES
        .iter()
        .find(|(id, _)| *id == code)
        .map(|(_, label)| *label)
        .unwrap_or(UNKNOWN_ARCHETYPE)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MatchType {
    League,
    Playoff,
    Friendly,
    Other(String),
}

impl MatchType {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "leagueMatch" => MatchType::League,
            "playoffMatch" => MatchType::Playoff,
            "friendlyMatch" => MatchType::Friendly,
            other => MatchType::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            MatchType::League => "leagueMatch",
            MatchType::Playoff => "playoffMatch",
            MatchType::Friendly => "friendlyMatch",
            MatchType::Other(code) => code,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            MatchType::League => "Division Rivals",
            MatchType::Playoff => "Playoffs",
            MatchType::Friendly => "Friendly",
            MatchType::Other(code) => code,
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for MatchType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for MatchType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(MatchType::from_code(&raw))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchResult {
    Win,
    Draw,
    Loss,
}

impl MatchResult {
    pub fn from_goals(own: u32, opponent: u32) -> Self {
        match own.cmp(&opponent) {
            std::cmp::Ordering::Greater => MatchResult::Win,
            std::cmp::Ordering::Equal => MatchResult::Draw,
            std::cmp::Ordering::Less => MatchResult::Loss,
        }
    }

    pub fn form_letter(self) -> FormLetter {
        match self {
            MatchResult::Win => FormLetter::W,
            MatchResult::Draw => FormLetter::D,
            MatchResult::Loss => FormLetter::L,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormLetter {
    W,
    D,
    L,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub own: u32,
    pub opponent: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opponent {
    pub id: String,
    pub name: String,
    pub goals: u32,
    pub winner_by_dnf: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerMatchStats {
    pub name: String,
    pub position: String,
    pub archetype: String,
    pub archetype_id: String,
    pub rating: f64,
    pub goals: u32,
    pub assists: u32,
    pub shots: u32,
    pub saves: u32,
    pub passes_made: u32,
    pub pass_attempts: u32,
    pub tackles_made: u32,
    pub tackle_attempts: u32,
    pub interceptions: u32,
    pub dribbles: u32,
    pub second_assists: u32,
    pub red_cards: u32,
    pub man_of_the_match: bool,
    #[serde(rename = "cleanSheetGK")]
    pub clean_sheet_gk: u32,
    pub clean_sheet_def: u32,
    pub seconds_played: u32,
    pub minutes_played: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    pub club_id: String,
    pub club_name: String,
    pub match_type: MatchType,
    pub match_type_label: String,
    pub timestamp: i64,
    /// RFC 3339 rendering of `timestamp`, empty when the timestamp is out of range.
    pub match_date: String,
    pub result: MatchResult,
    pub score: Score,
    pub opponent: Option<Opponent>,
    pub winner_by_dnf: bool,
    pub players: Vec<PlayerMatchStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubAggregate {
    pub club_id: String,
    pub club_name: String,
    pub total_matches: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub clean_sheets: u32,
    pub win_rate: u32,
    pub goal_difference: i64,
    pub avg_goals_for: f64,
    pub avg_goals_against: f64,
    pub recent_form: Vec<FormLetter>,
    pub match_types: BTreeMap<String, u32>,
}

/// Career totals for one player. Keyed by display name, so two players sharing
/// a name are merged and a renamed player is split.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerAggregate {
    pub name: String,
    pub position: String,
    pub matches: u32,
    pub goals: u32,
    pub assists: u32,
    pub shots: u32,
    pub saves: u32,
    pub passes_made: u32,
    pub pass_attempts: u32,
    pub tackles_made: u32,
    pub tackle_attempts: u32,
    pub interceptions: u32,
    pub dribbles: u32,
    pub red_cards: u32,
    pub man_of_the_match: u32,
    pub clean_sheets: u32,
    pub total_rating: f64,
    pub minutes_played: u32,
    pub avg_rating: f64,
    pub pass_accuracy: u32,
    pub tackle_success: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubInfo {
    pub club_id: String,
    pub name: String,
}

/// All-time club record as reported by the provider, independent of how many
/// matches the history endpoints return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubRecord {
    pub games_played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub skill_rating: u32,
}

/// Division progress for the current competitive season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonRecord {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub points: u32,
    pub current_division: u32,
    pub best_division: u32,
    pub seasons: u32,
    pub titles_won: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubDirectoryEntry {
    pub id: String,
    pub name: String,
}
