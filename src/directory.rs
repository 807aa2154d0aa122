use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::fields::as_string;
use crate::model::ClubDirectoryEntry;

pub const MAX_SEARCH_LIMIT: usize = 500;
pub const DEFAULT_SEARCH_LIMIT: usize = 20;
pub const MAX_QUERY_LENGTH: usize = 100;
pub const EMPTY_QUERY_MESSAGE: &str = "Please provide a search query";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DirectoryFile {
    #[serde(default)]
    last_updated: Option<String>,
    #[serde(default)]
    total_clubs: Option<usize>,
    #[serde(default)]
    clubs: Vec<RawEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawEntry {
    #[serde(deserialize_with = "id_string")]
    id: String,
    #[serde(default)]
    name: String,
}

/// Ids are written as numbers by some crawler runs and strings by others.
fn id_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(as_string(&value).unwrap_or_default())
}

/// Static club id/name table, read once at startup.
#[derive(Debug, Clone, Default)]
pub struct ClubDirectory {
    clubs: Vec<ClubDirectoryEntry>,
    total_clubs: usize,
    last_updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub clubs: Vec<ClubDirectoryEntry>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub database_size: usize,
    pub last_updated: Option<String>,
}

impl ClubDirectory {
    pub fn from_entries(clubs: Vec<ClubDirectoryEntry>) -> Self {
        let total_clubs = clubs.len();
        Self {
            clubs,
            total_clubs,
            last_updated: None,
        }
    }

    pub fn parse_json(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(Self::default());
        }
        let file: DirectoryFile = serde_json::from_str(trimmed).context("invalid club database json")?;
        let clubs: Vec<ClubDirectoryEntry> = file
            .clubs
            .into_iter()
            .filter(|c| !c.id.is_empty())
            .map(|c| ClubDirectoryEntry {
                id: c.id,
                name: c.name,
            })
            .collect();
        Ok(Self {
            total_clubs: file.total_clubs.unwrap_or(clubs.len()),
            last_updated: file.last_updated,
            clubs,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed reading club database {}", path.display()))?;
        Self::parse_json(&raw)
    }

    /// Like [`ClubDirectory::load`], but a missing or broken file yields an
    /// empty directory so the rest of the service still runs.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(dir) => {
                info!(clubs = dir.len(), path = %path.display(), "club directory loaded");
                dir
            }
            Err(err) => {
                warn!(error = %format!("{err:#}"), "club directory unavailable, search disabled");
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.clubs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clubs.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&ClubDirectoryEntry> {
        self.clubs.iter().find(|c| c.id == id)
    }

    pub fn search(&self, query: &str, limit: usize) -> SearchOutcome {
        let query = truncate_chars(query, MAX_QUERY_LENGTH);
        let limit = limit.clamp(1, MAX_SEARCH_LIMIT);
        let needle = query.trim().to_lowercase();

        if needle.is_empty() {
            return SearchOutcome {
                clubs: Vec::new(),
                total: self.total_clubs,
                query: None,
                message: Some(EMPTY_QUERY_MESSAGE),
                database_size: self.total_clubs,
                last_updated: self.last_updated.clone(),
            };
        }

        let clubs: Vec<ClubDirectoryEntry> = self
            .clubs
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .take(limit)
            .cloned()
            .collect();

        SearchOutcome {
            total: clubs.len(),
            clubs,
            query: Some(query.to_string()),
            message: None,
            database_size: self.total_clubs,
            last_updated: self.last_updated.clone(),
        }
    }
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
