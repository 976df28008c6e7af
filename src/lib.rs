//! Brokoli football aggregator
//!
//! Fans out to external football-data providers, normalizes their payloads and
//! computes a heuristic match-outcome prediction from head-to-head history and
//! recent form.

pub mod chat;
pub mod data;
pub mod features;
pub mod notify;
pub mod predict;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::predict::PredictionPolicy;

/// Unique identifier for a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub i64);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Team({})", self.0)
    }
}

/// Unique identifier for a match at the match provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchId(pub i64);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A team as referenced by a match record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: TeamId,
    pub name: String,
}

impl TeamRef {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        TeamRef {
            id: TeamId(id),
            name: name.into(),
        }
    }
}

/// Lifecycle state of a match as reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    Scheduled,
    Timed,
    InPlay,
    Paused,
    Finished,
    Postponed,
    Suspended,
    Cancelled,
    Unknown,
}

impl MatchStatus {
    pub fn from_code(code: &str) -> Self {
        match code.to_uppercase().as_str() {
            "SCHEDULED" => MatchStatus::Scheduled,
            "TIMED" => MatchStatus::Timed,
            "IN_PLAY" | "LIVE" => MatchStatus::InPlay,
            "PAUSED" => MatchStatus::Paused,
            "FINISHED" | "AWARDED" => MatchStatus::Finished,
            "POSTPONED" => MatchStatus::Postponed,
            "SUSPENDED" => MatchStatus::Suspended,
            "CANCELLED" | "CANCELED" => MatchStatus::Cancelled,
            _ => MatchStatus::Unknown,
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MatchStatus::Scheduled => "Scheduled",
            MatchStatus::Timed => "Timed",
            MatchStatus::InPlay => "In play",
            MatchStatus::Paused => "Half time",
            MatchStatus::Finished => "Finished",
            MatchStatus::Postponed => "Postponed",
            MatchStatus::Suspended => "Suspended",
            MatchStatus::Cancelled => "Cancelled",
            MatchStatus::Unknown => "Unknown",
        };
        write!(f, "{}", label)
    }
}

/// Result of a match from one team's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

/// A single finished or scheduled match, normalized at the provider boundary.
///
/// Goals default to 0 when the match has not been played or the provider
/// omitted the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub id: MatchId,
    pub home_team: TeamRef,
    pub away_team: TeamRef,
    pub home_goals: u32,
    pub away_goals: u32,
    pub kickoff: DateTime<Utc>,
    pub status: MatchStatus,
    pub competition: Option<String>,
}

impl MatchResult {
    /// Returns the winning team, or None for a draw
    pub fn winner(&self) -> Option<TeamId> {
        match self.home_goals.cmp(&self.away_goals) {
            std::cmp::Ordering::Greater => Some(self.home_team.id),
            std::cmp::Ordering::Less => Some(self.away_team.id),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Check if a team was playing at home
    pub fn is_home(&self, team: TeamId) -> Option<bool> {
        if team == self.home_team.id {
            Some(true)
        } else if team == self.away_team.id {
            Some(false)
        } else {
            None
        }
    }

    /// Get goals scored by a specific team
    pub fn goals_for(&self, team: TeamId) -> Option<u32> {
        self.is_home(team)
            .map(|home| if home { self.home_goals } else { self.away_goals })
    }

    /// Get goals conceded by a specific team
    pub fn goals_against(&self, team: TeamId) -> Option<u32> {
        self.is_home(team)
            .map(|home| if home { self.away_goals } else { self.home_goals })
    }

    /// Win, draw or loss for the given team, None if it did not play
    pub fn outcome_for(&self, team: TeamId) -> Option<Outcome> {
        let scored = self.goals_for(team)?;
        let conceded = self.goals_against(team)?;
        Some(match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Equal => Outcome::Draw,
            std::cmp::Ordering::Less => Outcome::Loss,
        })
    }
}

/// How decisively one side is favoured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceLevel::High => write!(f, "High"),
            ConfidenceLevel::Medium => write!(f, "Medium"),
            ConfidenceLevel::Low => write!(f, "Low"),
        }
    }
}

/// Final result of one prediction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionOutput {
    /// "Draw" or the favoured team's name
    pub winner: String,
    pub home_win_probability: u8,
    pub away_win_probability: u8,
    pub confidence: ConfidenceLevel,
    pub advice: String,
    pub analysis: String,
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum BrokoliError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("League {league} is not supported for {purpose}; supported: {supported}")]
    UnsupportedLeague {
        league: String,
        purpose: &'static str,
        supported: String,
    },

    #[error("Invalid match data: {0}")]
    InvalidMatch(String),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Message must not be empty")]
    EmptyMessage,

    #[error("Missing API key: set {0}")]
    MissingApiKey(&'static str),

    #[error("Chat provider failed: {0}")]
    Chat(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BrokoliError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub prediction: PredictionPolicy,
    pub data: DataConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub football_data_url: String,
    #[serde(default)]
    pub football_data_key: Option<String>,
    pub standings_url: String,
    pub gemini_url: String,
    pub gemini_model: String,
    #[serde(default)]
    pub gemini_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub database_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api: ApiConfig {
                football_data_url: "https://api.football-data.org/v4".to_string(),
                football_data_key: None,
                standings_url: "https://football-standings-api.vercel.app".to_string(),
                gemini_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                gemini_model: "gemini-1.5-pro".to_string(),
                gemini_key: None,
                timeout_secs: 15,
            },
            prediction: PredictionPolicy::default(),
            data: DataConfig {
                database_path: "data/brokoli.db".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BrokoliError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| BrokoliError::Config(format!("Failed to parse config: {}", e)))?;
        config.prediction.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| BrokoliError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Override API keys from `FOOTBALL_DATA_API_KEY` and `GEMINI_API_KEY`
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var("FOOTBALL_DATA_API_KEY") {
            if !key.is_empty() {
                self.api.football_data_key = Some(key);
            }
        }
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.is_empty() {
                self.api.gemini_key = Some(key);
            }
        }
        self
    }
}
