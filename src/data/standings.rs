//! Client for the football-standings API

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ApiConfig, BrokoliError, Result};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StandingsResponse {
    data: Option<StandingsData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StandingsData {
    name: Option<String>,
    season_display: Option<String>,
    season: Option<i32>,
    standings: Vec<StandingEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StandingEntry {
    team: Option<StandingTeam>,
    stats: Vec<Stat>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StandingTeam {
    name: Option<String>,
    display_name: Option<String>,
    abbreviation: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Stat {
    name: Option<String>,
    value: Option<f64>,
}

/// One team's line in a league table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingRow {
    pub rank: u32,
    pub team: String,
    pub abbreviation: Option<String>,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goal_difference: i32,
    pub points: u32,
}

/// A league table for one season, ordered by rank
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingsTable {
    pub name: String,
    pub season: String,
    pub rows: Vec<StandingRow>,
}

impl StandingEntry {
    fn stat(&self, name: &str) -> f64 {
        self.stats
            .iter()
            .find(|s| s.name.as_deref() == Some(name))
            .and_then(|s| s.value)
            .unwrap_or(0.0)
    }

    fn into_row(self, position: usize) -> StandingRow {
        let rank = match self.stat("rank") as u32 {
            0 => position as u32 + 1,
            r => r,
        };
        let played = self.stat("gamesPlayed") as u32;
        let wins = self.stat("wins") as u32;
        let draws = self.stat("ties") as u32;
        let losses = self.stat("losses") as u32;
        let goal_difference = self.stat("pointDifferential") as i32;
        let points = self.stat("points") as u32;
        let team = self.team.unwrap_or_default();

        StandingRow {
            rank,
            played,
            wins,
            draws,
            losses,
            goal_difference,
            points,
            team: team
                .display_name
                .or(team.name)
                .unwrap_or_else(|| "Unknown".to_string()),
            abbreviation: team.abbreviation,
        }
    }
}

/// Parse a standings response body
pub fn parse_standings(body: &str) -> Result<StandingsTable> {
    let response: StandingsResponse = serde_json::from_str(body)?;
    let data = response
        .data
        .ok_or_else(|| BrokoliError::Upstream {
            status: 200,
            body: "standings response without data".to_string(),
        })?;

    let mut rows: Vec<_> = data
        .standings
        .into_iter()
        .enumerate()
        .map(|(i, entry)| entry.into_row(i))
        .collect();
    rows.sort_by_key(|r| r.rank);

    Ok(StandingsTable {
        name: data.name.unwrap_or_default(),
        season: data
            .season_display
            .or(data.season.map(|s| s.to_string()))
            .unwrap_or_default(),
        rows,
    })
}

/// Client for league tables
pub struct StandingsClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl StandingsClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("brokoli/0.1")
            .timeout(timeout)
            .build()?;
        Ok(StandingsClient {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(api: &ApiConfig) -> Result<Self> {
        Self::new(api.standings_url.clone(), Duration::from_secs(api.timeout_secs))
    }

    /// Table for a league slug (e.g. "eng.1") and season start year
    pub fn standings(&self, slug: &str, season: u16) -> Result<StandingsTable> {
        let url = format!("{}/leagues/{}/standings", self.base_url, slug);
        log::debug!("GET {} season={}", url, season);

        let response = self
            .client
            .get(&url)
            .query(&[("season", season.to_string()), ("sort", "asc".to_string())])
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(BrokoliError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        parse_standings(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "status": true,
        "data": {
            "name": "English Premier League",
            "abbreviation": "Prem",
            "seasonDisplay": "2023-2024",
            "season": 2023,
            "standings": [
                {
                    "team": { "id": "359", "name": "Arsenal", "abbreviation": "ARS", "displayName": "Arsenal" },
                    "stats": [
                        { "name": "gamesPlayed", "value": 38 },
                        { "name": "losses", "value": 5 },
                        { "name": "pointDifferential", "value": 62 },
                        { "name": "points", "value": 89 },
                        { "name": "rank", "value": 2 },
                        { "name": "ties", "value": 5 },
                        { "name": "wins", "value": 28 }
                    ]
                },
                {
                    "team": { "id": "382", "name": "Manchester City", "abbreviation": "MNC" },
                    "stats": [
                        { "name": "gamesPlayed", "value": 38 },
                        { "name": "points", "value": 91 },
                        { "name": "rank", "value": 1 },
                        { "name": "wins", "value": 28 },
                        { "name": "ties", "value": 7 },
                        { "name": "losses", "value": 3 },
                        { "name": "pointDifferential", "value": 62 }
                    ]
                }
            ]
        }
    }"#;

    #[test]
    fn test_parse_orders_by_rank() {
        let table = parse_standings(BODY).unwrap();
        assert_eq!(table.name, "English Premier League");
        assert_eq!(table.season, "2023-2024");
        assert_eq!(table.rows.len(), 2);

        let top = &table.rows[0];
        assert_eq!(top.team, "Manchester City");
        assert_eq!(top.rank, 1);
        assert_eq!(top.points, 91);
        assert_eq!(top.draws, 7);

        let second = &table.rows[1];
        assert_eq!(second.abbreviation.as_deref(), Some("ARS"));
        assert_eq!(second.goal_difference, 62);
        assert_eq!(second.losses, 5);
    }

    #[test]
    fn test_missing_stats_default_to_zero() {
        let body = r#"{ "data": { "season": 2024, "standings": [ { "team": { "name": "Ajax" } } ] } }"#;
        let table = parse_standings(body).unwrap();
        assert_eq!(table.season, "2024");
        assert_eq!(table.rows[0].rank, 1);
        assert_eq!(table.rows[0].points, 0);
        assert_eq!(table.rows[0].team, "Ajax");
    }

    #[test]
    fn test_missing_data_is_error() {
        assert!(parse_standings(r#"{ "status": false }"#).is_err());
        assert!(parse_standings("not json").is_err());
    }
}
