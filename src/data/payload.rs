//! Wire types for the match provider
//!
//! Every field is optional on the wire. Conversion into [`MatchResult`]
//! fills defaults so nothing past this module has to null-check.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{BrokoliError, MatchId, MatchResult, MatchStatus, Result, TeamId, TeamRef};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchPayload {
    pub id: Option<i64>,
    pub utc_date: Option<String>,
    pub status: Option<String>,
    pub home_team: Option<TeamPayload>,
    pub away_team: Option<TeamPayload>,
    pub score: Option<ScorePayload>,
    pub competition: Option<CompetitionPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TeamPayload {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub short_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScorePayload {
    pub full_time: Option<GoalsPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GoalsPayload {
    pub home: Option<u32>,
    pub away: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CompetitionPayload {
    pub name: Option<String>,
    pub code: Option<String>,
}

/// Any provider response carrying a `matches` array
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MatchListPayload {
    pub matches: Vec<MatchPayload>,
}

impl TeamPayload {
    fn into_team_ref(self, fallback_name: &str) -> Option<TeamRef> {
        let id = self.id?;
        let name = self
            .name
            .or(self.short_name)
            .unwrap_or_else(|| fallback_name.to_string());
        Some(TeamRef { id: TeamId(id), name })
    }
}

impl MatchPayload {
    /// Validate and default the payload.
    ///
    /// Teams without an id cannot be attributed and make the match invalid.
    /// Missing scores become 0 goals, a missing kickoff the Unix epoch.
    pub fn into_result(self) -> Result<MatchResult> {
        let id = self
            .id
            .ok_or_else(|| BrokoliError::InvalidMatch("match without id".to_string()))?;

        let home_team = self
            .home_team
            .and_then(|t| t.into_team_ref("Home Team"))
            .ok_or_else(|| BrokoliError::InvalidMatch(format!("match {} has no home team", id)))?;
        let away_team = self
            .away_team
            .and_then(|t| t.into_team_ref("Away Team"))
            .ok_or_else(|| BrokoliError::InvalidMatch(format!("match {} has no away team", id)))?;

        let goals = self.score.and_then(|s| s.full_time).unwrap_or_default();

        let kickoff = self
            .utc_date
            .as_deref()
            .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or_default();

        let status = self
            .status
            .as_deref()
            .map(MatchStatus::from_code)
            .unwrap_or(MatchStatus::Unknown);

        let competition = self.competition.and_then(|c| c.code.or(c.name));

        Ok(MatchResult {
            id: MatchId(id),
            home_team,
            away_team,
            home_goals: goals.home.unwrap_or(0),
            away_goals: goals.away.unwrap_or(0),
            kickoff,
            status,
            competition,
        })
    }
}

impl MatchListPayload {
    /// Convert every valid match, dropping the rest with a warning
    pub fn into_results(self) -> Vec<MatchResult> {
        self.matches
            .into_iter()
            .filter_map(|m| match m.into_result() {
                Ok(result) => Some(result),
                Err(e) => {
                    log::warn!("Dropping match from provider: {}", e);
                    None
                }
            })
            .collect()
    }
}

/// Order newest first and keep at most `limit` matches
pub fn newest_first(mut matches: Vec<MatchResult>, limit: usize) -> Vec<MatchResult> {
    matches.sort_by(|a, b| b.kickoff.cmp(&a.kickoff));
    matches.truncate(limit);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    const MATCH_JSON: &str = r#"{
        "id": 436100,
        "utcDate": "2024-04-14T15:30:00Z",
        "status": "FINISHED",
        "competition": { "id": 2021, "name": "Premier League", "code": "PL" },
        "homeTeam": { "id": 57, "name": "Arsenal FC", "shortName": "Arsenal", "crest": "x" },
        "awayTeam": { "id": 58, "name": "Aston Villa FC", "shortName": "Aston Villa" },
        "score": { "winner": "AWAY_TEAM", "fullTime": { "home": 0, "away": 2 }, "halfTime": { "home": 0, "away": 0 } }
    }"#;

    #[test]
    fn test_parse_full_match() {
        let payload: MatchPayload = serde_json::from_str(MATCH_JSON).unwrap();
        let result = payload.into_result().unwrap();

        assert_eq!(result.id, MatchId(436100));
        assert_eq!(result.home_team, TeamRef::new(57, "Arsenal FC"));
        assert_eq!(result.away_team.id, TeamId(58));
        assert_eq!(result.home_goals, 0);
        assert_eq!(result.away_goals, 2);
        assert_eq!(result.status, MatchStatus::Finished);
        assert_eq!(result.competition.as_deref(), Some("PL"));
        assert_eq!(result.kickoff.to_rfc3339(), "2024-04-14T15:30:00+00:00");
    }

    #[test]
    fn test_unplayed_match_defaults_goals() {
        let json = r#"{
            "id": 1, "status": "TIMED", "utcDate": "2025-01-01T12:00:00Z",
            "homeTeam": { "id": 1, "name": "A" }, "awayTeam": { "id": 2, "name": "B" },
            "score": { "fullTime": { "home": null, "away": null } }
        }"#;
        let result = serde_json::from_str::<MatchPayload>(json).unwrap().into_result().unwrap();
        assert_eq!(result.home_goals, 0);
        assert_eq!(result.away_goals, 0);
        assert_eq!(result.status, MatchStatus::Timed);
    }

    #[test]
    fn test_missing_team_is_invalid() {
        let json = r#"{ "id": 1, "homeTeam": { "id": 1, "name": "A" }, "awayTeam": { "name": "B" } }"#;
        let err = serde_json::from_str::<MatchPayload>(json).unwrap().into_result();
        assert!(matches!(err, Err(BrokoliError::InvalidMatch(_))));
    }

    #[test]
    fn test_missing_name_uses_fallback() {
        let json = r#"{ "id": 1, "homeTeam": { "id": 1 }, "awayTeam": { "id": 2, "shortName": "Spurs" } }"#;
        let result = serde_json::from_str::<MatchPayload>(json).unwrap().into_result().unwrap();
        assert_eq!(result.home_team.name, "Home Team");
        assert_eq!(result.away_team.name, "Spurs");
        assert_eq!(result.kickoff, DateTime::<Utc>::default());
    }

    #[test]
    fn test_match_list_drops_invalid_entries() {
        let json = format!(
            r#"{{ "resultSet": {{ "count": 2 }}, "matches": [ {}, {{ "id": 9 }} ] }}"#,
            MATCH_JSON
        );
        let list: MatchListPayload = serde_json::from_str(&json).unwrap();
        let results = list.into_results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, MatchId(436100));
    }

    #[test]
    fn test_newest_first() {
        let json = r#"{ "matches": [
            { "id": 1, "utcDate": "2024-01-01T12:00:00Z", "homeTeam": { "id": 1 }, "awayTeam": { "id": 2 } },
            { "id": 2, "utcDate": "2024-03-01T12:00:00Z", "homeTeam": { "id": 1 }, "awayTeam": { "id": 3 } },
            { "id": 3, "utcDate": "2024-02-01T12:00:00Z", "homeTeam": { "id": 4 }, "awayTeam": { "id": 1 } }
        ] }"#;
        let list: MatchListPayload = serde_json::from_str(json).unwrap();
        let ordered = newest_first(list.into_results(), 2);
        let ids: Vec<_> = ordered.iter().map(|m| m.id.0).collect();
        assert_eq!(ids, vec![2, 3]);
    }
}
