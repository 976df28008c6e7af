//! Client for the football-data.org v4 API
//!
//! Single blocking requests, no retries. Non-success responses surface as
//! [`BrokoliError::Upstream`] with the provider's body.

use std::time::Duration;

use chrono::{Days, NaiveDate};
use serde::de::DeserializeOwned;

use super::payload::{newest_first, MatchListPayload, MatchPayload};
use super::FootballProvider;
use crate::{ApiConfig, BrokoliError, MatchId, MatchResult, Result, TeamId};

/// Days ahead covered by a fixtures request
pub const FIXTURE_WINDOW_DAYS: u64 = 14;

/// Client for match, head-to-head and fixture data
pub struct FootballDataClient {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: Option<String>,
}

impl FootballDataClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("brokoli/0.1")
            .timeout(timeout)
            .build()?;

        Ok(FootballDataClient {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn from_config(api: &ApiConfig) -> Result<Self> {
        Self::new(
            api.football_data_url.clone(),
            api.football_data_key.clone(),
            Duration::from_secs(api.timeout_secs),
        )
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("GET {} {:?}", url, query);

        let mut request = self.client.get(&url).query(query);
        if let Some(key) = &self.api_key {
            request = request.header("X-Auth-Token", key);
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(BrokoliError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json()?)
    }

    /// Upcoming matches of a competition from `today` through the fixture window
    pub fn fixtures(&self, competition_code: &str, today: NaiveDate) -> Result<Vec<MatchResult>> {
        let (from, to) = fixture_window(today);
        let list: MatchListPayload = self.get_json(
            &format!("/competitions/{}/matches", competition_code),
            &[("dateFrom", from.to_string()), ("dateTo", to.to_string())],
        )?;
        Ok(list.into_results())
    }

    /// Matches played on `day` in the given competitions (all when empty)
    pub fn matches_on(
        &self,
        competition_codes: &[&str],
        day: NaiveDate,
    ) -> Result<Vec<MatchResult>> {
        let mut query = vec![("dateFrom", day.to_string()), ("dateTo", day.to_string())];
        if !competition_codes.is_empty() {
            query.push(("competitions", competition_codes.join(",")));
        }
        let list: MatchListPayload = self.get_json("/matches", &query)?;
        Ok(list.into_results())
    }
}

impl FootballProvider for FootballDataClient {
    fn get_match(&self, id: MatchId) -> Result<MatchResult> {
        let payload: MatchPayload = self.get_json(&format!("/matches/{}", id), &[])?;
        payload.into_result()
    }

    fn head_to_head(&self, id: MatchId, limit: usize) -> Result<Vec<MatchResult>> {
        let list: MatchListPayload = self.get_json(
            &format!("/matches/{}/head2head", id),
            &[("limit", limit.to_string())],
        )?;
        Ok(newest_first(list.into_results(), limit))
    }

    fn recent_matches(&self, team: TeamId, limit: usize) -> Result<Vec<MatchResult>> {
        let list: MatchListPayload = self.get_json(
            &format!("/teams/{}/matches", team.0),
            &[("status", "FINISHED".to_string()), ("limit", limit.to_string())],
        )?;
        Ok(newest_first(list.into_results(), limit))
    }
}

/// First and last day of a fixtures request starting on `today`
pub fn fixture_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let to = today
        .checked_add_days(Days::new(FIXTURE_WINDOW_DAYS))
        .unwrap_or(today);
    (today, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_window_spans_two_weeks() {
        let today = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
        let (from, to) = fixture_window(today);
        assert_eq!(from, today);
        assert_eq!(to, NaiveDate::from_ymd_opt(2025, 1, 8).unwrap());
    }

    #[test]
    fn test_base_url_is_trimmed() {
        let client =
            FootballDataClient::new("http://football.invalid/v4/", None, Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url, "http://football.invalid/v4");
    }
}
