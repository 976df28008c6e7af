//! Match prediction against a live provider

use serde::Serialize;

use super::engine::{predict_with_policy, PredictionInput, PredictionPolicy};
use crate::data::FootballProvider;
use crate::{MatchId, MatchResult, PredictionOutput, Result};

/// A prediction together with the data it was computed from
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPrediction {
    #[serde(rename = "match")]
    pub fixture: MatchResult,
    pub head_to_head: Option<Vec<MatchResult>>,
    pub home_team_form: Option<Vec<MatchResult>>,
    pub away_team_form: Option<Vec<MatchResult>>,
    pub prediction: PredictionOutput,
}

/// Fetches prediction inputs and runs the engine
pub struct MatchPredictor<P: FootballProvider> {
    provider: P,
    policy: PredictionPolicy,
}

impl<P: FootballProvider> MatchPredictor<P> {
    pub fn new(provider: P) -> Self {
        Self::with_policy(provider, PredictionPolicy::default())
    }

    pub fn with_policy(provider: P, policy: PredictionPolicy) -> Self {
        MatchPredictor { provider, policy }
    }

    /// Predict a match by provider id.
    ///
    /// The match itself must load. Head-to-head and form lookups that fail
    /// are logged and treated as missing data.
    pub fn predict_match(&self, id: MatchId) -> Result<MatchPrediction> {
        let fixture = self.provider.get_match(id)?;

        let head_to_head = optional(
            "head-to-head",
            self.provider.head_to_head(id, self.policy.head_to_head_window),
        );
        let home_team_form = optional(
            "home form",
            self.provider
                .recent_matches(fixture.home_team.id, self.policy.form_window),
        );
        let away_team_form = optional(
            "away form",
            self.provider
                .recent_matches(fixture.away_team.id, self.policy.form_window),
        );

        let input = PredictionInput {
            home: &fixture.home_team,
            away: &fixture.away_team,
            head_to_head: head_to_head.as_deref(),
            home_form: home_team_form.as_deref(),
            away_form: away_team_form.as_deref(),
        };
        let prediction = predict_with_policy(&input, &self.policy);

        Ok(MatchPrediction {
            fixture,
            head_to_head,
            home_team_form,
            away_team_form,
            prediction,
        })
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

fn optional<T>(what: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Could not load {}, predicting without it: {}", what, e);
            None
        }
    }
}

/// Format a prediction for display
pub fn format_prediction(prediction: &MatchPrediction) -> String {
    let fixture = &prediction.fixture;
    let output = &prediction.prediction;

    format!(
        r#"
┌─────────────────────────────────────────────────┐
│  {} vs {}
│  Kickoff: {}
├─────────────────────────────────────────────────┤
│  Prediction:   {}
│  Home win:     {}%
│  Away win:     {}%
│  Confidence:   {}
├─────────────────────────────────────────────────┤
│  {}
│  {}
└─────────────────────────────────────────────────┘
"#,
        fixture.home_team.name,
        fixture.away_team.name,
        fixture.kickoff.format("%Y-%m-%d %H:%M UTC"),
        output.winner,
        output.home_win_probability,
        output.away_win_probability,
        output.confidence,
        output.analysis,
        output.advice,
    )
}
