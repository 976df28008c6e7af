//! Heuristic outcome predictor
//!
//! Blends recent form with head-to-head history, applies a fixed home
//! advantage and normalizes into integer win probabilities. Pure and
//! deterministic: no I/O, no clock, no randomness.

use serde::{Deserialize, Serialize};

use super::narrative;
use crate::features::{form_score, head_to_head_scores};
use crate::{BrokoliError, MatchResult, PredictionOutput, Result, TeamRef};

/// Tunable constants of the heuristic.
///
/// The defaults are the documented policy; none of them are fitted to data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionPolicy {
    /// Share of the raw score taken from recent form
    pub form_weight: f64,
    /// Share of the raw score taken from head-to-head history
    pub head_to_head_weight: f64,
    /// Added to the home side's raw score
    pub home_advantage: f64,
    /// Added to the away side's raw score (negative)
    pub away_adjustment: f64,
    pub form_floor: f64,
    pub form_ceiling: f64,
    /// Form strength when a team has no usable matches
    pub form_default: f64,
    pub form_window: usize,
    pub head_to_head_base: f64,
    /// Added on top of the base at a 100% head-to-head win rate
    pub head_to_head_span: f64,
    pub head_to_head_default: f64,
    pub head_to_head_window: usize,
    /// A side must exceed this probability to be named winner
    pub winner_threshold: u8,
    /// A winner above this probability is called with high confidence
    pub high_confidence_threshold: u8,
}

impl Default for PredictionPolicy {
    fn default() -> Self {
        PredictionPolicy {
            form_weight: 0.6,
            head_to_head_weight: 0.4,
            home_advantage: 8.0,
            away_adjustment: -3.0,
            form_floor: 20.0,
            form_ceiling: 80.0,
            form_default: 50.0,
            form_window: 5,
            head_to_head_base: 30.0,
            head_to_head_span: 40.0,
            head_to_head_default: 50.0,
            head_to_head_window: 5,
            winner_threshold: 60,
            high_confidence_threshold: 70,
        }
    }
}

impl PredictionPolicy {
    /// Reject policies the engine cannot evaluate without panicking
    pub fn validate(&self) -> Result<()> {
        let values = [
            ("form_weight", self.form_weight),
            ("head_to_head_weight", self.head_to_head_weight),
            ("home_advantage", self.home_advantage),
            ("away_adjustment", self.away_adjustment),
            ("form_floor", self.form_floor),
            ("form_ceiling", self.form_ceiling),
            ("form_default", self.form_default),
            ("head_to_head_base", self.head_to_head_base),
            ("head_to_head_span", self.head_to_head_span),
            ("head_to_head_default", self.head_to_head_default),
        ];
        if let Some((name, value)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(BrokoliError::Config(format!(
                "prediction.{} must be finite, got {}",
                name, value
            )));
        }

        if self.form_floor > self.form_ceiling {
            return Err(BrokoliError::Config(format!(
                "prediction.form_floor ({}) exceeds form_ceiling ({})",
                self.form_floor, self.form_ceiling
            )));
        }

        for (name, threshold) in [
            ("winner_threshold", self.winner_threshold),
            ("high_confidence_threshold", self.high_confidence_threshold),
        ] {
            if threshold > 100 {
                return Err(BrokoliError::Config(format!(
                    "prediction.{} must be at most 100, got {}",
                    name, threshold
                )));
            }
        }

        Ok(())
    }
}

/// Everything the predictor needs for one fixture.
///
/// Any of the three match lists may be absent; absence and emptiness are
/// treated the same.
#[derive(Debug, Clone, Copy)]
pub struct PredictionInput<'a> {
    pub home: &'a TeamRef,
    pub away: &'a TeamRef,
    pub head_to_head: Option<&'a [MatchResult]>,
    pub home_form: Option<&'a [MatchResult]>,
    pub away_form: Option<&'a [MatchResult]>,
}

impl<'a> PredictionInput<'a> {
    /// Input with no history at all
    pub fn new(home: &'a TeamRef, away: &'a TeamRef) -> Self {
        PredictionInput {
            home,
            away,
            head_to_head: None,
            home_form: None,
            away_form: None,
        }
    }

    pub fn with_head_to_head(mut self, history: &'a [MatchResult]) -> Self {
        self.head_to_head = Some(history);
        self
    }

    pub fn with_home_form(mut self, record: &'a [MatchResult]) -> Self {
        self.home_form = Some(record);
        self
    }

    pub fn with_away_form(mut self, record: &'a [MatchResult]) -> Self {
        self.away_form = Some(record);
        self
    }
}

/// Intermediate scores, before normalization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signals {
    pub home_form: f64,
    pub away_form: f64,
    pub home_head_to_head: f64,
    pub away_head_to_head: f64,
    /// Blended home score including home advantage
    pub home_raw: f64,
    /// Blended away score including away adjustment
    pub away_raw: f64,
}

/// Compute form and head-to-head signals and blend them into raw scores
pub fn score_signals(input: &PredictionInput<'_>, policy: &PredictionPolicy) -> Signals {
    let home_id = input.home.id;
    let away_id = input.away.id;

    let home_form = form_score(input.home_form, home_id, policy);
    let away_form = form_score(input.away_form, away_id, policy);
    let (home_head_to_head, away_head_to_head) =
        head_to_head_scores(input.head_to_head, home_id, away_id, policy);

    let home_raw = blend(home_form, home_head_to_head, policy) + policy.home_advantage;
    let away_raw = blend(away_form, away_head_to_head, policy) + policy.away_adjustment;

    Signals {
        home_form,
        away_form,
        home_head_to_head,
        away_head_to_head,
        home_raw,
        away_raw,
    }
}

/// Weighted mix of form and head-to-head
pub fn blend(form: f64, head_to_head: f64, policy: &PredictionPolicy) -> f64 {
    form * policy.form_weight + head_to_head * policy.head_to_head_weight
}

/// Normalize raw scores into integer probabilities summing to 100.
///
/// Away is derived as `100 - home` so rounding never breaks the sum. A total
/// that is not a finite positive number yields 50/50.
pub fn normalize(home_raw: f64, away_raw: f64) -> (u8, u8) {
    let total = home_raw + away_raw;
    if !total.is_finite() || total <= 0.0 {
        log::debug!(
            "Degenerate raw scores ({}, {}), falling back to 50/50",
            home_raw,
            away_raw
        );
        return (50, 50);
    }

    let home = (home_raw / total * 100.0).round().clamp(0.0, 100.0) as u8;
    (home, 100 - home)
}

/// Predict the outcome of a fixture with the default policy
pub fn predict(input: &PredictionInput<'_>) -> PredictionOutput {
    predict_with_policy(input, &PredictionPolicy::default())
}

/// Predict the outcome of a fixture
pub fn predict_with_policy(
    input: &PredictionInput<'_>,
    policy: &PredictionPolicy,
) -> PredictionOutput {
    let signals = score_signals(input, policy);
    let (home_win_probability, away_win_probability) =
        normalize(signals.home_raw, signals.away_raw);

    let (winner, confidence) = narrative::label(
        input.home,
        input.away,
        home_win_probability,
        away_win_probability,
        policy,
    );

    PredictionOutput {
        advice: narrative::advice(winner.as_deref()),
        analysis: narrative::analysis(input, policy),
        winner: winner.unwrap_or_else(|| narrative::DRAW.to_string()),
        home_win_probability,
        away_win_probability,
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConfidenceLevel, MatchId, MatchStatus};
    use chrono::{TimeZone, Utc};

    fn make_match(home: i64, away: i64, home_goals: u32, away_goals: u32) -> MatchResult {
        MatchResult {
            id: MatchId(1),
            home_team: TeamRef::new(home, format!("Team {}", home)),
            away_team: TeamRef::new(away, format!("Team {}", away)),
            home_goals,
            away_goals,
            kickoff: Utc.with_ymd_and_hms(2024, 5, 4, 16, 30, 0).unwrap(),
            status: MatchStatus::Finished,
            competition: None,
        }
    }

    fn teams() -> (TeamRef, TeamRef) {
        (TeamRef::new(1, "Arsenal"), TeamRef::new(2, "Chelsea"))
    }

    #[test]
    fn test_no_data_reflects_only_home_advantage() {
        let (home, away) = teams();
        let input = PredictionInput::new(&home, &away);
        let signals = score_signals(&input, &PredictionPolicy::default());

        assert!((signals.home_raw - 58.0).abs() < 1e-9);
        assert!((signals.away_raw - 47.0).abs() < 1e-9);

        let output = predict(&input);
        assert_eq!(output.home_win_probability, 55);
        assert_eq!(output.away_win_probability, 45);
        assert_eq!(output.winner, "Draw");
        assert_eq!(output.confidence, ConfidenceLevel::Low);
    }

    #[test]
    fn test_strong_home_form_against_weak_away_form() {
        let (home, away) = teams();
        let home_form: Vec<_> = (0..5).map(|i| make_match(1, 10 + i, 2, 0)).collect();
        let away_form: Vec<_> = (0..5).map(|i| make_match(2, 10 + i, 0, 1)).collect();
        let input = PredictionInput::new(&home, &away)
            .with_home_form(&home_form)
            .with_away_form(&away_form);

        let signals = score_signals(&input, &PredictionPolicy::default());
        assert_eq!(signals.home_form, 80.0);
        assert_eq!(signals.away_form, 20.0);
        // 80*0.6 + 50*0.4 + 8 and 20*0.6 + 50*0.4 - 3
        assert!((signals.home_raw - 76.0).abs() < 1e-9);
        assert!((signals.away_raw - 29.0).abs() < 1e-9);

        let output = predict(&input);
        assert_eq!(output.home_win_probability, 72);
        assert_eq!(output.away_win_probability, 28);
        assert_eq!(output.winner, "Arsenal");
        assert_eq!(output.confidence, ConfidenceLevel::High);
    }

    #[test]
    fn test_away_side_can_be_favoured() {
        let (home, away) = teams();
        let home_form: Vec<_> = (0..5).map(|i| make_match(10 + i, 1, 3, 0)).collect();
        let away_form: Vec<_> = (0..5).map(|i| make_match(10 + i, 2, 0, 3)).collect();
        let history: Vec<_> = (0..5).map(|_| make_match(1, 2, 0, 1)).collect();
        let input = PredictionInput::new(&home, &away)
            .with_head_to_head(&history)
            .with_home_form(&home_form)
            .with_away_form(&away_form);

        // home: 20*0.6 + 30*0.4 + 8 = 32, away: 80*0.6 + 70*0.4 - 3 = 73
        let output = predict(&input);
        assert_eq!(output.home_win_probability, 30);
        assert_eq!(output.away_win_probability, 70);
        assert_eq!(output.winner, "Chelsea");
        assert_eq!(output.confidence, ConfidenceLevel::Medium);
    }

    #[test]
    fn test_normalize_degenerate_totals() {
        assert_eq!(normalize(0.0, 0.0), (50, 50));
        assert_eq!(normalize(-10.0, 5.0), (50, 50));
        assert_eq!(normalize(f64::NAN, 10.0), (50, 50));
        assert_eq!(normalize(f64::INFINITY, 10.0), (50, 50));
    }

    #[test]
    fn test_normalize_clamps_negative_side() {
        assert_eq!(normalize(-5.0, 20.0), (0, 100));
        assert_eq!(normalize(20.0, -5.0), (100, 0));
    }

    #[test]
    fn test_zero_weight_policy_falls_back_to_even() {
        let (home, away) = teams();
        let policy = PredictionPolicy {
            form_weight: 0.0,
            head_to_head_weight: 0.0,
            home_advantage: 0.0,
            away_adjustment: 0.0,
            ..PredictionPolicy::default()
        };
        let output = predict_with_policy(&PredictionInput::new(&home, &away), &policy);
        assert_eq!(output.home_win_probability, 50);
        assert_eq!(output.away_win_probability, 50);
        assert_eq!(output.winner, "Draw");
        assert_eq!(output.confidence, ConfidenceLevel::Low);
    }

    #[test]
    fn test_default_policy_is_valid() {
        assert!(PredictionPolicy::default().validate().is_ok());
    }

    #[test]
    fn test_policy_validation_rejects_unusable_values() {
        let inverted = PredictionPolicy {
            form_floor: 90.0,
            form_ceiling: 10.0,
            ..PredictionPolicy::default()
        };
        assert!(matches!(inverted.validate(), Err(BrokoliError::Config(_))));

        let nan_weight = PredictionPolicy {
            form_weight: f64::NAN,
            ..PredictionPolicy::default()
        };
        assert!(matches!(nan_weight.validate(), Err(BrokoliError::Config(_))));

        let threshold = PredictionPolicy {
            high_confidence_threshold: 101,
            ..PredictionPolicy::default()
        };
        assert!(matches!(threshold.validate(), Err(BrokoliError::Config(_))));
    }

    #[test]
    fn test_prediction_is_repeatable() {
        let (home, away) = teams();
        let history = vec![make_match(1, 2, 2, 1), make_match(2, 1, 1, 1)];
        let form = vec![make_match(1, 3, 1, 0)];
        let input = PredictionInput::new(&home, &away)
            .with_head_to_head(&history)
            .with_home_form(&form);
        assert_eq!(predict(&input), predict(&input));
    }
}
