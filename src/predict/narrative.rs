//! Labels and prose for a prediction

use super::engine::{PredictionInput, PredictionPolicy};
use crate::features::form::form_text;
use crate::features::HeadToHeadTally;
use crate::{ConfidenceLevel, TeamRef};

pub const DRAW: &str = "Draw";

/// Pick the favoured side and confidence from final probabilities.
///
/// Returns `None` as winner when neither side clears the winner threshold.
pub fn label(
    home: &TeamRef,
    away: &TeamRef,
    home_win_probability: u8,
    away_win_probability: u8,
    policy: &PredictionPolicy,
) -> (Option<String>, ConfidenceLevel) {
    let confidence_for = |probability: u8| {
        if probability > policy.high_confidence_threshold {
            ConfidenceLevel::High
        } else {
            ConfidenceLevel::Medium
        }
    };

    if home_win_probability > policy.winner_threshold {
        (Some(home.name.clone()), confidence_for(home_win_probability))
    } else if away_win_probability > policy.winner_threshold {
        (Some(away.name.clone()), confidence_for(away_win_probability))
    } else {
        (None, ConfidenceLevel::Low)
    }
}

/// One-line betting-style advice naming the favourite
pub fn advice(winner: Option<&str>) -> String {
    match winner {
        Some(team) => format!(
            "Based on head-to-head analysis, {} has the better chance of winning.",
            team
        ),
        None => "Based on head-to-head analysis, the match is likely to end in a draw.".to_string(),
    }
}

/// Summary of the evidence behind a prediction
pub fn analysis(input: &PredictionInput<'_>, policy: &PredictionPolicy) -> String {
    let home_form = form_text(input.home_form, input.home.id, policy.form_window);
    let away_form = form_text(input.away_form, input.away.id, policy.form_window);

    let meetings = input
        .head_to_head
        .map(|h| {
            let window = policy.head_to_head_window;
            HeadToHeadTally::from_matches(h, input.home.id, input.away.id, window).matches
        })
        .unwrap_or(0);

    let head_to_head = if meetings == 0 {
        "Head-to-head: no previous meetings available.".to_string()
    } else {
        format!("Head-to-head: {} recent meetings analysed.", meetings)
    };

    format!(
        "Recent form: {} {}, {} {}. {}",
        input.home.name, home_form, input.away.name, away_form, head_to_head
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MatchId, MatchResult, MatchStatus};
    use chrono::{TimeZone, Utc};

    fn make_match(home: i64, away: i64, home_goals: u32, away_goals: u32) -> MatchResult {
        MatchResult {
            id: MatchId(3),
            home_team: TeamRef::new(home, format!("Team {}", home)),
            away_team: TeamRef::new(away, format!("Team {}", away)),
            home_goals,
            away_goals,
            kickoff: Utc.with_ymd_and_hms(2024, 2, 10, 12, 30, 0).unwrap(),
            status: MatchStatus::Finished,
            competition: None,
        }
    }

    #[test]
    fn test_label_thresholds() {
        let policy = PredictionPolicy::default();
        let home = TeamRef::new(1, "Inter");
        let away = TeamRef::new(2, "Milan");

        let inter = |c| (Some("Inter".to_string()), c);
        let milan = |c| (Some("Milan".to_string()), c);

        assert_eq!(label(&home, &away, 71, 29, &policy), inter(ConfidenceLevel::High));
        assert_eq!(label(&home, &away, 70, 30, &policy), inter(ConfidenceLevel::Medium));
        assert_eq!(label(&home, &away, 61, 39, &policy), inter(ConfidenceLevel::Medium));
        assert_eq!(label(&home, &away, 60, 40, &policy), (None, ConfidenceLevel::Low));
        assert_eq!(label(&home, &away, 40, 60, &policy), (None, ConfidenceLevel::Low));
        assert_eq!(label(&home, &away, 35, 65, &policy), milan(ConfidenceLevel::Medium));
        assert_eq!(label(&home, &away, 20, 80, &policy), milan(ConfidenceLevel::High));
    }

    #[test]
    fn test_advice() {
        assert_eq!(
            advice(Some("Ajax")),
            "Based on head-to-head analysis, Ajax has the better chance of winning."
        );
        assert!(advice(None).contains("draw"));
    }

    #[test]
    fn test_analysis_cites_form_and_meetings() {
        let policy = PredictionPolicy::default();
        let home = TeamRef::new(1, "Porto");
        let away = TeamRef::new(2, "Benfica");
        let history = vec![make_match(1, 2, 1, 0), make_match(2, 1, 2, 2)];
        let home_form = vec![make_match(1, 5, 3, 0), make_match(6, 1, 1, 1)];

        let input = PredictionInput::new(&home, &away)
            .with_head_to_head(&history)
            .with_home_form(&home_form);

        assert_eq!(
            analysis(&input, &policy),
            "Recent form: Porto 1W-1D-0L, Benfica form data unavailable. \
             Head-to-head: 2 recent meetings analysed."
        );
    }

    #[test]
    fn test_analysis_without_any_data() {
        let policy = PredictionPolicy::default();
        let home = TeamRef::new(1, "Porto");
        let away = TeamRef::new(2, "Benfica");
        let text = analysis(&PredictionInput::new(&home, &away), &policy);
        assert!(text.contains("no previous meetings"));
        assert!(text.contains("Porto form data unavailable"));
    }
}
