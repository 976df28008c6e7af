//! Head-to-head history
//!
//! Attributes historical results between two teams to the sides of an
//! upcoming fixture, regardless of who was at home back then.

use crate::predict::PredictionPolicy;
use crate::{MatchResult, TeamId};

/// Results of previous meetings, counted for the upcoming home and away side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadToHeadTally {
    pub matches: usize,
    pub home_wins: usize,
    pub away_wins: usize,
    pub draws: usize,
}

impl HeadToHeadTally {
    /// Count up to `window` meetings of a newest-first history.
    ///
    /// `home` and `away` are the sides of the upcoming fixture. A meeting won
    /// by a third team counts as played but is credited to neither side.
    pub fn from_matches(
        history: &[MatchResult],
        home: TeamId,
        away: TeamId,
        window: usize,
    ) -> Self {
        let mut tally = HeadToHeadTally::default();

        for meeting in history.iter().take(window) {
            tally.matches += 1;
            match meeting.winner() {
                None => tally.draws += 1,
                Some(winner) if winner == home => tally.home_wins += 1,
                Some(winner) if winner == away => tally.away_wins += 1,
                Some(winner) => {
                    log::debug!("Meeting {} won by unrelated {}", meeting.id, winner);
                }
            }
        }

        tally
    }

    pub fn is_empty(&self) -> bool {
        self.matches == 0
    }
}

/// Head-to-head bias for the upcoming home and away side.
///
/// Each side scores `base + win_rate * span`. Without history both sides get
/// the policy's neutral default. The pair is not normalized against itself.
pub fn head_to_head_scores(
    history: Option<&[MatchResult]>,
    home: TeamId,
    away: TeamId,
    policy: &PredictionPolicy,
) -> (f64, f64) {
    let tally = history
        .map(|h| HeadToHeadTally::from_matches(h, home, away, policy.head_to_head_window))
        .unwrap_or_default();

    if tally.is_empty() {
        return (policy.head_to_head_default, policy.head_to_head_default);
    }

    let total = tally.matches as f64;
    let score =
        |wins: usize| policy.head_to_head_base + wins as f64 / total * policy.head_to_head_span;
    (score(tally.home_wins), score(tally.away_wins))
}
