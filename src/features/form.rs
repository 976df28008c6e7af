//! Recent form
//!
//! Reduces a team's most recent results into a strength scalar and a
//! W-D-L summary.

use std::fmt;

use crate::predict::PredictionPolicy;
use crate::{MatchResult, Outcome, TeamId};

/// Rendered in place of a W-D-L tally when a team has no usable form data
pub const FORM_UNAVAILABLE: &str = "form data unavailable";

/// Win/draw/loss tally for one team over its form window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormSummary {
    /// Matches involving the team that were counted
    pub matches: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
}

impl FormSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tally up to `window` matches of a newest-first record.
    ///
    /// Each match is read from the team's own role in that fixture. Matches the
    /// team did not play in are skipped.
    pub fn from_matches(record: &[MatchResult], team: TeamId, window: usize) -> Self {
        let mut summary = FormSummary::new();
        for result in record.iter().take(window) {
            summary.update(result, team);
        }
        summary
    }

    /// Update the tally with a match result
    pub fn update(&mut self, result: &MatchResult, team: TeamId) {
        let Some(outcome) = result.outcome_for(team) else {
            log::debug!(
                "Skipping match {} in form of {}: team did not play",
                result.id,
                team
            );
            return;
        };

        self.matches += 1;
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::Loss => self.losses += 1,
        }
    }

    /// League points: 3 per win, 1 per draw
    pub fn points(&self) -> usize {
        self.wins * 3 + self.draws
    }

    /// Share of available points taken, as a percentage (None without matches)
    pub fn points_percentage(&self) -> Option<f64> {
        if self.matches == 0 {
            None
        } else {
            Some(self.points() as f64 / (self.matches * 3) as f64 * 100.0)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matches == 0
    }
}

impl fmt::Display for FormSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}W-{}D-{}L", self.wins, self.draws, self.losses)
    }
}

/// Strength of a team from its recent form.
///
/// Points percentage clamped to the policy's form range, or the policy's
/// neutral default when the record is absent or holds no match for the team.
pub fn form_score(record: Option<&[MatchResult]>, team: TeamId, policy: &PredictionPolicy) -> f64 {
    let summary = record
        .map(|r| FormSummary::from_matches(r, team, policy.form_window))
        .unwrap_or_default();

    match summary.points_percentage() {
        // max/min rather than clamp: an unvalidated policy must not panic
        Some(pct) => pct.max(policy.form_floor).min(policy.form_ceiling),
        None => policy.form_default,
    }
}

/// Human-readable W-D-L tally, e.g. "3W-1D-1L"
pub fn form_text(record: Option<&[MatchResult]>, team: TeamId, window: usize) -> String {
    let summary = record
        .map(|r| FormSummary::from_matches(r, team, window))
        .unwrap_or_default();

    if summary.is_empty() {
        FORM_UNAVAILABLE.to_string()
    } else {
        summary.to_string()
    }
}
