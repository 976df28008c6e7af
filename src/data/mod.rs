//! Upstream data and storage
//!
//! HTTP clients for the match and standings providers, the league catalogue
//! and subscriber storage.

pub mod football_data;
pub mod leagues;
pub mod payload;
pub mod standings;
pub mod subscriptions;

pub use football_data::FootballDataClient;
pub use standings::{StandingsClient, StandingsTable};
pub use subscriptions::{SqliteSubscriptionStore, Subscription, SubscriptionStore};

use crate::{MatchId, MatchResult, Result, TeamId};

/// Source of the match data a prediction needs
pub trait FootballProvider {
    /// Look up one match with both teams resolved
    fn get_match(&self, id: MatchId) -> Result<MatchResult>;

    /// Previous meetings of the two teams of a match, newest first
    fn head_to_head(&self, id: MatchId, limit: usize) -> Result<Vec<MatchResult>>;

    /// A team's most recent finished matches, newest first
    fn recent_matches(&self, team: TeamId, limit: usize) -> Result<Vec<MatchResult>>;
}
