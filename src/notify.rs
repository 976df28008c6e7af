//! Daily match digests for subscribers

use std::collections::BTreeSet;

use serde::Serialize;

use crate::data::leagues;
use crate::data::subscriptions::{Subscription, SubscriptionStore};
use crate::{MatchResult, Result};

/// Outbound message delivery
pub trait Mailer {
    fn send(&mut self, to: &str, subject: &str, body: &str) -> Result<()>;
}

/// Mailer that only writes messages to the log
#[derive(Debug, Default)]
pub struct LogMailer {
    pub sent: usize,
}

impl Mailer for LogMailer {
    fn send(&mut self, to: &str, subject: &str, body: &str) -> Result<()> {
        log::info!("Mail to {}: {}\n{}", to, subject, body);
        self.sent += 1;
        Ok(())
    }
}

/// Outcome of one digest run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationReport {
    pub match_count: usize,
    pub subscribers: usize,
    pub sent: usize,
}

/// Competition codes needed to serve every subscriber.
///
/// Empty when any subscriber follows all leagues.
pub fn competition_codes(subscriptions: &[Subscription]) -> Vec<&'static str> {
    if subscriptions.iter().any(|s| s.leagues.is_empty()) {
        return Vec::new();
    }

    let codes: BTreeSet<&'static str> = subscriptions
        .iter()
        .flat_map(|s| s.leagues.iter())
        .filter_map(|id| leagues::find(id).and_then(|l| l.football_data_code))
        .collect();
    codes.into_iter().collect()
}

/// Today's matches that belong to a subscriber's leagues
pub fn matches_for<'a>(
    subscription: &Subscription,
    matches: &'a [MatchResult],
) -> Vec<&'a MatchResult> {
    matches
        .iter()
        .filter(|m| {
            m.competition
                .as_deref()
                .and_then(leagues::find_by_code)
                .is_some_and(|l| subscription.follows(l.id))
        })
        .collect()
}

/// Render a digest body, one line per match
pub fn digest_body(matches: &[&MatchResult]) -> String {
    matches
        .iter()
        .map(|m| {
            let league = m
                .competition
                .as_deref()
                .and_then(leagues::find_by_code)
                .map(|l| l.name)
                .unwrap_or("Unknown league");
            format!(
                "{}  {} vs {}  ({})",
                m.kickoff.format("%H:%M UTC"),
                m.home_team.name,
                m.away_team.name,
                league
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Send each subscriber the matches of their leagues played today.
///
/// Subscribers without a match today are not mailed.
pub fn send_daily_digest(
    store: &dyn SubscriptionStore,
    todays_matches: &[MatchResult],
    mailer: &mut dyn Mailer,
) -> Result<NotificationReport> {
    let subscriptions = store.list()?;
    let mut sent = 0;

    for subscription in &subscriptions {
        let matches = matches_for(subscription, todays_matches);
        if matches.is_empty() {
            continue;
        }

        let subject = format!("{} matches today", matches.len());
        mailer.send(&subscription.email, &subject, &digest_body(&matches))?;
        sent += 1;
    }

    let report = NotificationReport {
        match_count: todays_matches.len(),
        subscribers: subscriptions.len(),
        sent,
    };
    log::info!(
        "{} matches today, {} of {} subscribers notified",
        report.match_count,
        report.sent,
        report.subscribers
    );
    Ok(report)
}
