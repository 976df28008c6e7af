//! League catalogue
//!
//! Maps the public league ids used by clients onto the codes each provider
//! understands.

use crate::{BrokoliError, Result};

/// A league and the provider codes it is known by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct League {
    /// Public id, e.g. "39"
    pub id: &'static str,
    pub name: &'static str,
    /// Competition code at the match provider
    pub football_data_code: Option<&'static str>,
    /// League slug at the standings provider
    pub standings_slug: Option<&'static str>,
}

const fn league(
    id: &'static str,
    name: &'static str,
    football_data_code: Option<&'static str>,
    standings_slug: Option<&'static str>,
) -> League {
    League {
        id,
        name,
        football_data_code,
        standings_slug,
    }
}

pub const LEAGUES: &[League] = &[
    league("39", "Premier League", Some("PL"), Some("eng.1")),
    league("140", "La Liga", Some("PD"), Some("esp.1")),
    league("78", "Bundesliga", Some("BL1"), Some("ger.1")),
    league("135", "Serie A", Some("SA"), Some("ita.1")),
    league("61", "Ligue 1", Some("FL1"), Some("fra.1")),
    league("2", "UEFA Champions League", Some("CL"), None),
    league("88", "Eredivisie", Some("DED"), Some("ned.1")),
    league("71", "Campeonato Brasileiro Série A", Some("BSA"), Some("bra.1")),
    league("72", "Championship", Some("ELC"), None),
    league("94", "Primeira Liga", Some("PPL"), Some("por.1")),
    league("4", "European Championship", Some("EC"), None),
    league("203", "Turkish Super Lig", None, Some("tur.1")),
    league("262", "Liga MX", None, Some("mex.1")),
    league("1", "Argentine Liga Profesional", None, Some("arg.1")),
    league("188", "Russian Premier League", None, Some("rus.1")),
    league("98", "J1 League", None, Some("jpn.1")),
    league("271", "A-League", None, Some("aus.1")),
    league("253", "Chinese Super League", None, Some("chn.1")),
    league("317", "Liga 1 Indonesia", None, Some("idn.1")),
    league("286", "Malaysia Super League", None, Some("mys.1")),
    league("340", "Singapore Premier League", None, Some("sgp.1")),
    league("316", "Thai League 1", None, Some("tha.1")),
];

/// Look up a league by public id
pub fn find(id: &str) -> Option<&'static League> {
    let id = id.trim();
    LEAGUES.iter().find(|l| l.id == id)
}

/// Look up a league by its match-provider competition code
pub fn find_by_code(code: &str) -> Option<&'static League> {
    LEAGUES
        .iter()
        .find(|l| l.football_data_code.is_some_and(|c| c.eq_ignore_ascii_case(code)))
}

/// League usable for fixtures, returning its competition code
pub fn fixtures_league(id: &str) -> Result<(&'static League, &'static str)> {
    find(id)
        .and_then(|l| l.football_data_code.map(|code| (l, code)))
        .ok_or_else(|| unsupported(id, "fixtures", |l| l.football_data_code.is_some()))
}

/// League usable for standings, returning its slug
pub fn standings_league(id: &str) -> Result<(&'static League, &'static str)> {
    find(id)
        .and_then(|l| l.standings_slug.map(|slug| (l, slug)))
        .ok_or_else(|| unsupported(id, "standings", |l| l.standings_slug.is_some()))
}

fn unsupported(
    id: &str,
    purpose: &'static str,
    supports: impl Fn(&League) -> bool,
) -> BrokoliError {
    let supported = LEAGUES
        .iter()
        .filter(|l| supports(l))
        .map(|l| format!("{} ({})", l.id, l.name))
        .collect::<Vec<_>>()
        .join(", ");
    BrokoliError::UnsupportedLeague {
        league: id.to_string(),
        purpose,
        supported,
    }
}
