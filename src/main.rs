//! Brokoli Football CLI
//!
//! Fixtures, standings, match predictions, a football assistant and daily
//! digests from one command.

use clap::{Parser, Subcommand};
use brokoli::{Config, Result};

#[derive(Parser)]
#[command(name = "brokoli")]
#[command(about = "Football fixtures, standings and match predictions", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new project with default config
    Init,
    /// Predict the outcome of a match
    Predict {
        /// Match id at the match provider
        match_id: i64,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Upcoming fixtures of a league for the next two weeks
    Fixtures {
        /// League id (e.g. 39 for the Premier League)
        #[arg(long)]
        league: String,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// League table for a season
    Standings {
        /// League id (e.g. 39 for the Premier League)
        #[arg(long)]
        league: String,
        /// Season start year
        #[arg(long)]
        season: u16,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Matches played today
    Today {
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Ask the football assistant
    Chat {
        /// Question to ask
        message: String,
    },
    /// Subscribe an email address to daily digests
    Subscribe {
        email: String,
        /// Comma-separated league ids; omit to follow every league
        #[arg(long, value_delimiter = ',')]
        leagues: Vec<String>,
    },
    /// List subscribers
    Subscribers,
    /// Send today's digest to every subscriber
    Notify,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use table or json.", s)),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    }
    .with_env_overrides();

    // Run command
    let result = match cli.command {
        Commands::Init => commands::init(&cli.config),
        Commands::Predict { match_id, format } => commands::predict(&config, match_id, format),
        Commands::Fixtures { league, format } => commands::fixtures(&config, &league, format),
        Commands::Standings {
            league,
            season,
            format,
        } => commands::standings(&config, &league, season, format),
        Commands::Today { format } => commands::today(&config, format),
        Commands::Chat { message } => commands::chat(&config, &message),
        Commands::Subscribe { email, leagues } => {
            commands::subscribe(&config, &email, &leagues)
        }
        Commands::Subscribers => commands::subscribers(&config),
        Commands::Notify => commands::notify(&config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use brokoli::chat::ChatClient;
    use brokoli::data::{
        leagues, FootballDataClient, SqliteSubscriptionStore, StandingsClient, SubscriptionStore,
    };
    use brokoli::notify::{competition_codes, send_daily_digest, LogMailer};
    use brokoli::predict::service::format_prediction;
    use brokoli::predict::MatchPredictor;
    use brokoli::{MatchId, MatchResult};
    use chrono::Utc;

    fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    fn print_matches(matches: &[MatchResult]) {
        println!(
            "{:<10} {:<18} {:<28} {:<28} {:>7}",
            "Id", "Kickoff (UTC)", "Home", "Away", "Score"
        );
        println!("{}", "─".repeat(95));
        for m in matches {
            let score = match m.status {
                brokoli::MatchStatus::Finished
                | brokoli::MatchStatus::InPlay
                | brokoli::MatchStatus::Paused => format!("{} - {}", m.home_goals, m.away_goals),
                status => status.to_string(),
            };
            println!(
                "{:<10} {:<18} {:<28} {:<28} {:>7}",
                m.id.0,
                m.kickoff.format("%Y-%m-%d %H:%M"),
                m.home_team.name,
                m.away_team.name,
                score
            );
        }
    }

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        std::fs::create_dir_all("data")?;
        println!("Created data/ directory");

        println!("\nNext steps:");
        println!("  1. Set FOOTBALL_DATA_API_KEY (and GEMINI_API_KEY for chat)");
        println!("  2. Run 'brokoli fixtures --league 39' to find a match id");
        println!("  3. Run 'brokoli predict <MATCH_ID>' to predict it");

        Ok(())
    }

    pub fn predict(config: &Config, match_id: i64, format: OutputFormat) -> Result<()> {
        let client = FootballDataClient::from_config(&config.api)?;
        let predictor = MatchPredictor::with_policy(client, config.prediction.clone());
        let prediction = predictor.predict_match(MatchId(match_id))?;

        match format {
            OutputFormat::Table => print!("{}", format_prediction(&prediction)),
            OutputFormat::Json => print_json(&prediction)?,
        }
        Ok(())
    }

    pub fn fixtures(config: &Config, league: &str, format: OutputFormat) -> Result<()> {
        let (league, code) = leagues::fixtures_league(league)?;
        let client = FootballDataClient::from_config(&config.api)?;
        let matches = client.fixtures(code, Utc::now().date_naive())?;

        match format {
            OutputFormat::Table => {
                println!("{} fixtures", league.name);
                println!();
                if matches.is_empty() {
                    println!("No fixtures in the next two weeks.");
                } else {
                    print_matches(&matches);
                }
            }
            OutputFormat::Json => print_json(&matches)?,
        }
        Ok(())
    }

    pub fn standings(
        config: &Config,
        league: &str,
        season: u16,
        format: OutputFormat,
    ) -> Result<()> {
        let (_, slug) = leagues::standings_league(league)?;
        let client = StandingsClient::from_config(&config.api)?;
        let table = client.standings(slug, season)?;

        match format {
            OutputFormat::Table => {
                println!("{} {}", table.name, table.season);
                println!("───────────────────────────────────────────────────────────────");
                println!(
                    "{:>3}  {:<28} {:>3} {:>3} {:>3} {:>3} {:>5} {:>4}",
                    "#", "Team", "P", "W", "D", "L", "GD", "Pts"
                );
                for row in &table.rows {
                    println!(
                        "{:>3}  {:<28} {:>3} {:>3} {:>3} {:>3} {:>5} {:>4}",
                        row.rank,
                        row.team,
                        row.played,
                        row.wins,
                        row.draws,
                        row.losses,
                        row.goal_difference,
                        row.points
                    );
                }
            }
            OutputFormat::Json => print_json(&table)?,
        }
        Ok(())
    }

    pub fn today(config: &Config, format: OutputFormat) -> Result<()> {
        let client = FootballDataClient::from_config(&config.api)?;
        let matches = client.matches_on(&[], Utc::now().date_naive())?;

        match format {
            OutputFormat::Table => {
                if matches.is_empty() {
                    println!("No matches today.");
                } else {
                    print_matches(&matches);
                }
            }
            OutputFormat::Json => print_json(&matches)?,
        }
        Ok(())
    }

    pub fn chat(config: &Config, message: &str) -> Result<()> {
        let client = ChatClient::from_config(&config.api)?;
        let answer = client.ask(message)?;
        println!("{}", answer);
        Ok(())
    }

    pub fn subscribe(config: &Config, email: &str, leagues: &[String]) -> Result<()> {
        let mut store = SqliteSubscriptionStore::open(&config.data.database_path)?;
        store.add(email, leagues)?;
        println!("Subscribed {} ({} subscribers)", email.trim(), store.count()?);
        Ok(())
    }

    pub fn subscribers(config: &Config) -> Result<()> {
        let store = SqliteSubscriptionStore::open(&config.data.database_path)?;
        let list = store.list()?;

        println!("Subscribers: {}", list.len());
        println!("───────────────────────────────");
        for sub in &list {
            let followed = if sub.leagues.is_empty() {
                "all leagues".to_string()
            } else {
                sub.leagues
                    .iter()
                    .map(|id| leagues::find(id).map(|l| l.name).unwrap_or(id.as_str()))
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            println!("  {:<32} {}", sub.email, followed);
        }
        Ok(())
    }

    pub fn notify(config: &Config) -> Result<()> {
        let store = SqliteSubscriptionStore::open(&config.data.database_path)?;
        let subscriptions = store.list()?;
        if subscriptions.is_empty() {
            println!("No subscribers, nothing to send.");
            return Ok(());
        }

        let client = FootballDataClient::from_config(&config.api)?;
        let codes = competition_codes(&subscriptions);
        let matches = client.matches_on(&codes, Utc::now().date_naive())?;

        let mut mailer = LogMailer::default();
        let report = send_daily_digest(&store, &matches, &mut mailer)?;
        println!(
            "{} matches today, sent {} of {} digests",
            report.match_count, report.sent, report.subscribers
        );
        Ok(())
    }
}
