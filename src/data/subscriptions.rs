//! Subscriber storage
//!
//! Email subscriptions to daily match digests, keyed by address.

use std::collections::BTreeMap;
use std::path::Path;

use rusqlite::{params, Connection};
use serde::Serialize;

use super::leagues;
use crate::{BrokoliError, Result};

/// A digest subscription
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subscription {
    pub email: String,
    /// Public league ids; empty means every league with fixtures
    pub leagues: Vec<String>,
}

impl Subscription {
    /// Whether this subscriber follows the league with the given public id
    pub fn follows(&self, league_id: &str) -> bool {
        self.leagues.is_empty() || self.leagues.iter().any(|l| l == league_id)
    }
}

/// Capability to record and read subscriptions
pub trait SubscriptionStore {
    /// Add a subscriber, replacing the leagues of an existing address
    fn add(&mut self, email: &str, leagues: &[String]) -> Result<()>;

    fn count(&self) -> Result<usize>;

    /// All subscriptions ordered by email
    fn list(&self) -> Result<Vec<Subscription>>;
}

/// Trim and lower-case an email address, rejecting obvious garbage
pub fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(email)
    } else {
        Err(BrokoliError::InvalidEmail(email))
    }
}

/// Deduplicate league ids and check each against the catalogue
pub fn normalize_leagues(ids: &[String]) -> Result<Vec<String>> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        let id = id.trim();
        if leagues::find(id).is_none() {
            return Err(BrokoliError::UnsupportedLeague {
                league: id.to_string(),
                purpose: "subscriptions",
                supported: leagues::LEAGUES
                    .iter()
                    .map(|l| l.id)
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
        if !out.iter().any(|l| l == id) {
            out.push(id.to_string());
        }
    }
    Ok(out)
}

/// SQLite-backed store
pub struct SqliteSubscriptionStore {
    conn: Connection,
}

impl SqliteSubscriptionStore {
    /// Open or create the store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = SqliteSubscriptionStore { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = SqliteSubscriptionStore { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS subscriptions (
                email TEXT PRIMARY KEY,
                leagues TEXT NOT NULL DEFAULT '[]',
                subscribed_at TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;
        Ok(())
    }
}

impl SubscriptionStore for SqliteSubscriptionStore {
    fn add(&mut self, email: &str, leagues: &[String]) -> Result<()> {
        let email = normalize_email(email)?;
        let leagues = normalize_leagues(leagues)?;
        let leagues_json = serde_json::to_string(&leagues)?;

        self.conn.execute(
            r#"
            INSERT INTO subscriptions (email, leagues) VALUES (?1, ?2)
            ON CONFLICT(email) DO UPDATE SET
                leagues = excluded.leagues,
                updated_at = datetime('now')
            "#,
            params![email, leagues_json],
        )?;
        Ok(())
    }

    fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM subscriptions", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn list(&self) -> Result<Vec<Subscription>> {
        let mut stmt = self
            .conn
            .prepare("SELECT email, leagues FROM subscriptions ORDER BY email")?;

        let rows = stmt
            .query_map([], |row| {
                let email: String = row.get(0)?;
                let leagues_json: String = row.get(1)?;
                Ok((email, leagues_json))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(email, leagues_json)| -> Result<Subscription> {
                let leagues: Vec<String> = serde_json::from_str(&leagues_json)?;
                Ok(Subscription { email, leagues })
            })
            .collect()
    }
}

/// Process-local store, lost on exit
#[derive(Debug, Default)]
pub struct MemorySubscriptionStore {
    subscriptions: BTreeMap<String, Vec<String>>,
}

impl MemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SubscriptionStore for MemorySubscriptionStore {
    fn add(&mut self, email: &str, leagues: &[String]) -> Result<()> {
        let email = normalize_email(email)?;
        let leagues = normalize_leagues(leagues)?;
        self.subscriptions.insert(email, leagues);
        Ok(())
    }

    fn count(&self) -> Result<usize> {
        Ok(self.subscriptions.len())
    }

    fn list(&self) -> Result<Vec<Subscription>> {
        Ok(self
            .subscriptions
            .iter()
            .map(|(email, leagues)| Subscription {
                email: email.clone(),
                leagues: leagues.clone(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn exercise_store(store: &mut dyn SubscriptionStore) {
        assert_eq!(store.count().unwrap(), 0);

        store.add("Fan@Example.com ", &ids(&["39", "140"])).unwrap();
        store.add("another@example.com", &ids(&["78", "78"])).unwrap();
        assert_eq!(store.count().unwrap(), 2);

        // Re-subscribing replaces leagues instead of duplicating
        store.add("fan@example.com", &ids(&["2"])).unwrap();
        assert_eq!(store.count().unwrap(), 2);

        let list = store.list().unwrap();
        assert_eq!(
            list,
            vec![
                Subscription {
                    email: "another@example.com".to_string(),
                    leagues: ids(&["78"]),
                },
                Subscription {
                    email: "fan@example.com".to_string(),
                    leagues: ids(&["2"]),
                },
            ]
        );

        assert!(matches!(
            store.add("not-an-email", &ids(&["39"])),
            Err(BrokoliError::InvalidEmail(_))
        ));
        assert!(matches!(
            store.add("x@example.com", &ids(&["12345"])),
            Err(BrokoliError::UnsupportedLeague { .. })
        ));
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_sqlite_store() {
        let mut store = SqliteSubscriptionStore::in_memory().unwrap();
        exercise_store(&mut store);
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemorySubscriptionStore::new();
        exercise_store(&mut store);
    }

    #[test]
    fn test_sqlite_store_persists_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("subs.db");

        {
            let mut store = SqliteSubscriptionStore::open(&path).unwrap();
            store.add("keeper@example.com", &ids(&["94"])).unwrap();
        }

        let store = SqliteSubscriptionStore::open(&path).unwrap();
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.list().unwrap()[0].leagues, ids(&["94"]));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  A@B.io ").unwrap(), "a@b.io");
        assert!(normalize_email("@b.io").is_err());
        assert!(normalize_email("a@").is_err());
        assert!(normalize_email("a@b@c").is_err());
        assert!(normalize_email("a b@c.io").is_err());
    }

    #[test]
    fn test_follows() {
        let all = Subscription {
            email: "a@b.io".to_string(),
            leagues: vec![],
        };
        assert!(all.follows("39"));

        let some = Subscription {
            email: "a@b.io".to_string(),
            leagues: ids(&["39"]),
        };
        assert!(some.follows("39"));
        assert!(!some.follows("140"));
    }
}
