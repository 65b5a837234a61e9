//! Subscriber Storage
//! Keeps the broadcast member list in SQLite.

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::info;

pub struct MemberStore {
    db_path: String,
}

impl MemberStore {
    /// Create a new member store and initialize database
    pub fn new(db_path: &str) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS members (
                chat_id INTEGER PRIMARY KEY,
                joined_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Register a chat. Returns true when the chat is new.
    pub fn add_member(&self, chat_id: i64) -> Result<bool> {
        let conn = Connection::open(&self.db_path)?;
        let inserted = conn
            .execute(
                "INSERT OR IGNORE INTO members (chat_id, joined_at) VALUES (?1, ?2)",
                params![chat_id, Utc::now().to_rfc3339()],
            )
            .context("Failed to insert member")?;

        if inserted > 0 {
            info!(chat_id, "new broadcast member registered");
        }
        Ok(inserted > 0)
    }

    /// All registered chat ids, oldest first.
    pub fn members(&self) -> Result<Vec<i64>> {
        let conn = Connection::open(&self.db_path)?;
        let mut stmt = conn.prepare("SELECT chat_id FROM members ORDER BY joined_at")?;
        let rows = stmt.query_map([], |row| row.get::<_, i64>(0))?;

        let mut members = Vec::new();
        for row in rows {
            members.push(row?);
        }
        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn registers_members_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("members.db");
        let store = MemberStore::new(path.to_str().unwrap()).unwrap();

        assert!(store.add_member(834).unwrap());
        assert!(!store.add_member(834).unwrap());
        assert!(store.add_member(101).unwrap());

        let members = store.members().unwrap();
        assert_eq!(members.len(), 2);
        assert!(members.contains(&834));
        assert!(members.contains(&101));
    }
}
