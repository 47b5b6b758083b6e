//! Analytics rows and the aggregate queries that feed them.
//!
//! Each row is a JSON payload addressed by a unique key. Rows are replaced
//! wholesale; nothing is updated incrementally.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rusqlite::params;
use serde_json::Value;

use crate::database::Database;
use crate::error::Result;
use crate::row;

impl Database {
    /// Insert or fully replace the payload stored under `key`.
    pub fn put_analytics(&self, key: &str, data: &Value) -> Result<()> {
        self.conn().execute(
            "INSERT INTO analytics (key, data) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET data = excluded.data",
            params![key, serde_json::to_string(data)?],
        )?;
        Ok(())
    }

    /// Insert `data` under `key` only if the key has no row yet.
    /// Returns `true` when a row was written.
    pub fn seed_analytics(&self, key: &str, data: &Value) -> Result<bool> {
        let affected = self.conn().execute(
            "INSERT OR IGNORE INTO analytics (key, data) VALUES (?1, ?2)",
            params![key, serde_json::to_string(data)?],
        )?;
        Ok(affected > 0)
    }

    /// Payloads for the requested keys. Missing keys are absent from the map.
    pub fn get_analytics(&self, keys: &[&str]) -> Result<BTreeMap<String, Value>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT key, data FROM analytics WHERE key = ?1")?;

        let mut out = BTreeMap::new();
        for key in keys {
            let rows = stmt.query_map(params![key], |row| {
                Ok((row.get::<_, String>(0)?, row::json::<Value>(row, 1)?))
            })?;
            for entry in row::collect(rows)? {
                out.insert(entry.0, entry.1);
            }
        }
        Ok(out)
    }

    // ------------------------------------------------------------------
    // Aggregates
    // ------------------------------------------------------------------

    /// `(status, count)` pairs ordered by status.
    pub fn count_proposals_by_status(&self) -> Result<Vec<(String, i64)>> {
        let mut stmt = self.conn().prepare(
            "SELECT status, COUNT(*) FROM proposals GROUP BY status ORDER BY status ASC",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        Ok(row::collect(rows)?)
    }

    /// `(username, count)` of proposals per current owner, busiest first.
    pub fn count_proposals_by_owner(&self) -> Result<Vec<(String, i64)>> {
        let mut stmt = self.conn().prepare(
            "SELECT u.username, COUNT(*) AS n
             FROM proposals p JOIN users u ON u.id = p.owner_id
             GROUP BY u.username
             ORDER BY n DESC, u.username ASC",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        Ok(row::collect(rows)?)
    }

    /// Creation timestamps of proposals created at or after `since`.
    pub fn proposal_creation_times_since(&self, since: DateTime<Utc>) -> Result<Vec<DateTime<Utc>>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT created_at FROM proposals WHERE created_at >= ?1")?;
        let rows = stmt.query_map(params![since.to_rfc3339()], |row| row::timestamp(row, 0))?;
        Ok(row::collect(rows)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn put_replaces_and_seed_does_not() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.seed_analytics("k", &json!([])).unwrap());
        assert!(!db.seed_analytics("k", &json!([1])).unwrap());
        assert_eq!(db.get_analytics(&["k"]).unwrap()["k"], json!([]));

        db.put_analytics("k", &json!({"a": 1})).unwrap();
        assert_eq!(db.get_analytics(&["k"]).unwrap()["k"], json!({"a": 1}));
    }

    #[test]
    fn unknown_keys_are_skipped() {
        let db = Database::open_in_memory().unwrap();
        db.put_analytics("present", &json!(1)).unwrap();
        let map = db.get_analytics(&["present", "absent"]).unwrap();
        assert_eq!(map.len(), 1);
    }
}
