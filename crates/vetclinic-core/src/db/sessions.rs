//! Session token database operations.
//!
//! Only SHA-256 digests of bearer tokens are stored; the cleartext token
//! exists solely in the response that issued it.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};

/// A stored session record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub token_hash: String,
    pub actor_kind: String,
    pub actor_id: String,
    pub issued_at: String,
}

impl Database {
    /// Persist a session for an authenticated actor.
    pub fn insert_session(&self, token_hash: &str, actor_kind: &str, actor_id: &str) -> DbResult<()> {
        self.conn.execute(
            "INSERT INTO sessions (token_hash, actor_kind, actor_id) VALUES (?1, ?2, ?3)",
            params![token_hash, actor_kind, actor_id],
        )?;
        Ok(())
    }

    /// Look up a session by token digest.
    pub fn get_session(&self, token_hash: &str) -> DbResult<Option<SessionRecord>> {
        self.conn
            .query_row(
                "SELECT token_hash, actor_kind, actor_id, issued_at FROM sessions WHERE token_hash = ?",
                [token_hash],
                |row| {
                    Ok(SessionRecord {
                        token_hash: row.get(0)?,
                        actor_kind: row.get(1)?,
                        actor_id: row.get(2)?,
                        issued_at: row.get(3)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// Revoke a session. Returns whether one existed.
    pub fn delete_session(&self, token_hash: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM sessions WHERE token_hash = ?", [token_hash])?;
        Ok(rows_affected > 0)
    }
}
