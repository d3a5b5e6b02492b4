//! Session row operations.

use mediamorph_common::{Error, Result, SessionId};
use rusqlite::{params, Connection};

/// Insert a new session with the given activity timestamp.
pub fn insert_session(conn: &Connection, session_id: SessionId, now: i64) -> Result<()> {
    conn.execute(
        "INSERT INTO sessions (session_id, last_activity) VALUES (?, ?)",
        params![session_id.to_string(), now],
    )
    .map_err(|e| Error::storage(e.to_string()))?;
    Ok(())
}

/// Whether a session row exists.
pub fn session_exists(conn: &Connection, session_id: SessionId) -> Result<bool> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sessions WHERE session_id = ?",
            [session_id.to_string()],
            |row| row.get(0),
        )
        .map_err(|e| Error::storage(e.to_string()))?;
    Ok(count > 0)
}

/// Refresh a session's last-activity timestamp.
///
/// Returns `SessionNotFound` if no row matched.
pub fn touch_session(conn: &Connection, session_id: SessionId, now: i64) -> Result<()> {
    let updated = conn
        .execute(
            "UPDATE sessions SET last_activity = ? WHERE session_id = ?",
            params![now, session_id.to_string()],
        )
        .map_err(|e| Error::storage(e.to_string()))?;

    if updated == 0 {
        return Err(Error::session_not_found(session_id.to_string()));
    }
    Ok(())
}

/// Delete every session whose last activity is older than the cutoff,
/// cascading to its file. Returns the number of sessions removed.
pub fn delete_expired(conn: &Connection, cutoff: i64) -> Result<usize> {
    conn.execute(
        "DELETE FROM sessions WHERE last_activity < ?",
        params![cutoff],
    )
    .map_err(|e| Error::storage(e.to_string()))
}
