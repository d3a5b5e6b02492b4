//! Transactional session store.
//!
//! Every public operation runs inside one rusqlite transaction that first
//! sweeps expired sessions, then does its work; commit and rollback are
//! all-or-nothing. Expiry is lazy by design: there is no background timer,
//! so a stale session survives only until the next store access.

use chrono::Utc;
use mediamorph_common::{Error, Result, SessionId};
use rusqlite::Transaction;

use crate::models::FileRecord;
use crate::pool::{get_conn, DbPool};
use crate::queries::{files, sessions};

/// Session token clients send to start a fresh session.
pub const NEW_SESSION_TOKEN: &str = "new";

/// Persisted session/file state behind a transactional API.
pub struct SessionStore {
    pool: DbPool,
    timeout_secs: i64,
}

impl SessionStore {
    /// Create a store over the given pool with a session expiry timeout.
    pub fn new(pool: DbPool, timeout_secs: i64) -> Self {
        Self { pool, timeout_secs }
    }

    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }

    /// Run `f` inside a transaction, sweeping expired sessions first.
    ///
    /// Any error rolls the whole transaction back, sweep included, and
    /// surfaces to the caller; storage errors are fatal to the request but
    /// not to the process.
    fn with_tx<T>(&self, now: i64, f: impl FnOnce(&Transaction<'_>) -> Result<T>) -> Result<T> {
        let mut conn = get_conn(&self.pool)?;
        let tx = conn
            .transaction()
            .map_err(|e| Error::storage(e.to_string()))?;

        sessions::delete_expired(&tx, now - self.timeout_secs)?;

        let value = f(&tx)?;
        tx.commit().map_err(|e| Error::storage(e.to_string()))?;
        Ok(value)
    }

    /// Resolve a session token, creating a session for [`NEW_SESSION_TOKEN`].
    ///
    /// Returns the session ID and whether it was newly created. Any token
    /// other than `"new"` must match a live session or the call fails with
    /// `SessionNotFound` — including tokens for sessions the sweep just
    /// removed.
    pub fn get_or_create(&self, token: &str) -> Result<(SessionId, bool)> {
        let now = self.now();
        self.with_tx(now, |tx| {
            if token == NEW_SESSION_TOKEN {
                let session_id = SessionId::new();
                sessions::insert_session(tx, session_id, now)?;
                return Ok((session_id, true));
            }

            let session_id: SessionId = token
                .parse()
                .map_err(|_| Error::session_not_found(token))?;
            if !sessions::session_exists(tx, session_id)? {
                return Err(Error::session_not_found(token));
            }
            Ok((session_id, false))
        })
    }

    /// Insert or overwrite the session's single file and refresh its
    /// activity timestamp, atomically.
    pub fn upsert_file(
        &self,
        session_id: SessionId,
        display_name: &str,
        format: &str,
        contents: Vec<u8>,
    ) -> Result<()> {
        let now = self.now();
        self.with_tx(now, |tx| {
            let record = FileRecord {
                file_id: FileRecord::derive_id(display_name, session_id),
                session_id,
                display_name: display_name.to_string(),
                format: format.to_string(),
                contents,
                converted: false,
            };
            files::upsert_file(tx, &record)?;
            sessions::touch_session(tx, session_id, now)
        })
    }

    /// Fetch the session's file, or `SessionNotFound` if the session has
    /// expired, never existed, or holds no file.
    pub fn get_file(&self, session_id: SessionId) -> Result<FileRecord> {
        let now = self.now();
        self.with_tx(now, |tx| {
            files::get_file(tx, session_id)?
                .ok_or_else(|| Error::session_not_found(session_id.to_string()))
        })
    }

    /// Record a successful conversion: replace contents, format, and
    /// display name, set the converted flag, and refresh session activity,
    /// all in one transaction.
    pub fn complete_conversion(
        &self,
        session_id: SessionId,
        display_name: &str,
        format: &str,
        contents: &[u8],
    ) -> Result<()> {
        let now = self.now();
        self.with_tx(now, |tx| {
            files::replace_converted(tx, session_id, display_name, format, contents)?;
            sessions::touch_session(tx, session_id, now)
        })
    }

    /// Configured expiry timeout in seconds.
    pub fn timeout_secs(&self) -> i64 {
        self.timeout_secs
    }
}
