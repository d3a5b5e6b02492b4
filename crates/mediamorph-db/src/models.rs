//! Rust models matching the database schema.

use mediamorph_common::SessionId;

/// A live upload session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub session_id: SessionId,
    /// Unix seconds of the last mutating operation (upload or convert).
    pub last_activity: i64,
}

/// The single file owned by a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Derived key: `{display_name}|{session_id}`.
    pub file_id: String,
    pub session_id: SessionId,
    /// Name shown to the client; renamed on successful conversion.
    pub display_name: String,
    /// Canonical format tag, e.g. "PNG".
    pub format: String,
    pub contents: Vec<u8>,
    /// Set once by a successful conversion; terminal.
    pub converted: bool,
}

impl FileRecord {
    /// Derive the file key from a display name and owning session.
    pub fn derive_id(display_name: &str, session_id: SessionId) -> String {
        format!("{}|{}", display_name, session_id)
    }
}
