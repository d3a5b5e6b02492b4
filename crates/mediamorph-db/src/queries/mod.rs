//! Database query modules.
//!
//! Low-level operations on an open connection (or transaction). Callers are
//! responsible for transaction boundaries; [`crate::store::SessionStore`]
//! wraps these in the transactional, sweep-first API the service uses.
//!
//! - sessions: session rows and expiry sweeping
//! - files: the single file record owned by each session

pub mod files;
pub mod sessions;
