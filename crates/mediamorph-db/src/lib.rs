//! Mediamorph-DB: session persistence for the conversion service.
//!
//! SQLite with rusqlite and r2d2 connection pooling. Two tables: sessions
//! and their single owned file (cascade delete). Expired sessions are swept
//! lazily at the start of every store operation; there is no background
//! timer.
//!
//! # Modules
//!
//! - `migrations` - Embedded schema migrations
//! - `pool` - Connection pool management
//! - `models` - Rust models matching the schema
//! - `queries` - Low-level query operations on a connection
//! - `store` - Transactional [`store::SessionStore`] the service talks to
//!
//! # Example
//!
//! ```no_run
//! use mediamorph_db::pool::init_pool;
//! use mediamorph_db::store::SessionStore;
//!
//! let pool = init_pool("/var/lib/mediamorph/db.sqlite").unwrap();
//! let store = SessionStore::new(pool, 600);
//! let (session_id, created) = store.get_or_create("new").unwrap();
//! assert!(created);
//! # let _ = session_id;
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
pub mod store;
