//! Mediamorph-Common: shared error taxonomy and identifiers.
//!
//! This crate provides the pieces every other mediamorph crate relies on:
//!
//! - **Typed IDs**: a type-safe UUID wrapper for sessions
//! - **Error Handling**: the conversion-service error taxonomy and result alias
//!
//! # Examples
//!
//! ```
//! use mediamorph_common::{Error, Result, SessionId};
//!
//! let session = SessionId::new();
//!
//! fn example() -> Result<()> {
//!     Err(Error::session_not_found("deadbeef"))
//! }
//! ```

pub mod error;
pub mod ids;

pub use error::{Error, Result};
pub use ids::SessionId;
