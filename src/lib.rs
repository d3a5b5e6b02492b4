//! Mediamorph: session-scoped media conversion service.
//!
//! Clients upload a file under an ephemeral session, request one conversion
//! to another format, and download the result. The heavy lifting lives in
//! the member crates; this crate wires the conversion dispatcher, the
//! in-process image adapter, and the HTTP boundary together.

pub mod config;
pub mod convert;
pub mod server;
