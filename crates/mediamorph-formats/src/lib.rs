//! Mediamorph-Formats: supported-format registry and compatibility matrix.
//!
//! The registry is immutable process-wide configuration: built once at
//! startup, shared behind an `Arc`, never mutated at runtime. It answers
//! four questions:
//!
//! - What is the canonical tag for a raw format string (alias resolution)?
//! - Is a format supported at all?
//! - Which media kind does a format belong to?
//! - Is a given (from, to) conversion pair allowed?

mod registry;

pub use registry::{FormatRegistry, MediaKind};
