//! Mediamorph-AV: external transcoder plumbing.
//!
//! Wraps the external audio/video transcoder (ffmpeg by default) behind a
//! process-isolated adapter: input bytes go to a scoped temp file, the tool
//! runs under a hard wall-clock timeout, and the output file is read back
//! into memory. Temp files are cleaned up on every exit path.
//!
//! - `command` - Timeout-bounded subprocess runner
//! - `tools` - External tool discovery
//! - `transcode` - The [`Transcoder`] adapter itself

pub mod command;
pub mod tools;
pub mod transcode;

pub use command::{ToolCommand, ToolOutput};
pub use tools::{check_tool, resolve_tool_path, ToolInfo};
pub use transcode::Transcoder;
