//! Process-isolated transcode adapter.
//!
//! Converts audio/video bytes by shelling out to an external transcoder.
//! All intermediate files live in a [`TempDir`] scoped to one call, so they
//! are removed on success, failure, timeout, and panic alike.

use std::path::PathBuf;
use std::time::Duration;

use mediamorph_common::{Error, Result};
use tempfile::TempDir;
use tracing::debug;

use crate::command::ToolCommand;

/// Default hard wall-clock limit for one transcode.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Adapter around an external transcoder binary (ffmpeg by default).
#[derive(Debug, Clone)]
pub struct Transcoder {
    program: PathBuf,
    timeout: Duration,
}

impl Transcoder {
    /// Create an adapter for the given transcoder binary.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the wall-clock timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Convert `input` from one container format to another.
    ///
    /// Formats are file extensions as the transcoder understands them
    /// ("mov", "mp4"); the tool infers codecs from them. Nonzero exit or
    /// timeout surfaces as [`Error::ConversionFailed`] carrying the tool's
    /// diagnostics, and the input bytes held by the caller stay untouched.
    pub async fn convert(&self, input: &[u8], from_ext: &str, to_ext: &str) -> Result<Vec<u8>> {
        let workdir = TempDir::new().map_err(Error::Io)?;
        let input_path = workdir.path().join(format!("input.{}", from_ext.to_lowercase()));
        let output_path = workdir.path().join(format!("output.{}", to_ext.to_lowercase()));

        tokio::fs::write(&input_path, input).await.map_err(Error::Io)?;

        debug!(
            tool = %self.program.display(),
            from = from_ext,
            to = to_ext,
            "running external transcode"
        );

        ToolCommand::new(self.program.clone())
            .arg("-nostdin")
            .arg("-y")
            .arg("-i")
            .arg(input_path.to_string_lossy())
            .arg(output_path.to_string_lossy())
            .timeout(self.timeout)
            .execute()
            .await?;

        // A tool can exit 0 without producing output; treat that as failure
        // rather than returning empty bytes.
        tokio::fs::read(&output_path).await.map_err(|e| {
            Error::conversion_failed(
                self.program.to_string_lossy(),
                format!("produced no readable output: {e}"),
            )
        })

        // workdir drops here, removing both temp files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    /// Write an executable stub standing in for the transcoder.
    fn stub_tool(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("transcoder");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "#!/bin/sh\n{body}").unwrap();
        drop(file);
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn convert_reads_back_output() {
        let dir = TempDir::new().unwrap();
        // Args are: -nostdin -y -i IN OUT; copy input to output.
        let tool = stub_tool(&dir, r#"cp "$4" "$5""#);

        let result = Transcoder::new(tool)
            .convert(b"movie-bytes", "mov", "mp4")
            .await
            .unwrap();
        assert_eq!(result, b"movie-bytes");
    }

    #[tokio::test]
    async fn nonzero_exit_carries_diagnostics() {
        let dir = TempDir::new().unwrap();
        let tool = stub_tool(&dir, "echo 'unknown codec' >&2; exit 1");

        let err = Transcoder::new(tool)
            .convert(b"movie-bytes", "mov", "mp4")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ConversionFailed { .. }));
        assert!(err.to_string().contains("unknown codec"));
    }

    #[tokio::test]
    async fn timeout_is_a_conversion_failure() {
        let dir = TempDir::new().unwrap();
        let tool = stub_tool(&dir, "sleep 10");

        let err = Transcoder::new(tool)
            .with_timeout(Duration::from_millis(100))
            .convert(b"movie-bytes", "mov", "mp4")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn missing_output_is_a_conversion_failure() {
        let dir = TempDir::new().unwrap();
        let tool = stub_tool(&dir, "exit 0");

        let err = Transcoder::new(tool)
            .convert(b"movie-bytes", "mov", "mp4")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no readable output"));
    }
}
