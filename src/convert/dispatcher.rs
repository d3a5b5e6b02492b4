//! Conversion dispatcher: session/file lifecycle around the backends.

use std::path::Path;
use std::sync::Arc;

use mediamorph_av::Transcoder;
use mediamorph_common::{Error, Result, SessionId};
use mediamorph_db::store::SessionStore;
use mediamorph_formats::{FormatRegistry, MediaKind};
use tracing::{debug, info};

use super::image::ImageConverter;

/// Per-conversion options forwarded to the backend adapters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    /// Lossless-only recompression of the output where the codec allows it.
    pub optimise: bool,
}

/// Result of an upload: the session the file now lives under.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub session_id: SessionId,
    pub display_name: String,
    pub format: String,
}

/// A file handed back to the client.
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    pub display_name: String,
    pub media_type: String,
    pub contents: Vec<u8>,
}

/// Routes conversion requests to the correct backend and keeps persisted
/// state consistent with the outcome.
///
/// The per-file state machine is Uploaded -> Converting -> Converted; a
/// backend failure drops back to Uploaded (contents untouched, flag never
/// set), and Converted is terminal until the client re-uploads.
pub struct ConversionDispatcher {
    store: Arc<SessionStore>,
    registry: Arc<FormatRegistry>,
    image: ImageConverter,
    transcoder: Transcoder,
}

impl ConversionDispatcher {
    pub fn new(
        store: Arc<SessionStore>,
        registry: Arc<FormatRegistry>,
        transcoder: Transcoder,
    ) -> Self {
        Self {
            store,
            registry,
            image: ImageConverter::new(),
            transcoder,
        }
    }

    /// Store an uploaded file under the session the token resolves to.
    ///
    /// The format is taken from the file extension and must be supported;
    /// rejects with `UnsupportedFormat` before touching the store.
    pub fn upload(&self, token: &str, filename: &str, contents: Vec<u8>) -> Result<UploadOutcome> {
        let format = self.registry.resolve(extension_of(filename));
        if !self.registry.is_supported(&format) {
            return Err(Error::unsupported_format(format));
        }

        let (session_id, created) = self.store.get_or_create(token)?;
        self.store
            .upsert_file(session_id, filename, &format, contents)?;

        info!(%session_id, created, filename, %format, "stored upload");

        Ok(UploadOutcome {
            session_id,
            display_name: filename.to_string(),
            format,
        })
    }

    /// Convert the session's file to `target`, returning the new display
    /// name. Bytes are fetched separately via [`download`](Self::download).
    pub async fn convert(
        &self,
        session_id: SessionId,
        target: &str,
        options: &ConvertOptions,
    ) -> Result<String> {
        let file = self.store.get_file(session_id)?;
        if file.converted {
            return Err(Error::already_converted(session_id.to_string()));
        }

        let target = self.registry.resolve(target);
        if !self.registry.is_supported(&target) {
            return Err(Error::unsupported_format(target));
        }
        if !self.registry.is_valid_conversion(&file.format, &target) {
            return Err(Error::invalid_conversion(file.format, target));
        }

        // Backend selection follows the kind shared by the pair, not the
        // source alone: GIF→MP4 is a video conversion. Image pairs the
        // in-process codec cannot take (SVG, RAW) also shell out.
        let kind = self.registry.conversion_kind(&file.format, &target)?;
        let in_process = kind == MediaKind::Image && ImageConverter::handles(&file.format, &target);
        debug!(%session_id, from = %file.format, to = %target, %kind, in_process, "dispatching conversion");

        let output = if in_process {
            self.image.convert(&file.contents, &target, options)?
        } else {
            self.transcoder
                .convert(
                    &file.contents,
                    &file.format.to_lowercase(),
                    &target.to_lowercase(),
                )
                .await?
        };

        let new_name = renamed(&file.display_name, &target);
        self.store
            .complete_conversion(session_id, &new_name, &target, &output)?;

        info!(%session_id, %new_name, "conversion complete");
        Ok(new_name)
    }

    /// Fetch the session's current file, converted or not.
    pub fn download(&self, session_id: SessionId) -> Result<DownloadedFile> {
        let file = self.store.get_file(session_id)?;
        let media_type = self.registry.media_type_of(&file.format)?;

        Ok(DownloadedFile {
            display_name: file.display_name,
            media_type,
            contents: file.contents,
        })
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }
}

/// File extension after the last dot, or the empty string.
fn extension_of(filename: &str) -> &str {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
}

/// Swap a display name's extension for the target format's.
fn renamed(display_name: &str, target: &str) -> String {
    let stem = Path::new(display_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(display_name);
    format!("{}.{}", stem, target.to_lowercase())
}
