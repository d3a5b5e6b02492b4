//! Conversion dispatch and the in-process image adapter.
//!
//! The dispatcher enforces the per-file state machine (one conversion per
//! upload cycle) and routes work to the right backend: raster images with
//! an in-process codec are re-encoded directly; audio, video, and formats
//! the codec lacks (SVG, RAW) go through the external transcoder.

mod dispatcher;
mod image;

pub use self::dispatcher::{ConversionDispatcher, ConvertOptions, DownloadedFile, UploadOutcome};
pub use self::image::ImageConverter;
