//! Format tables, alias resolution, and the conversion compatibility matrix.

use std::collections::HashMap;

use mediamorph_common::{Error, Result};
use serde::{Deserialize, Serialize};

/// Coarse media category a format belongs to. Conversions never cross kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Raster and vector still images.
    Image,
    /// Video containers.
    Video,
    /// Audio containers.
    Audio,
}

impl MediaKind {
    /// Lowercase name used in MIME-style media type strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical format tables in declaration order. GIF appears under both
/// image and video; kind lookups resolve to the first entry (image).
const KINDS: &[(MediaKind, &[&str])] = &[
    (
        MediaKind::Image,
        &["BMP", "GIF", "JFIF", "JPG", "PNG", "RAW", "SVG", "TIF", "WEBP"],
    ),
    (
        MediaKind::Video,
        &["AVI", "FLV", "GIF", "MKV", "MOV", "MP4", "WMV"],
    ),
    (
        MediaKind::Audio,
        &["AAC", "FLAC", "MP3", "OGG", "WAV", "WMA"],
    ),
];

/// Alias spellings mapped to their canonical tag (many-to-one).
const ALIASES: &[(&str, &[&str])] = &[
    ("JPG", &["JPEG", "JPE"]),
    ("RAW", &["CR2", "NEF", "ARW"]),
    ("SVG", &["SVGZ"]),
    ("TIF", &["TIFF"]),
    ("MP4", &["M4V"]),
    ("AAC", &["M4A"]),
    ("OGG", &["OGA"]),
];

/// Immutable registry of supported formats and allowed conversions.
pub struct FormatRegistry {
    alias_to_canonical: HashMap<&'static str, &'static str>,
    /// Ordered (from, to) pairs disallowed even within one media kind.
    invalid_pairs: Vec<(&'static str, &'static str)>,
}

impl FormatRegistry {
    /// Build the registry from the built-in tables.
    pub fn builtin() -> Self {
        let mut alias_to_canonical = HashMap::new();
        for (canonical, aliases) in ALIASES {
            for alias in *aliases {
                alias_to_canonical.insert(*alias, *canonical);
            }
        }

        // Rasterized pixels cannot become vector paths.
        let invalid_pairs = Self::kind_formats(MediaKind::Image)
            .iter()
            .filter(|f| **f != "SVG")
            .map(|f| (*f, "SVG"))
            .collect();

        Self {
            alias_to_canonical,
            invalid_pairs,
        }
    }

    fn kind_formats(kind: MediaKind) -> &'static [&'static str] {
        KINDS
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, formats)| *formats)
            .unwrap_or(&[])
    }

    /// Resolve a raw format string to its canonical tag.
    ///
    /// Uppercases the input and applies the alias table. Unknown formats
    /// pass through unchanged; validation is deferred to callers so that
    /// lookups and conversions can report `UnsupportedFormat` with the
    /// exact string the client sent.
    pub fn resolve(&self, raw: &str) -> String {
        let upper = raw.to_uppercase();
        match self.alias_to_canonical.get(upper.as_str()) {
            Some(canonical) => (*canonical).to_string(),
            None => upper,
        }
    }

    /// True iff the (resolved) format appears in any media-kind set.
    pub fn is_supported(&self, format: &str) -> bool {
        let resolved = self.resolve(format);
        KINDS.iter().any(|(_, formats)| formats.contains(&resolved.as_str()))
    }

    /// The media kind of a format, taking the first kind in declaration
    /// order when a format belongs to more than one (GIF -> image).
    pub fn media_kind_of(&self, format: &str) -> Result<MediaKind> {
        let resolved = self.resolve(format);
        KINDS
            .iter()
            .find(|(_, formats)| formats.contains(&resolved.as_str()))
            .map(|(kind, _)| *kind)
            .ok_or_else(|| Error::unsupported_format(resolved))
    }

    /// Every media kind containing the format, in declaration order.
    fn media_kinds_of(&self, resolved: &str) -> Vec<MediaKind> {
        KINDS
            .iter()
            .filter(|(_, formats)| formats.contains(&resolved))
            .map(|(kind, _)| *kind)
            .collect()
    }

    /// The media kind a conversion runs under: the first kind in
    /// declaration order containing both formats. GIF→MP4 is a video
    /// conversion even though GIF alone reads as an image.
    ///
    /// Errors as `InvalidConversion` when the formats share no kind.
    pub fn conversion_kind(&self, from: &str, to: &str) -> Result<MediaKind> {
        let from = self.resolve(from);
        let to = self.resolve(to);
        let to_kinds = self.media_kinds_of(&to);
        self.media_kinds_of(&from)
            .into_iter()
            .find(|kind| to_kinds.contains(kind))
            .ok_or_else(|| Error::invalid_conversion(from, to))
    }

    /// Whether converting `from` into `to` is allowed.
    ///
    /// Both sides are resolved first. A pair is valid iff both formats are
    /// supported, the pair is not blacklisted, and the two formats share at
    /// least one media kind. Formats living in two kinds (GIF) are
    /// convertible from either side.
    pub fn is_valid_conversion(&self, from: &str, to: &str) -> bool {
        let from = self.resolve(from);
        let to = self.resolve(to);

        if !self.is_supported(&from) || !self.is_supported(&to) {
            return false;
        }
        if self
            .invalid_pairs
            .iter()
            .any(|(f, t)| *f == from && *t == to)
        {
            return false;
        }

        let from_kinds = self.media_kinds_of(&from);
        self.media_kinds_of(&to)
            .iter()
            .any(|kind| from_kinds.contains(kind))
    }

    /// All canonical formats, in registry declaration order, deduplicated.
    pub fn all_formats(&self) -> Vec<&'static str> {
        let mut seen = Vec::new();
        for (_, formats) in KINDS {
            for format in *formats {
                if !seen.contains(format) {
                    seen.push(*format);
                }
            }
        }
        seen
    }

    /// Valid conversion targets for a format, in declaration order.
    pub fn valid_targets(&self, format: &str) -> Result<Vec<&'static str>> {
        let resolved = self.resolve(format);
        if !self.is_supported(&resolved) {
            return Err(Error::unsupported_format(resolved));
        }

        Ok(self
            .all_formats()
            .into_iter()
            .filter(|target| self.is_valid_conversion(&resolved, target))
            .collect())
    }

    /// MIME-style media type string for download responses, e.g. "image/png".
    pub fn media_type_of(&self, format: &str) -> Result<String> {
        let resolved = self.resolve(format);
        let kind = self.media_kind_of(&resolved)?;
        Ok(format!("{}/{}", kind, resolved.to_lowercase()))
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
