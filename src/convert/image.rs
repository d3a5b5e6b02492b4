//! In-process raster image re-encoding.

use std::io::Cursor;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ImageFormat};
use mediamorph_common::{Error, Result};

use super::dispatcher::ConvertOptions;

/// In-process adapter re-encoding raster images with the `image` crate.
///
/// Exists for formats the external transcoder cannot reliably round-trip
/// (palette and alpha handling); audio/video never comes through here.
#[derive(Debug, Clone, Default)]
pub struct ImageConverter;

impl ImageConverter {
    pub fn new() -> Self {
        Self
    }

    /// Whether both formats have an in-process codec. SVG and camera RAW
    /// have neither a decoder nor an encoder here; conversions touching
    /// them go through the external tool.
    pub(crate) fn handles(from: &str, to: &str) -> bool {
        const EXTERNAL_ONLY: &[&str] = &["RAW", "SVG"];
        !EXTERNAL_ONLY.contains(&from) && !EXTERNAL_ONLY.contains(&to)
    }

    /// Re-encode `input` to the canonical target format.
    ///
    /// Undecodable input is `CorruptInput` (client error, re-upload);
    /// encoder failures are `ConversionFailed`. With `optimise` set, PNG
    /// output uses best compression and adaptive filtering — a lossless
    /// recompression, never a quality change.
    pub fn convert(&self, input: &[u8], to_format: &str, options: &ConvertOptions) -> Result<Vec<u8>> {
        let target = encoder_format(to_format)?;

        let img = image::load_from_memory(input).map_err(|e| Error::corrupt_input(e.to_string()))?;

        // Formats without alpha/palette support reject RGBA and paletted
        // buffers; flatten to plain RGB before encoding.
        let img = if supports_alpha(target) {
            img
        } else {
            DynamicImage::ImageRgb8(img.to_rgb8())
        };

        let mut buf = Cursor::new(Vec::new());
        let encode_result = if target == ImageFormat::Png && options.optimise {
            let encoder =
                PngEncoder::new_with_quality(&mut buf, CompressionType::Best, FilterType::Adaptive);
            img.write_with_encoder(encoder)
        } else {
            img.write_to(&mut buf, target)
        };

        encode_result.map_err(|e| Error::conversion_failed("image", e.to_string()))?;
        Ok(buf.into_inner())
    }
}

/// Map a canonical format tag to an `image` crate encoder format.
///
/// RAW and SVG have no in-process encoder; conversions *to* them fail here
/// (raster-to-SVG is already rejected by the compatibility matrix).
fn encoder_format(canonical: &str) -> Result<ImageFormat> {
    match canonical {
        "BMP" => Ok(ImageFormat::Bmp),
        "GIF" => Ok(ImageFormat::Gif),
        "JFIF" | "JPG" => Ok(ImageFormat::Jpeg),
        "PNG" => Ok(ImageFormat::Png),
        "TIF" => Ok(ImageFormat::Tiff),
        "WEBP" => Ok(ImageFormat::WebP),
        other => Err(Error::conversion_failed(
            "image",
            format!("no in-process encoder for {other}"),
        )),
    }
}

fn supports_alpha(format: ImageFormat) -> bool {
    !matches!(format, ImageFormat::Jpeg | ImageFormat::Bmp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_with_alpha() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([255, 0, 0, 128]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_png_to_jpeg_flattens_alpha() {
        let output = ImageConverter::new()
            .convert(&png_with_alpha(), "JPG", &ConvertOptions::default())
            .unwrap();

        let decoded = image::load_from_memory(&output).unwrap();
        assert_eq!(image::guess_format(&output).unwrap(), ImageFormat::Jpeg);
        assert_eq!(decoded.width(), 4);
    }

    #[test]
    fn test_png_roundtrip_keeps_alpha() {
        let output = ImageConverter::new()
            .convert(&png_with_alpha(), "PNG", &ConvertOptions::default())
            .unwrap();
        assert_eq!(image::guess_format(&output).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_optimise_produces_valid_png() {
        let options = ConvertOptions { optimise: true };
        let output = ImageConverter::new()
            .convert(&png_with_alpha(), "PNG", &options)
            .unwrap();
        assert!(image::load_from_memory(&output).is_ok());
    }

    #[test]
    fn test_handles_excludes_codec_less_formats() {
        assert!(ImageConverter::handles("PNG", "JPG"));
        assert!(ImageConverter::handles("GIF", "WEBP"));
        assert!(!ImageConverter::handles("SVG", "PNG"));
        assert!(!ImageConverter::handles("RAW", "JPG"));
        assert!(!ImageConverter::handles("PNG", "RAW"));
    }

    #[test]
    fn test_corrupt_input() {
        let err = ImageConverter::new()
            .convert(b"definitely not an image", "PNG", &ConvertOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::CorruptInput(_)));
    }

    #[test]
    fn test_no_encoder_for_raw() {
        let err = ImageConverter::new()
            .convert(&png_with_alpha(), "RAW", &ConvertOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::ConversionFailed { .. }));
    }
}
