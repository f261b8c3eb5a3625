//! Embedded cover art.
//!
//! Cover bytes are kept as-is; pixel dimensions are decoded lazily from the
//! image header the first time they are asked for.

use std::io::Cursor;
use std::sync::OnceLock;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use lofty::picture::{MimeType, Picture};

use crate::error::Result;

/// Edge length (pixels) of a correctly sized cover.
pub const COVER_EDGE: u32 = 500;

/// JPEG quality of resized covers
pub const COVER_JPEG_QUALITY: u8 = 90;

/// Cover art extracted from (or destined for) a tag container
#[derive(Debug, Clone)]
pub struct CoverArt {
    data: Vec<u8>,
    mime_type: String,
    dimensions: OnceLock<Option<(u32, u32)>>,
}

impl CoverArt {
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
            dimensions: OnceLock::new(),
        }
    }

    pub(crate) fn from_picture(picture: &Picture) -> Self {
        Self::new(picture.data().to_vec(), mime_name(picture.mime_type()))
    }

    /// Raw image bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// MIME type (image/jpeg, image/png)
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Pixel (width, height), or `None` if the bytes are not a decodable image.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        *self.dimensions.get_or_init(|| probe_dimensions(&self.data))
    }

    pub fn is_decodable(&self) -> bool {
        self.dimensions().is_some()
    }
}

fn probe_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

/// Resize a cover to exactly [`COVER_EDGE`]x[`COVER_EDGE`] and re-encode it as JPEG.
pub fn normalize_cover(data: &[u8]) -> Result<Vec<u8>> {
    let image = image::load_from_memory(data)?;
    let resized = image.resize_exact(COVER_EDGE, COVER_EDGE, FilterType::Lanczos3);

    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());
    let mut out = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut out, COVER_JPEG_QUALITY))?;
    Ok(out)
}

/// Map a MIME string onto lofty's picture MIME type
pub(crate) fn mime_from_str(mime: &str) -> MimeType {
    match mime.to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => MimeType::Jpeg,
        "image/png" => MimeType::Png,
        "image/gif" => MimeType::Gif,
        "image/bmp" => MimeType::Bmp,
        "image/tiff" => MimeType::Tiff,
        other => MimeType::Unknown(other.to_string()),
    }
}

pub(crate) fn mime_name(mime: Option<&MimeType>) -> String {
    match mime {
        Some(MimeType::Jpeg) => "image/jpeg".to_string(),
        Some(MimeType::Png) => "image/png".to_string(),
        Some(MimeType::Gif) => "image/gif".to_string(),
        Some(MimeType::Bmp) => "image/bmp".to_string(),
        Some(MimeType::Tiff) => "image/tiff".to_string(),
        Some(MimeType::Unknown(s)) => s.clone(),
        _ => "image/jpeg".to_string(), // Default assumption
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::png_bytes;
    use image::{ImageFormat, Rgb, RgbImage};

    #[test]
    fn test_dimensions_of_png() {
        let cover = CoverArt::new(png_bytes(500, 500), "image/png");
        assert_eq!(cover.dimensions(), Some((500, 500)));
        assert!(cover.is_decodable());
    }

    #[test]
    fn test_garbage_is_not_decodable() {
        let cover = CoverArt::new(b"definitely not an image".to_vec(), "image/jpeg");
        assert_eq!(cover.dimensions(), None);
        assert!(!cover.is_decodable());
    }

    #[test]
    fn test_normalize_cover_produces_500_jpeg() {
        let resized = normalize_cover(&png_bytes(640, 480)).unwrap();
        let cover = CoverArt::new(resized, "image/jpeg");
        assert_eq!(cover.dimensions(), Some((COVER_EDGE, COVER_EDGE)));
        assert_eq!(
            image::guess_format(cover.data()).unwrap(),
            ImageFormat::Jpeg
        );
    }

    #[test]
    fn test_normalize_cover_encodes_at_quality_90() {
        let gradient = RgbImage::from_fn(640, 480, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8])
        });
        let mut png = Vec::new();
        DynamicImage::ImageRgb8(gradient)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();

        let resized = normalize_cover(&png).unwrap();

        let source = image::load_from_memory(&png).unwrap();
        let rgb = DynamicImage::ImageRgb8(
            source
                .resize_exact(COVER_EDGE, COVER_EDGE, FilterType::Lanczos3)
                .to_rgb8(),
        );
        let mut expected = Vec::new();
        rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut expected, 90))
            .unwrap();
        let mut default_quality = Vec::new();
        rgb.write_to(&mut Cursor::new(&mut default_quality), ImageFormat::Jpeg)
            .unwrap();

        assert_eq!(resized, expected);
        assert!(resized.len() > default_quality.len());
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(normalize_cover(b"nope").is_err());
    }

    #[test]
    fn test_mime_mapping() {
        assert_eq!(mime_from_str("image/PNG"), MimeType::Png);
        assert_eq!(mime_name(Some(&MimeType::Jpeg)), "image/jpeg");
        assert_eq!(mime_name(None), "image/jpeg");
        assert_eq!(
            mime_name(Some(&mime_from_str("image/webp"))),
            "image/webp"
        );
    }
}
