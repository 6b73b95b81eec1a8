use super::DecodedImage;
use crate::ai::mime::{gemini_mime_type, FALLBACK_FORMAT, FALLBACK_MIME};
use crate::{Error, Result};
use image::{ColorType, DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;

fn decode_sync(bytes: Vec<u8>) -> Result<DecodedImage> {
    if bytes.is_empty() {
        return Err(Error::InvalidImage("upload is empty".to_string()));
    }

    let reader = ImageReader::new(Cursor::new(bytes.as_slice()))
        .with_guessed_format()
        .map_err(|e| Error::InvalidImage(e.to_string()))?;

    let format = reader
        .format()
        .ok_or_else(|| Error::InvalidImage("unrecognized image format".to_string()))?;

    let image = reader
        .decode()
        .map_err(|e| Error::InvalidImage(e.to_string()))?;

    let (mime_type, data) = match gemini_mime_type(format) {
        Some(mime_type) => (mime_type, bytes),
        None => {
            tracing::debug!("Re-encoding {:?} upload as {:?}", format, FALLBACK_FORMAT);
            (FALLBACK_MIME, reencode(&image)?)
        }
    };

    Ok(DecodedImage {
        format,
        width: image.width(),
        height: image.height(),
        mime_type,
        data,
    })
}

/// PNG has no floating-point color types; HDR sources are narrowed to 8 bits.
fn png_compatible(image: &DynamicImage) -> Option<DynamicImage> {
    match image.color() {
        ColorType::Rgb32F => Some(DynamicImage::ImageRgb8(image.to_rgb8())),
        ColorType::Rgba32F => Some(DynamicImage::ImageRgba8(image.to_rgba8())),
        _ => None,
    }
}

fn reencode(image: &DynamicImage) -> Result<Vec<u8>> {
    let converted = png_compatible(image);
    let source = converted.as_ref().unwrap_or(image);

    let mut bytes = Vec::new();
    source
        .write_to(&mut Cursor::new(&mut bytes), FALLBACK_FORMAT)
        .map_err(|e| Error::Invariant(format!("Failed to re-encode image: {}", e)))?;
    Ok(bytes)
}

/// Decode an uploaded file as an image.
///
/// Decoding is CPU-bound, so it runs on the blocking pool.
pub async fn decode_upload(bytes: Vec<u8>) -> Result<DecodedImage> {
    let size = bytes.len();
    let decoded = tokio::task::spawn_blocking(move || decode_sync(bytes))
        .await
        .map_err(|e| Error::Invariant(format!("Image decoding task join error: {}", e)))?;

    match &decoded {
        Ok(image) => tracing::debug!(
            "Decoded {:?} upload ({} bytes, {}x{})",
            image.format,
            size,
            image.width,
            image.height
        ),
        Err(e) => tracing::warn!("Rejected upload of {} bytes: {}", size, e),
    }

    decoded
}

/// Encodes a solid test image in `format`.
#[cfg(test)]
pub(crate) fn encode_test_image(format: ImageFormat) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(10, 10, image::Rgb([255, 0, 0]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
    bytes
}
