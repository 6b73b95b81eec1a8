use image::ImageFormat;

/// MIME type for formats Gemini accepts as inline image data.
///
/// Returns `None` for decodable formats that must be re-encoded before upload.
pub fn gemini_mime_type(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Png => Some("image/png"),
        ImageFormat::WebP => Some("image/webp"),
        _ => None,
    }
}

/// Format used when an upload has to be re-encoded for Gemini.
pub const FALLBACK_FORMAT: ImageFormat = ImageFormat::Png;
pub const FALLBACK_MIME: &str = "image/png";
