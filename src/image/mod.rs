//! Upload decoding
//!
//! Turns raw upload bytes into a [`DecodedImage`] ready to forward to the
//! vision model, or rejects them as [`crate::Error::InvalidImage`].

pub mod decoder;

pub use decoder::decode_upload;

use image::ImageFormat;

/// A successfully decoded upload.
///
/// `data` holds the bytes to send upstream: the original upload for formats
/// Gemini understands, a PNG re-encoding otherwise.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub mime_type: &'static str,
    pub data: Vec<u8>,
}
