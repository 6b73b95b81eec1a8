//! Vision model integration
//!
//! Sends a decoded upload plus the analysis prompt to a multimodal model and
//! returns its free-text answer.

pub mod gemini;
pub mod mime;
pub mod mock;

pub use gemini::GeminiVisionClient;
pub use mock::MockVisionClient;

use crate::image::DecodedImage;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait VisionService: Send + Sync {
    /// Ask the model about `image`. The returned text may be empty; callers
    /// decide what an empty answer means.
    async fn describe(&self, image: &DecodedImage, prompt: &str) -> Result<String>;

    /// Model identifier, for logging.
    fn model(&self) -> &str;
}
