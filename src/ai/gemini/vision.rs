use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentRequest, GenerateContentResponse, InlineData, Part};
use crate::ai::VisionService;
use crate::image::DecodedImage;
use crate::Result;
use async_trait::async_trait;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub struct GeminiVisionClient {
    http: GeminiHttpClient,
}

impl GeminiVisionClient {
    pub fn new(api_key: String, model: String) -> Result<Self> {
        Ok(Self {
            http: GeminiHttpClient::new(api_key, model, REQUEST_TIMEOUT)?,
        })
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    fn build_request(image: &DecodedImage, prompt: &str) -> GenerateContentRequest {
        use base64::Engine as _;
        let base64_image = base64::engine::general_purpose::STANDARD.encode(&image.data);

        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: image.mime_type.to_string(),
                            data: base64_image,
                        },
                    },
                    Part::Text {
                        text: prompt.to_string(),
                    },
                ],
            }],
        }
    }
}

#[async_trait]
impl VisionService for GeminiVisionClient {
    async fn describe(&self, image: &DecodedImage, prompt: &str) -> Result<String> {
        tracing::debug!(
            "Sending {} image ({} bytes) to Gemini model {}",
            image.mime_type,
            image.data.len(),
            self.http.model()
        );

        let request = Self::build_request(image, prompt);
        let response: GenerateContentResponse = self.http.generate_content(&request).await?;

        let text = response.text();
        if text.is_empty() {
            tracing::warn!(
                "Gemini returned no text (reason: {})",
                response.stop_reason().unwrap_or("unspecified")
            );
        }

        Ok(text)
    }

    fn model(&self) -> &str {
        self.http.model()
    }
}
