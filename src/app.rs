//! Request orchestration for shoe analysis.

use crate::ai::{GeminiVisionClient, VisionService};
use crate::image::decode_upload;
use crate::models::Config;
use crate::{prompts, Error, Result};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shared, immutable-after-startup handle used by every request.
///
/// `vision` is `None` when the Gemini client could not be built at startup;
/// the service then stays in the unconfigured mode until restarted.
#[derive(Clone)]
pub struct App {
    vision: Option<Arc<dyn VisionService>>,
    prompt: Arc<str>,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub vision: Option<Arc<dyn VisionService>>,
    pub prompt: String,
}

impl App {
    /// Build an app from concrete service dependencies.
    pub fn with_services(services: AppServices) -> Self {
        Self {
            vision: services.vision,
            prompt: Arc::from(services.prompt),
        }
    }

    /// Construct an app from configuration.
    ///
    /// Failing to build the Gemini client is logged and leaves the app
    /// unconfigured; only an unreadable prompt override is fatal.
    pub fn from_config(config: &Config) -> Result<Self> {
        let prompt = prompts::load(config.prompt_file.as_deref())?;

        let vision = match Self::build_vision_client(config) {
            Ok(client) => {
                info!("Vision provider: Gemini (model: {})", client.model());
                Some(Arc::new(client) as Arc<dyn VisionService>)
            }
            Err(e) => {
                error!("Error initializing Gemini client: {}", e);
                warn!("Analyze requests will fail until restarted with a valid GEMINI_API_KEY");
                None
            }
        };

        Ok(Self::with_services(AppServices { vision, prompt }))
    }

    fn build_vision_client(config: &Config) -> Result<GeminiVisionClient> {
        let api_key = config
            .gemini_api_key
            .clone()
            .ok_or_else(|| Error::Config("GEMINI_API_KEY not set".to_string()))?;
        GeminiVisionClient::new(api_key, config.gemini_model.clone())
    }

    pub fn is_configured(&self) -> bool {
        self.vision.is_some()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Fails fast with [`Error::NotConfigured`] when no vision client exists.
    pub fn ensure_configured(&self) -> Result<()> {
        self.vision().map(|_| ())
    }

    fn vision(&self) -> Result<&dyn VisionService> {
        self.vision.as_deref().ok_or(Error::NotConfigured)
    }

    /// Analyze one uploaded image and return the model's answer.
    ///
    /// Outcomes: [`Error::NotConfigured`] before the upload is looked at,
    /// [`Error::InvalidImage`] without calling the model, and an upstream
    /// error when the model call fails or answers with empty text.
    pub async fn analyze(&self, upload: Vec<u8>) -> Result<String> {
        let vision = self.vision()?;
        let image = decode_upload(upload).await?;

        info!(
            "Analyzing {}x{} {} upload with {}",
            image.width,
            image.height,
            image.mime_type,
            vision.model()
        );

        let text = vision.describe(&image, &self.prompt).await.map_err(|e| {
            error!("Gemini API Error: {}", e);
            e
        })?;

        if text.is_empty() {
            error!("Gemini API Error: {}", Error::EmptyResponse);
            return Err(Error::EmptyResponse);
        }

        Ok(text)
    }
}
