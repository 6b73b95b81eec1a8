//! Scripted vision client for tests and local harnesses.

use super::VisionService;
use crate::image::DecodedImage;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Scripted reply for [`MockVisionClient`].
#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Failure(String),
}

/// In-memory [`VisionService`] for tests and local harnesses.
///
/// Replies are served in order and cycle once exhausted. With no scripted
/// replies it answers with a fixed two-line Thai result.
#[derive(Clone)]
pub struct MockVisionClient {
    replies: Arc<Mutex<Vec<MockReply>>>,
    call_count: Arc<Mutex<usize>>,
    last_prompt: Arc<Mutex<Option<String>>>,
}

pub const DEFAULT_MOCK_RESULT: &str = "รองเท้าผ้าใบ (ความหนาปานกลาง)\nเวลาที่แนะนำ: 40 นาที";

impl MockVisionClient {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            last_prompt: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_response(self, response: String) -> Self {
        self.replies.lock().unwrap().push(MockReply::Text(response));
        self
    }

    /// Queue an upstream failure carrying `message`.
    pub fn with_error(self, message: String) -> Self {
        self.replies.lock().unwrap().push(MockReply::Failure(message));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

impl Default for MockVisionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VisionService for MockVisionClient {
    async fn describe(&self, _image: &DecodedImage, prompt: &str) -> Result<String> {
        let count = {
            let mut count = self.call_count.lock().unwrap();
            *count += 1;
            *count
        };
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());

        let replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Ok(DEFAULT_MOCK_RESULT.to_string());
        }

        match &replies[(count - 1) % replies.len()] {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Failure(message) => Err(Error::AiProvider(message.clone())),
        }
    }

    fn model(&self) -> &str {
        "mock-vision"
    }
}
