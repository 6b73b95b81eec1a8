pub mod client;
pub mod types;
pub mod vision;

pub use client::GeminiHttpClient;
pub use vision::GeminiVisionClient;
