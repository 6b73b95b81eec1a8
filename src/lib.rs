//! Shoe analyzer - HTTP service for a shoe-drying kiosk
//!
//! Accepts an uploaded photo of a shoe, asks a Gemini multimodal model to
//! classify it and recommend a drying time, and relays the model's answer.

pub mod ai;
pub mod app;
pub mod error;
pub mod image;
pub mod models;
pub mod prompts;
pub mod server;

pub use error::{Error, Result};
