//! ConcreteVision image generation service
//!
//! An HTTP service that turns a text prompt into a PNG image by delegating
//! to an external diffusion pipeline, falling back to a deterministic
//! placeholder image when the pipeline cannot be loaded or an inference
//! call fails.

pub mod api;
pub mod config;
pub mod error;
pub mod generator;
pub mod response;

pub use error::{AppError, Result};

use std::sync::Arc;

use chrono::{DateTime, Utc};

use generator::Generator;

/// Application state shared across all handlers
pub struct AppState {
    pub settings: config::Settings,
    pub generator: Arc<Generator>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(settings: config::Settings, generator: Arc<Generator>) -> Self {
        Self {
            settings,
            generator,
            started_at: Utc::now(),
        }
    }
}
