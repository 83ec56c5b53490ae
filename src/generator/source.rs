//! Common types for image sources

use async_trait::async_trait;
use image::DynamicImage;
use thiserror::Error;

/// Compute device the pipeline runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    /// GPU or other hardware accelerator
    Accelerated,
    /// Plain CPU execution
    Standard,
}

impl Device {
    /// Resolve a device from a configuration string ("auto", "accelerated", "standard")
    pub fn from_config(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "accelerated" | "cuda" | "gpu" => Self::Accelerated,
            "standard" | "cpu" => Self::Standard,
            _ => Self::detect(),
        }
    }

    /// Probe the host for an accelerator
    pub fn detect() -> Self {
        let has_cuda_env = std::env::var("CUDA_VISIBLE_DEVICES")
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false);

        if has_cuda_env || std::path::Path::new("/dev/nvidia0").exists() {
            Self::Accelerated
        } else {
            Self::Standard
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accelerated => "accelerated",
            Self::Standard => "standard",
        }
    }
}

/// Failure domains of an image source
///
/// `Load` covers everything that goes wrong while binding the pipeline
/// (missing weights, no accelerator driver, network fetch failure) and is
/// only possible at initialization. `Inference` covers per-request runtime
/// failures and leaves subsequent requests unaffected.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("model load failed: {0}")]
    Load(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

/// Which source produced an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Diffusion,
    Placeholder,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Diffusion => "diffusion",
            Self::Placeholder => "placeholder",
        }
    }
}

/// Trait for anything that can turn a prompt into an in-memory image
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Produce an image for the prompt
    async fn generate(&self, prompt: &str) -> Result<DynamicImage, SourceError>;
}
