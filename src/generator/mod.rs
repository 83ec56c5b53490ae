//! Generator facade - diffusion pipeline with placeholder fallback

pub mod pipeline;
pub mod placeholder;
pub mod source;

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::GeneratorConfig;
use crate::error::{AppError, Result};
use pipeline::DiffusionPipeline;
use placeholder::PlaceholderRenderer;
use source::{Device, ImageSource, SourceError, SourceKind};

/// A finished generation: PNG bytes plus the source that produced them
pub struct GeneratedImage {
    pub png: Vec<u8>,
    pub source: SourceKind,
}

/// Run counters, reported by the health endpoint
#[derive(Debug, Default, Clone, Serialize)]
pub struct GeneratorStats {
    pub images_generated: u64,
    pub placeholder_images: u64,
    pub pipeline_fallbacks: u64,
}

/// Snapshot of the generator for status reporting
#[derive(Debug, Clone, Serialize)]
pub struct GeneratorStatus {
    pub model: String,
    pub device: &'static str,
    pub model_loaded: bool,
    pub placeholder_mode: bool,
    pub stats: GeneratorStats,
}

/// Owns the optional pipeline handle and the placeholder renderer.
///
/// Constructed once before the server accepts traffic; the pipeline binding
/// is read-only afterwards. Only the run counters are mutated per request.
pub struct Generator {
    model: String,
    device: Device,
    force_placeholder: bool,
    pipeline: Option<DiffusionPipeline>,
    placeholder: PlaceholderRenderer,
    stats: RwLock<GeneratorStats>,
}

impl Generator {
    /// Initialize the generator, attempting the model load unless placeholder
    /// mode is forced.
    ///
    /// A load failure is logged and swallowed: the process continues in
    /// degraded placeholder-only mode indefinitely, with no retry.
    pub async fn initialize(config: &GeneratorConfig) -> Self {
        let device = Device::from_config(&config.device);

        let pipeline = if config.placeholder_mode {
            info!("Placeholder mode enabled; skipping model load");
            None
        } else {
            info!(model = %config.model, device = device.as_str(), "Loading model");
            match DiffusionPipeline::connect(config).await {
                Ok(pipeline) => {
                    info!(model = %config.model, "Model loaded successfully");
                    Some(pipeline)
                }
                Err(err) => {
                    warn!(error = %err, "Falling back to placeholder image generation");
                    None
                }
            }
        };

        Self {
            model: config.model.clone(),
            device,
            force_placeholder: config.placeholder_mode,
            pipeline,
            placeholder: PlaceholderRenderer::new(config.width, config.height),
            stats: RwLock::new(GeneratorStats::default()),
        }
    }

    pub fn model_loaded(&self) -> bool {
        self.pipeline.is_some()
    }

    pub fn placeholder_mode(&self) -> bool {
        self.force_placeholder
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn status(&self) -> GeneratorStatus {
        GeneratorStatus {
            model: self.model.clone(),
            device: self.device.as_str(),
            model_loaded: self.model_loaded(),
            placeholder_mode: self.force_placeholder,
            stats: self.stats.read().clone(),
        }
    }

    /// Produce PNG bytes for a prompt.
    ///
    /// A pipeline failure never propagates: the request transparently falls
    /// back to the placeholder and the outcome is recorded in `source`. The
    /// only error this can return is a PNG encoding failure.
    pub async fn generate(&self, prompt: &str) -> Result<GeneratedImage> {
        let (image, source) = match &self.pipeline {
            Some(pipeline) if !self.force_placeholder => match pipeline.generate(prompt).await {
                Ok(image) => (image, SourceKind::Diffusion),
                Err(SourceError::Inference(reason)) => {
                    warn!(%reason, "Falling back to placeholder after pipeline failure");
                    self.stats.write().pipeline_fallbacks += 1;
                    (self.render_placeholder(prompt), SourceKind::Placeholder)
                }
                Err(SourceError::Load(reason)) => {
                    warn!(%reason, "Pipeline lost its binding; using placeholder");
                    self.stats.write().pipeline_fallbacks += 1;
                    (self.render_placeholder(prompt), SourceKind::Placeholder)
                }
            },
            _ => (self.render_placeholder(prompt), SourceKind::Placeholder),
        };

        let png = encode_png(&image)?;

        let mut stats = self.stats.write();
        stats.images_generated += 1;
        if source == SourceKind::Placeholder {
            stats.placeholder_images += 1;
        }
        drop(stats);

        Ok(GeneratedImage { png, source })
    }

    fn render_placeholder(&self, prompt: &str) -> DynamicImage {
        DynamicImage::ImageRgb8(self.placeholder.render(prompt))
    }
}

/// Encode an in-memory image as PNG bytes
fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| AppError::Generation(format!("PNG encoding failed: {}", e)))?;
    Ok(buffer.into_inner())
}
