//! HTTP client for the external text-to-image diffusion pipeline

use std::time::Duration;

use async_trait::async_trait;
use image::DynamicImage;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::generator::source::{ImageSource, SourceError};
use crate::response::base64;

/// Handle to a loaded diffusion pipeline.
///
/// The pipeline itself is an external collaborator reached over HTTP; this
/// type owns the connection and the model binding. It is constructed once at
/// process start and never reloaded.
pub struct DiffusionPipeline {
    model: String,
    endpoint: String,
    client: Client,
    width: u32,
    height: u32,
}

/// Request body understood by common diffusion serving APIs
#[derive(Debug, Serialize)]
struct PipelineRequest<'a> {
    prompt: &'a str,
    model: &'a str,
    width: u32,
    height: u32,
    n: u32,
    response_format: &'a str,
}

/// Response shapes produced by common diffusion serving APIs
#[derive(Debug, Deserialize)]
struct PipelineResponse {
    #[serde(default)]
    images: Vec<PipelineImage>,
    #[serde(default)]
    data: Vec<PipelineImage>,
    #[serde(default)]
    image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PipelineImage {
    #[serde(default)]
    b64_json: Option<String>,
    #[serde(default)]
    base64: Option<String>,
}

impl DiffusionPipeline {
    /// Bind the pipeline to the configured model and endpoint.
    ///
    /// Probes the endpoint before returning so that an unreachable or broken
    /// pipeline is reported as a load failure at startup rather than on the
    /// first request.
    pub async fn connect(config: &GeneratorConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| SourceError::Load(format!("failed to create HTTP client: {}", e)))?;

        let pipeline = Self {
            model: config.model.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            client,
            width: config.width,
            height: config.height,
        };

        pipeline.probe().await?;
        Ok(pipeline)
    }

    async fn probe(&self) -> Result<(), SourceError> {
        let url = format!("{}/health", self.endpoint);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Load(format!("pipeline unreachable at {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(SourceError::Load(format!(
                "pipeline at {} answered {}",
                url,
                response.status()
            )));
        }
        Ok(())
    }

    /// Extract the base64 image payload from whichever field the backend used
    fn image_payload(response: PipelineResponse) -> Option<String> {
        response
            .images
            .into_iter()
            .chain(response.data)
            .find_map(|img| img.b64_json.or(img.base64))
            .or(response.image)
    }
}

#[async_trait]
impl ImageSource for DiffusionPipeline {
    fn name(&self) -> &str {
        "diffusion"
    }

    async fn generate(&self, prompt: &str) -> Result<DynamicImage, SourceError> {
        let request = PipelineRequest {
            prompt,
            model: &self.model,
            width: self.width,
            height: self.height,
            n: 1,
            response_format: "b64_json",
        };

        // Try the generation paths common diffusion serving APIs expose
        let urls_to_try = [
            format!("{}/v1/images/generations", self.endpoint),
            format!("{}/generate", self.endpoint),
        ];

        let mut last_error = None;

        for url in &urls_to_try {
            debug!(model = %self.model, url = %url, "Sending pipeline request");

            match self.client.post(url).json(&request).send().await {
                Ok(response) if response.status().is_success() => {
                    let parsed: PipelineResponse = response.json().await.map_err(|e| {
                        SourceError::Inference(format!("failed to parse pipeline response: {}", e))
                    })?;

                    let payload = Self::image_payload(parsed).ok_or_else(|| {
                        SourceError::Inference("pipeline returned no image payload".to_string())
                    })?;

                    let bytes = base64::decode(&payload)
                        .map_err(|e| SourceError::Inference(e.to_string()))?;

                    return image::load_from_memory(&bytes).map_err(|e| {
                        SourceError::Inference(format!("pipeline returned an unreadable image: {}", e))
                    });
                }
                Ok(response) => {
                    last_error = Some(SourceError::Inference(format!(
                        "pipeline answered {} at {}",
                        response.status(),
                        url
                    )));
                }
                Err(e) => {
                    last_error = Some(SourceError::Inference(format!(
                        "pipeline request to {} failed: {}",
                        url, e
                    )));
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| SourceError::Inference("no generation URL configured".to_string())))
    }
}
