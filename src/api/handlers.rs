//! Request handlers

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::response::base64;
use crate::AppState;

/// Body of `POST /generate`
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Body of a successful generation
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub image: String,
}

/// Handle `POST /generate`.
///
/// A missing body, malformed JSON, or an empty prompt are all the same
/// client error; pipeline failures never surface here because the generator
/// falls back to the placeholder internally.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>> {
    let Json(request) = payload.map_err(|_| AppError::PromptRequired)?;

    let prompt = request.prompt.unwrap_or_default();
    if prompt.trim().is_empty() {
        return Err(AppError::PromptRequired);
    }

    let request_id = Uuid::new_v4();
    info!(%request_id, prompt = %prompt, "Generating image");

    let output = state.generator.generate(&prompt).await?;
    info!(
        %request_id,
        source = output.source.as_str(),
        bytes = output.png.len(),
        "Image generated"
    );

    Ok(Json(GenerateResponse {
        image: base64::encode(&output.png),
    }))
}

/// Handle `GET /health`. Reports the generator state and run counters.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let status = state.generator.status();
    let uptime_secs = (Utc::now() - state.started_at).num_seconds().max(0);

    Json(json!({
        "status": "ok",
        "generator": status,
        "started_at": state.started_at.to_rfc3339(),
        "uptime_secs": uptime_secs,
    }))
}
