//! Application settings and configuration management

use crate::error::{AppError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub generator: GeneratorConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Generator configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneratorConfig {
    /// Model identifier the pipeline is bound to
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL of the diffusion pipeline service
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Skip the model load entirely and always render placeholders
    #[serde(default)]
    pub placeholder_mode: bool,
    /// "auto", "accelerated", or "standard"
    #[serde(default = "default_device")]
    pub device: String,
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
    #[serde(default = "default_image_size")]
    pub width: u32,
    #[serde(default = "default_image_size")]
    pub height: u32,
}

fn default_model() -> String {
    "Lykon/DreamShaper".to_string()
}

fn default_endpoint() -> String {
    "http://127.0.0.1:7860".to_string()
}

fn default_device() -> String {
    "auto".to_string()
}

fn default_timeout() -> u64 {
    120_000
}

fn default_image_size() -> u32 {
    512
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Settings {
    /// Load settings from configuration files and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/default.toml")
    }

    /// Load settings from a specific configuration file path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port() as i64)?
            .set_default("generator.model", default_model())?
            .set_default("generator.endpoint", default_endpoint())?
            .set_default("generator.placeholder_mode", false)?
            .set_default("generator.device", default_device())?
            .set_default("generator.timeout_ms", default_timeout() as i64)?
            .set_default("generator.width", default_image_size() as i64)?
            .set_default("generator.height", default_image_size() as i64)?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", default_log_format())?
            // Load from configuration file
            .add_source(
                File::with_name(path.as_ref().to_str().unwrap_or("config/default"))
                    .required(false),
            )
            // Override with environment variables (prefixed with CV_)
            .add_source(
                Environment::with_prefix("CV")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut settings: Settings = config.try_deserialize()?;
        settings.apply_env_overrides();
        Ok(settings)
    }

    /// Apply the well-known flat environment variables
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("HOST") {
            if !host.is_empty() {
                self.server.host = host;
            }
        }
        if let Ok(port) = std::env::var("PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(flag) = std::env::var("CV_PLACEHOLDER_MODE") {
            self.generator.placeholder_mode = flag == "1";
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::Config(config::ConfigError::Message(
                "Server port cannot be 0".to_string(),
            )));
        }

        if self.generator.width == 0 || self.generator.height == 0 {
            return Err(AppError::Config(config::ConfigError::Message(
                "Image dimensions cannot be 0".to_string(),
            )));
        }

        if !self.generator.placeholder_mode && self.generator.endpoint.is_empty() {
            return Err(AppError::Config(config::ConfigError::Message(
                "Generator endpoint cannot be empty unless placeholder mode is enabled"
                    .to_string(),
            )));
        }

        if !["auto", "accelerated", "cuda", "gpu", "standard", "cpu"]
            .contains(&self.generator.device.to_lowercase().as_str())
        {
            return Err(AppError::Config(config::ConfigError::Message(format!(
                "Invalid device '{}'. Must be 'auto', 'accelerated', or 'standard'",
                self.generator.device
            ))));
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
            },
            generator: GeneratorConfig {
                model: default_model(),
                endpoint: default_endpoint(),
                placeholder_mode: false,
                device: default_device(),
                timeout_ms: default_timeout(),
                width: default_image_size(),
                height: default_image_size(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            },
        }
    }
}
