//! Configuration module

pub mod settings;

pub use settings::{GeneratorConfig, LoggingConfig, ServerConfig, Settings};
