//! Holdall Core Library
//!
//! This crate provides the configuration, backend discriminator, and result
//! models shared across the Holdall upload pipeline.

pub mod backend;
pub mod config;
pub mod constants;
pub mod models;

// Re-export commonly used types
pub use backend::AssetBackend;
pub use config::Config;
pub use models::{AssetData, AssetInfoFallback, AssetMeta};
