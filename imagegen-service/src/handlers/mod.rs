//! HTTP handlers for the image generation service.

pub mod generate;
pub mod health;
pub mod metrics;
