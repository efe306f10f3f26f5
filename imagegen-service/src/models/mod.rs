//! Domain models for the image generation service.

pub mod image_model;
pub mod query;

pub use image_model::{ImageModel, ResponseDecoding};
pub use query::GenerateQuery;
