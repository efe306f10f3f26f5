//! Inference provider abstraction and implementations.
//!
//! The generate handler only talks to [`InferenceProvider`], so the hosted
//! Workers AI backend can be swapped for a scripted mock in tests.

pub mod mock;
pub mod workers_ai;

pub use mock::MockInferenceProvider;
pub use workers_ai::{WorkersAiConfig, WorkersAiProvider};

use crate::models::ImageModel;
use async_trait::async_trait;
use axum::body::Bytes;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use thiserror::Error;
use tokio_stream::Stream;

/// Error type for inference calls.
///
/// All variants except `NotConfigured` display the bare upstream message.
#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Network(String),

    #[error("{0}")]
    Decode(String),

    #[error("Inference provider not configured: {0}")]
    NotConfigured(String),
}

impl InferenceError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            InferenceError::Upstream(_) => "upstream",
            InferenceError::Network(_) => "network",
            InferenceError::Decode(_) => "decode",
            InferenceError::NotConfigured(_) => "not_configured",
        }
    }
}

/// Type alias for raw image byte streams.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, InferenceError>> + Send>>;

/// Input sent to a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InferenceParams {
    pub prompt: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

impl InferenceParams {
    /// Build the parameter set a given model expects.
    pub fn for_model(model: ImageModel, prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            seed: model.seed(),
        }
    }
}

/// One entry of the list-shaped base64 result.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Base64Datum {
    #[serde(default)]
    pub base64: Option<String>,
}

/// Structured result carrying an image as base64 text.
///
/// The image has been observed both directly on `image` and nested under
/// `data[0].base64`, so both are accepted.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Base64Payload {
    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub data: Option<Vec<Base64Datum>>,
}

/// Result of a model invocation.
pub enum InferenceOutput {
    /// Image bytes, streamed as they arrive.
    Stream(ByteStream),

    /// Structured result with a base64-encoded image.
    Base64(Base64Payload),
}

impl std::fmt::Debug for InferenceOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InferenceOutput::Stream(_) => f.write_str("InferenceOutput::Stream(..)"),
            InferenceOutput::Base64(payload) => {
                f.debug_tuple("InferenceOutput::Base64").field(payload).finish()
            }
        }
    }
}

/// Trait for text-to-image inference backends.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Run a model once with the given parameters.
    async fn run(
        &self,
        model: ImageModel,
        params: &InferenceParams,
    ) -> Result<InferenceOutput, InferenceError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), InferenceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_is_omitted_when_absent() {
        let seeded = InferenceParams::for_model(ImageModel::Speed, "a fox");
        let unseeded = InferenceParams::for_model(ImageModel::ConceptArt, "a fox");

        assert_eq!(
            serde_json::to_value(&seeded).unwrap(),
            serde_json::json!({ "prompt": "a fox", "seed": 100 })
        );
        assert_eq!(
            serde_json::to_value(&unseeded).unwrap(),
            serde_json::json!({ "prompt": "a fox" })
        );
    }

    #[test]
    fn payload_accepts_both_shapes() {
        let direct: Base64Payload =
            serde_json::from_value(serde_json::json!({ "image": "AAAA" })).unwrap();
        assert_eq!(direct.image.as_deref(), Some("AAAA"));

        let nested: Base64Payload =
            serde_json::from_value(serde_json::json!({ "data": [{ "base64": "BBBB" }] }))
                .unwrap();
        assert_eq!(
            nested.data.unwrap()[0].base64.as_deref(),
            Some("BBBB")
        );
    }

    #[test]
    fn upstream_error_displays_bare_message() {
        let err = InferenceError::Upstream("quota exceeded".to_string());
        assert_eq!(err.to_string(), "quota exceeded");
        assert_eq!(err.kind(), "upstream");
    }
}
