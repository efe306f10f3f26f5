//! Mock inference provider for testing.

use super::{
    Base64Payload, InferenceError, InferenceOutput, InferenceParams, InferenceProvider,
};
use crate::models::ImageModel;
use async_trait::async_trait;
use axum::body::Bytes;
use std::sync::Mutex;

/// What the mock hands back from `run`.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Raw image bytes, delivered as a two-chunk stream.
    Image(Vec<u8>),

    /// Structured base64 result.
    Base64(Base64Payload),

    /// Upstream failure with the given message.
    Fail(String),
}

/// A recorded `run` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub model: ImageModel,
    pub params: InferenceParams,
}

/// Mock provider with a fixed reply and a call log.
pub struct MockInferenceProvider {
    enabled: bool,
    reply: MockReply,
    calls: Mutex<Vec<MockCall>>,
}

impl MockInferenceProvider {
    pub fn new(enabled: bool) -> Self {
        // Placeholder image bytes
        Self::with_reply(MockReply::Image(vec![0u8; 1024])).enabled(enabled)
    }

    pub fn with_reply(reply: MockReply) -> Self {
        Self {
            enabled: true,
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Calls received so far, oldest first.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl InferenceProvider for MockInferenceProvider {
    async fn run(
        &self,
        model: ImageModel,
        params: &InferenceParams,
    ) -> Result<InferenceOutput, InferenceError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(MockCall {
                model,
                params: params.clone(),
            });
        }

        if !self.enabled {
            return Err(InferenceError::NotConfigured(
                "Mock inference provider not enabled".to_string(),
            ));
        }

        match &self.reply {
            MockReply::Image(bytes) => {
                let (head, tail) = bytes.split_at(bytes.len() / 2);
                let chunks: Vec<Result<Bytes, InferenceError>> = vec![
                    Ok(Bytes::copy_from_slice(head)),
                    Ok(Bytes::copy_from_slice(tail)),
                ];

                Ok(InferenceOutput::Stream(Box::pin(tokio_stream::iter(chunks))))
            }
            MockReply::Base64(payload) => Ok(InferenceOutput::Base64(payload.clone())),
            MockReply::Fail(message) => Err(InferenceError::Upstream(message.clone())),
        }
    }

    async fn health_check(&self) -> Result<(), InferenceError> {
        if self.enabled {
            Ok(())
        } else {
            Err(InferenceError::NotConfigured(
                "Mock inference provider not enabled".to_string(),
            ))
        }
    }
}
