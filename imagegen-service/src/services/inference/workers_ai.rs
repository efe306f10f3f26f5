//! Cloudflare Workers AI provider implementation.
//!
//! Calls `POST {base}/accounts/{account}/ai/run/{model}`. Stream-decoded
//! models answer with the image body directly; base64-decoded models answer
//! with the standard `{ success, result, errors }` JSON envelope.

use super::{
    Base64Payload, InferenceError, InferenceOutput, InferenceParams, InferenceProvider,
};
use crate::models::{ImageModel, ResponseDecoding};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use serde::Deserialize;

/// Workers AI REST API base URL.
pub const WORKERS_AI_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Workers AI provider configuration.
#[derive(Debug, Clone)]
pub struct WorkersAiConfig {
    pub account_id: String,
    pub api_token: String,
    pub base_url: String,
}

/// Workers AI inference provider.
pub struct WorkersAiProvider {
    config: WorkersAiConfig,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    #[serde(default)]
    success: bool,
    result: Option<T>,
    #[serde(default)]
    errors: Vec<ApiMessage>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    code: Option<i64>,
    message: String,
}

impl WorkersAiProvider {
    pub fn new(config: WorkersAiConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Build the run URL for the given model.
    fn run_url(&self, model: ImageModel) -> String {
        format!(
            "{}/accounts/{}/ai/run/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.account_id,
            model.id()
        )
    }

    async fn read_envelope(
        response: reqwest::Response,
    ) -> Result<Base64Payload, InferenceError> {
        let envelope: ApiEnvelope<Base64Payload> = response
            .json()
            .await
            .map_err(|e| InferenceError::Decode(format!("Failed to parse response: {}", e)))?;

        match envelope {
            ApiEnvelope {
                success: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiEnvelope { errors, .. } => Err(InferenceError::Upstream(
                first_error_message(&errors)
                    .unwrap_or_else(|| "Workers AI request failed".to_string()),
            )),
        }
    }
}

fn first_error_message(errors: &[ApiMessage]) -> Option<String> {
    let first = errors.first()?;
    tracing::debug!(code = ?first.code, message = %first.message, "Workers AI reported an error");
    Some(first.message.clone())
}

/// Turn a non-success response into a message, preferring the API's own.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body)
        .ok()
        .and_then(|envelope| first_error_message(&envelope.errors))
        .unwrap_or_else(|| format!("{}: {}", status, body))
}

fn is_json(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

#[async_trait]
impl InferenceProvider for WorkersAiProvider {
    async fn run(
        &self,
        model: ImageModel,
        params: &InferenceParams,
    ) -> Result<InferenceOutput, InferenceError> {
        let url = self.run_url(model);

        tracing::debug!(
            model = %model,
            prompt_len = params.prompt.len(),
            seed = ?params.seed,
            "Sending request to Workers AI"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_token)
            .json(params)
            .send()
            .await
            .map_err(|e| InferenceError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Upstream(error_message(status, &body)));
        }

        match model.decoding() {
            // A JSON body here is not an image; hand it back as structured so
            // the caller can reject it.
            ResponseDecoding::RawStream if is_json(&response) => {
                Self::read_envelope(response).await.map(InferenceOutput::Base64)
            }
            ResponseDecoding::RawStream => {
                let stream = response
                    .bytes_stream()
                    .map(|chunk| chunk.map_err(|e| InferenceError::Network(e.to_string())));
                Ok(InferenceOutput::Stream(Box::pin(stream)))
            }
            ResponseDecoding::Base64Field => {
                Self::read_envelope(response).await.map(InferenceOutput::Base64)
            }
        }
    }

    async fn health_check(&self) -> Result<(), InferenceError> {
        if self.config.account_id.is_empty() {
            Err(InferenceError::NotConfigured(
                "Workers AI account id not configured".to_string(),
            ))
        } else if self.config.api_token.is_empty() {
            Err(InferenceError::NotConfigured(
                "Workers AI API token not configured".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(base_url: &str) -> WorkersAiProvider {
        WorkersAiProvider::new(WorkersAiConfig {
            account_id: "acct".to_string(),
            api_token: "token".to_string(),
            base_url: base_url.to_string(),
        })
    }

    #[test]
    fn run_url_includes_account_and_model() {
        assert_eq!(
            provider("https://api.cloudflare.com/client/v4/").run_url(ImageModel::ConceptArt),
            "https://api.cloudflare.com/client/v4/accounts/acct/ai/run/@cf/black-forest-labs/flux-1-schnell"
        );
    }

    #[test]
    fn error_message_prefers_api_errors() {
        let body = r#"{"success":false,"result":null,"errors":[{"code":3036,"message":"quota exceeded"}]}"#;
        assert_eq!(
            error_message(StatusCode::TOO_MANY_REQUESTS, body),
            "quota exceeded"
        );
    }

    #[test]
    fn error_message_falls_back_to_status_and_body() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "upstream down"),
            "502 Bad Gateway: upstream down"
        );
    }

    #[tokio::test]
    async fn health_check_requires_credentials() {
        assert!(provider(WORKERS_AI_API_BASE).health_check().await.is_ok());

        let missing = WorkersAiProvider::new(WorkersAiConfig {
            account_id: String::new(),
            api_token: "token".to_string(),
            base_url: WORKERS_AI_API_BASE.to_string(),
        });
        assert!(matches!(
            missing.health_check().await,
            Err(InferenceError::NotConfigured(_))
        ));
    }
}
