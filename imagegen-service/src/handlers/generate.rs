//! The image generation endpoint.
//!
//! Validates `prompt` and `model`, runs the selected model once and turns its
//! result into an `image/jpeg` body. Raw results are streamed through as they
//! arrive; base64 results are decoded in full first.

use crate::error::ImageError;
use crate::models::{GenerateQuery, ImageModel, ResponseDecoding};
use crate::services::{decode, metrics, InferenceOutput, InferenceParams};
use crate::AppState;
use axum::{
    body::Body,
    extract::{rejection::QueryRejection, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use std::time::Instant;

pub async fn generate_image(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response {
    let query: GenerateQuery = match query {
        Ok(Query(pairs)) => pairs.into_iter().collect(),
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Malformed query string");
            GenerateQuery::default()
        }
    };

    tracing::info!(
        prompt_len = query.prompt().map_or(0, str::len),
        model = query.model().unwrap_or("default"),
        "Image generation request"
    );

    let (label, result) = match validate(&query) {
        Ok((model, prompt)) => (model.label(), generate(&state, model, prompt).await),
        Err(e) => ("invalid", Err(e)),
    };

    let response = result.unwrap_or_else(IntoResponse::into_response);
    metrics::record_image_request(label, response.status().as_u16());
    response
}

/// Prompt is checked before model.
fn validate(query: &GenerateQuery) -> Result<(ImageModel, &str), ImageError> {
    let prompt = query.prompt().ok_or(ImageError::MissingPrompt)?;
    let model = ImageModel::resolve(query.model()).map_err(|_| ImageError::InvalidModel)?;
    Ok((model, prompt))
}

async fn generate(
    state: &AppState,
    model: ImageModel,
    prompt: &str,
) -> Result<Response, ImageError> {
    let params = InferenceParams::for_model(model, prompt);

    let start = Instant::now();
    let output = state.inference.run(model, &params).await;
    metrics::record_inference_latency(model.label(), start.elapsed().as_secs_f64());

    let output = output.map_err(|e| {
        tracing::error!(model = %model, error = %e, "Error generating image");
        metrics::record_inference_error(model.label(), e.kind());
        e
    })?;

    let body = match (model.decoding(), output) {
        (ResponseDecoding::RawStream, InferenceOutput::Stream(stream)) => Body::from_stream(stream),
        (ResponseDecoding::Base64Field, InferenceOutput::Base64(payload)) => {
            let encoded = decode::extract_base64_image(&payload).ok_or_else(|| {
                tracing::error!(
                    model = %model,
                    has_data = payload.data.is_some(),
                    "Unexpected response format: no base64 image field"
                );
                ImageError::InvalidResponseFormat
            })?;

            Body::from(decode::decode_base64_image(encoded).map_err(|e| {
                tracing::error!(model = %model, error = %e, "Error generating image");
                metrics::record_inference_error(model.label(), e.kind());
                e
            })?)
        }
        (decoding, _) => {
            tracing::error!(
                model = %model,
                expected = ?decoding,
                "Unexpected response format"
            );
            return Err(ImageError::InvalidResponseFormat);
        }
    };

    Ok(([(header::CONTENT_TYPE, "image/jpeg")], body).into_response())
}
