use crate::services::InferenceError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors surfaced by the generate endpoint. Bodies are plain text.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Prompt is required")]
    MissingPrompt,

    #[error("Invalid model")]
    InvalidModel,

    #[error("Invalid response format from model")]
    InvalidResponseFormat,

    #[error("Error generating image: {}", message_or_unknown(.0))]
    Generation(#[from] InferenceError),
}

fn message_or_unknown(err: &InferenceError) -> String {
    let message = err.to_string();
    if message.is_empty() {
        "Unknown error".to_string()
    } else {
        message
    }
}

impl ImageError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ImageError::MissingPrompt | ImageError::InvalidModel => StatusCode::BAD_REQUEST,
            ImageError::InvalidResponseFormat | ImageError::Generation(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ImageError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.to_string(),
        )
            .into_response()
    }
}
