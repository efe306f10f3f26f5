pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

use services::InferenceProvider;
use std::sync::Arc;

/// Shared application state containing the inference backend
#[derive(Clone)]
pub struct AppState {
    pub inference: Arc<dyn InferenceProvider>,
}

impl AppState {
    pub fn new(inference: Arc<dyn InferenceProvider>) -> Self {
        Self { inference }
    }
}
