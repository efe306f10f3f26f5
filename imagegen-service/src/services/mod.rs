pub mod decode;
pub mod inference;
pub mod metrics;

pub use inference::{
    InferenceError, InferenceOutput, InferenceParams, InferenceProvider, MockInferenceProvider,
    WorkersAiProvider,
};
