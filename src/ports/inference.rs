//! Inference port: global model loading and secure inference.
//!
//! The model itself (training, weights, encrypted evaluation) lives behind
//! this trait; the device only ever sees an opaque handle.

use crate::domain::{Ciphertext, PerturbedSequence};

/// Errors raised by the inference service.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InferenceError {
    #[error("Model not available: {0}")]
    ModelUnavailable(String),

    #[error("Inference failed: {0}")]
    Inference(String),
}

/// Opaque handle to a loaded global model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelHandle {
    pub model_id: String,

    /// Fingerprint of the loaded weights (NOT secret)
    pub fingerprint: String,

    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

/// Trait for the inference service.
pub trait InferenceEngine: Send + Sync {
    /// Load the global model.
    ///
    /// Idempotent; callers cache the handle for the lifetime of a session.
    ///
    /// # Errors
    /// Returns `InferenceError::ModelUnavailable` if the model cannot be loaded.
    fn load_model(&self, model_id: &str) -> Result<ModelHandle, InferenceError>;

    /// Run inference on an obfuscated payload.
    ///
    /// The prediction comes back sealed; only the device key opens it.
    ///
    /// # Errors
    /// Returns `InferenceError::Inference` if evaluation fails.
    fn infer(
        &self,
        model: &ModelHandle,
        payload: &PerturbedSequence,
    ) -> Result<Ciphertext, InferenceError>;
}
