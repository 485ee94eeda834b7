//! Simulated inference service.
//!
//! Scores the obfuscated payload with a toy GC-content heuristic and seals
//! the score for the device key. No real model is evaluated.

use crate::domain::{compute_fingerprint, Ciphertext, PerturbedSequence};
use crate::ports::{InferenceEngine, InferenceError, ModelHandle};

/// Inference service that seals results for `recipient_fingerprint`.
#[derive(Debug, Clone)]
pub struct SimulatedInferenceEngine {
    recipient_fingerprint: String,
}

impl SimulatedInferenceEngine {
    #[must_use]
    pub fn new(recipient_fingerprint: impl Into<String>) -> Self {
        Self {
            recipient_fingerprint: recipient_fingerprint.into(),
        }
    }
}

/// Share of `G`/`C` symbols in `payload`, 0.0 for an empty payload.
fn gc_content(payload: &str) -> f64 {
    let total = payload.chars().count();
    if total == 0 {
        return 0.0;
    }
    let gc = payload.chars().filter(|c| matches!(c, 'G' | 'C')).count();
    gc as f64 / total as f64
}

impl InferenceEngine for SimulatedInferenceEngine {
    fn load_model(&self, model_id: &str) -> Result<ModelHandle, InferenceError> {
        if model_id.trim().is_empty() {
            return Err(InferenceError::ModelUnavailable("empty model id".into()));
        }

        let handle = ModelHandle {
            model_id: model_id.to_string(),
            fingerprint: compute_fingerprint(model_id.as_bytes()),
            loaded_at: chrono::Utc::now(),
        };
        tracing::info!(model = %handle.model_id, fingerprint = %handle.fingerprint, "Global model loaded");
        Ok(handle)
    }

    fn infer(
        &self,
        model: &ModelHandle,
        payload: &PerturbedSequence,
    ) -> Result<Ciphertext, InferenceError> {
        if payload.is_empty() {
            return Err(InferenceError::Inference("empty payload".into()));
        }

        let score = gc_content(payload.as_str());
        tracing::debug!(model = %model.model_id, "Secure inference evaluated");

        Ok(Ciphertext::sealed(
            format!("risk={score:.3}").into_bytes(),
            self.recipient_fingerprint.clone(),
        ))
    }
}
