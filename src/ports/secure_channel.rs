//! Secure channel port: encrypt for the hospital, decrypt inference results.
//!
//! Both operations are total. Implementations must not keep shared mutable
//! state between calls.

use crate::domain::{Ciphertext, DiagnosisLabel, KeyToken};

/// Trait for the device's cryptographic collaborator.
pub trait SecureChannel: Send + Sync {
    /// Seal `payload` for the holder of `recipient`.
    fn encrypt(&self, payload: &[u8], recipient: &KeyToken) -> Ciphertext;

    /// Open an inference result with the device's private key.
    fn decrypt(&self, ciphertext: &Ciphertext, private_key: &KeyToken) -> DiagnosisLabel;
}
