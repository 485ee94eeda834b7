//! Simulated secure channel.
//!
//! Stands in for the real public-key primitive. It provides NO
//! confidentiality: the payload is wrapped, tagged and addressed to the
//! recipient's fingerprint, nothing more. Swap this adapter for a real one
//! behind the same `SecureChannel` port.

use crate::domain::{Ciphertext, DiagnosisLabel, KeyToken};
use crate::ports::SecureChannel;

/// Placeholder channel used until a real primitive is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedSecureChannel;

impl SimulatedSecureChannel {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SecureChannel for SimulatedSecureChannel {
    fn encrypt(&self, payload: &[u8], recipient: &KeyToken) -> Ciphertext {
        tracing::debug!(
            recipient = %recipient.fingerprint,
            size_bytes = payload.len(),
            "Sealing payload (simulated channel)"
        );
        Ciphertext::sealed(payload.to_vec(), recipient.fingerprint.clone())
    }

    /// The label depends only on the ciphertext tag.
    fn decrypt(&self, ciphertext: &Ciphertext, private_key: &KeyToken) -> DiagnosisLabel {
        if ciphertext.is_sealed() && ciphertext.recipient_fingerprint != private_key.fingerprint {
            tracing::debug!(
                recipient = %ciphertext.recipient_fingerprint,
                key = %private_key.fingerprint,
                "Ciphertext addressed to a different key (ignored by simulated channel)"
            );
        }

        if ciphertext.is_sealed() {
            DiagnosisLabel::Healthy
        } else {
            DiagnosisLabel::UrgentCareNeeded
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CiphertextTag;

    fn key(token: &str) -> KeyToken {
        KeyToken::from_token(token).expect("valid token")
    }

    #[test]
    fn test_encrypt_tags_and_addresses() {
        let channel = SimulatedSecureChannel::new();
        let hospital = key("HOSP_PUB_123");
        let ct = channel.encrypt(b"AAACCGAAC", &hospital);

        assert_eq!(ct.tag, CiphertextTag::Sealed);
        assert_eq!(ct.recipient_fingerprint, hospital.fingerprint);
        assert_eq!(ct.body(), b"AAACCGAAC");
    }

    #[test]
    fn test_encrypt_is_deterministic() {
        let channel = SimulatedSecureChannel::new();
        let hospital = key("HOSP_PUB_123");
        assert_eq!(
            channel.encrypt(b"ACGT", &hospital),
            channel.encrypt(b"ACGT", &hospital)
        );
    }

    #[test]
    fn test_decrypt_depends_only_on_tag() {
        let channel = SimulatedSecureChannel::new();
        let robot = key("ROBOT_PRIV_456");

        let sealed = Ciphertext::sealed(b"risk=0.1".to_vec(), "someone-else");
        assert_eq!(channel.decrypt(&sealed, &robot), DiagnosisLabel::Healthy);

        // Content that merely looks like an envelope is not one.
        let raw = Ciphertext::raw(b"ENCRYPTED[...]".to_vec());
        assert_eq!(
            channel.decrypt(&raw, &robot),
            DiagnosisLabel::UrgentCareNeeded
        );
    }
}
