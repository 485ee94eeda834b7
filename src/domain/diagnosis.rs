//! Diagnosis labels reported to the patient after local inference.

use serde::{Deserialize, Serialize};

/// Cleartext label recovered from an inference result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosisLabel {
    Healthy,
    UrgentCareNeeded,
}

impl DiagnosisLabel {
    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Healthy => "No significant cardiac risk indicators",
            Self::UrgentCareNeeded => "Please seek medical attention as soon as possible",
        }
    }
}

impl std::fmt::Display for DiagnosisLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "Healthy"),
            Self::UrgentCareNeeded => write!(f, "Urgent Care Needed"),
        }
    }
}

/// Diagnosis reported at the end of an offline visit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnosis {
    /// Anonymized visit identifier
    pub visit_id: String,

    pub label: DiagnosisLabel,

    /// Timestamp of diagnosis
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Diagnosis {
    #[must_use]
    pub fn new(visit_id: impl Into<String>, label: DiagnosisLabel) -> Self {
        Self {
            visit_id: visit_id.into(),
            label,
            created_at: chrono::Utc::now(),
        }
    }
}

/// Generate an anonymized visit identifier (UUID v4 format) using a CSPRNG.
#[must_use]
pub fn new_visit_id() -> String {
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::from_entropy();
    let bytes: [u8; 16] = rng.gen();

    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3],
        bytes[4], bytes[5],
        (bytes[6] & 0x0f) | 0x40, bytes[7],
        (bytes[8] & 0x3f) | 0x80, bytes[9],
        bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15]
    )
}
