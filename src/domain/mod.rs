//! Domain layer: Core types and the Diff-DNA privacy transform.
//!
//! This module contains pure Rust types with no I/O. The transform
//! (`mnt` + `npi` + `obfuscation`) is total and deterministic.

mod crypto;
mod diagnosis;
pub mod mnt;
pub mod npi;
pub mod obfuscation;
mod readings;
mod state;

pub use crypto::{
    compute_fingerprint, encode_key_b64, Ciphertext, CiphertextTag, CryptoError, DeviceKeys,
    KeyToken,
};
pub use diagnosis::{new_visit_id, Diagnosis, DiagnosisLabel};
pub use mnt::EncodedSequence;
pub use npi::PerturbedSequence;
pub use obfuscation::{apply_privacy_transform, DiffDnaTransform, DEFAULT_NPI_INDICES};
pub use readings::{ReadingSet, ReadingValue, VitalSigns, FIELD_NAMES};
pub use state::DeviceState;
