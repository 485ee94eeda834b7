//! Diff-DNA privacy transform: MNT encoding followed by NPI swap noise.
//!
//! Both stages are total, so the transform cannot fail.

use super::mnt;
use super::npi::{self, PerturbedSequence};
use super::readings::ReadingSet;

/// Swap pairs used when the caller supplies none: 1<->3, then 2<->4.
pub const DEFAULT_NPI_INDICES: [usize; 4] = [1, 3, 2, 4];

/// Configured privacy transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffDnaTransform {
    indices: Vec<usize>,
}

impl Default for DiffDnaTransform {
    fn default() -> Self {
        Self::new(DEFAULT_NPI_INDICES.to_vec())
    }
}

impl DiffDnaTransform {
    #[must_use]
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Encode `readings` and apply this transform's swap pairs.
    #[must_use]
    pub fn apply(&self, readings: &ReadingSet) -> PerturbedSequence {
        apply_privacy_transform(readings, &self.indices)
    }
}

/// Encode `readings` and apply the swap pairs in `indices`.
#[must_use]
pub fn apply_privacy_transform(readings: &ReadingSet, indices: &[usize]) -> PerturbedSequence {
    let encoded = mnt::encode(readings);
    tracing::debug!(
        symbols = readings.flatten().chars().count(),
        encoded_len = encoded.len(),
        "Encoded readings to nucleotide sequence"
    );

    let perturbed = npi::permute(encoded.as_str(), indices);
    tracing::debug!(pairs = indices.len() / 2, "Applied NPI swaps");
    perturbed
}
