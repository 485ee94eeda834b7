//! Noise Permutation Individual (NPI): positional swap noise.
//!
//! An index sequence is consumed two at a time as swap pairs. Swaps run in
//! order on the partially swapped buffer. A trailing unpaired index is ignored
//! and pairs referencing positions past the end are skipped.
//!
//! Applying the same sequence twice does not undo it in general; only
//! replaying the pairs in reverse order does (see [`reversed_pairs`]).

use serde::{Deserialize, Serialize};

/// Sequence after the NPI swaps were applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerturbedSequence(String);

impl PerturbedSequence {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0.into_bytes()
    }
}

impl std::fmt::Display for PerturbedSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Apply the swap pairs in `indices` to `sequence`.
#[must_use]
pub fn permute(sequence: &str, indices: &[usize]) -> PerturbedSequence {
    let mut buffer: Vec<char> = sequence.chars().collect();
    for pair in indices.chunks_exact(2) {
        let (a, b) = (pair[0], pair[1]);
        if a < buffer.len() && b < buffer.len() {
            buffer.swap(a, b);
        }
    }
    PerturbedSequence(buffer.into_iter().collect())
}

/// Index sequence that undoes `indices` when applied to its output.
///
/// Pairs are emitted in reverse order; a trailing unpaired index is dropped.
#[must_use]
pub fn reversed_pairs(indices: &[usize]) -> Vec<usize> {
    indices
        .chunks_exact(2)
        .rev()
        .flat_map(|pair| [pair[0], pair[1]])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_swaps() {
        assert_eq!(permute("ACCAAGAAC", &[1, 3, 2, 4]).as_str(), "AAACCGAAC");
    }

    #[test]
    fn test_swaps_are_sequential() {
        // (0,1) then (1,2) moves the first symbol to the end
        assert_eq!(permute("ACG", &[0, 1, 1, 2]).as_str(), "CGA");
    }

    #[test]
    fn test_trailing_index_ignored() {
        let s = "AAACCCGGGTTT";
        assert_eq!(permute(s, &[1, 3, 2]), permute(s, &[1, 3]));
        assert_eq!(permute(s, &[5]).as_str(), s);
    }

    #[test]
    fn test_out_of_range_pairs_skipped() {
        assert_eq!(permute("ACGT", &[1, 4, 0, 99]).as_str(), "ACGT");
        assert_eq!(permute("ACGT", &[0, 3, 2, 10]).as_str(), "TCGA");
        assert_eq!(permute("", &[0, 1]).as_str(), "");
        assert_eq!(permute("A", &[0, 0]).as_str(), "A");
    }

    #[test]
    fn test_replaying_forward_is_not_an_inverse() {
        let s = "AAACCCGGGTTT";
        let indices = [2, 3, 3, 6];
        let once = permute(s, &indices);
        assert_eq!(once.as_str(), "AACGCCAGGTTT");

        let twice = permute(once.as_str(), &indices);
        assert_eq!(twice.as_str(), "AAGACCCGGTTT");
        assert_ne!(twice.as_str(), s);
    }

    #[test]
    fn test_disjoint_reference_pairs_happen_to_cancel() {
        // [1,3,2,4] touches disjoint positions, so it is its own inverse
        let s = "AAACCCGGGTTT";
        let once = permute(s, &[1, 3, 2, 4]);
        assert_eq!(once.as_str(), "ACCAACGGGTTT");
        assert_eq!(permute(once.as_str(), &[1, 3, 2, 4]).as_str(), s);
    }

    #[test]
    fn test_reverse_replay_restores_input() {
        let s = "AAACCCGGGTTT";
        let indices = [2, 3, 3, 6, 0, 11, 7];
        let perturbed = permute(s, &indices);
        assert_eq!(reversed_pairs(&indices), vec![0, 11, 3, 6, 2, 3]);
        assert_eq!(permute(perturbed.as_str(), &reversed_pairs(&indices)).as_str(), s);
    }
}
