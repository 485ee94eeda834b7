//! Symbolic nucleotide encoder (Mapping Nucleotides Table, MNT).
//!
//! Every alphanumeric symbol maps to a three-letter code over `{A, C, G, T}`.
//! The table is not injective: `X`, `Y` and `Z` share codes with `7`, `5`
//! and `6`. Symbols outside the table encode as [`SENTINEL_CODE`].

use serde::{Deserialize, Serialize};

use super::readings::ReadingSet;

/// Length of every code in the table.
pub const CODE_LEN: usize = 3;

/// Code emitted for any symbol the table does not cover.
pub const SENTINEL_CODE: &str = "XXX";

/// Fold `symbol` to the table's case.
///
/// Full Unicode uppercasing, kept only when it yields a single ASCII char,
/// so `ı` folds to `I` and `ſ` to `S` while `ß` (`SS`) stays unmapped.
fn fold_case(symbol: char) -> char {
    let mut upper = symbol.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(c), None) if c.is_ascii() => c,
        _ => symbol,
    }
}

/// Look up the code for one symbol (case-insensitive).
#[must_use]
pub fn code_for(symbol: char) -> &'static str {
    match fold_case(symbol) {
        '0' => "AAA",
        '1' => "AAC",
        '2' => "AAG",
        '3' => "AAT",
        '4' => "ACA",
        '5' => "ACC",
        '6' => "ACG",
        '7' => "ACT",
        '8' => "AGA",
        '9' => "AGC",
        'A' => "TAT",
        'B' => "TAC",
        'C' => "TAG",
        'D' => "TAA",
        'E' => "TTT",
        'F' => "TTC",
        'G' => "TTG",
        'H' => "TTA",
        'I' => "CTT",
        'J' => "CTC",
        'K' => "CTG",
        'L' => "CTA",
        'M' => "CGT",
        'N' => "CGC",
        'O' => "CGG",
        'P' => "CGA",
        'Q' => "CAT",
        'R' => "CAC",
        'S' => "CAA",
        'T' => "CCT",
        'U' => "CCC",
        'V' => "CCG",
        'W' => "CCA",
        'X' => "ACT",
        'Y' => "ACC",
        'Z' => "ACG",
        _ => SENTINEL_CODE,
    }
}

/// Nucleotide-level string produced by the encoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedSequence(String);

impl EncodedSequence {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for EncodedSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encode arbitrary text symbol by symbol.
#[must_use]
pub fn encode_text(text: &str) -> EncodedSequence {
    let mut out = String::with_capacity(text.chars().count() * CODE_LEN);
    for symbol in text.chars() {
        out.push_str(code_for(symbol));
    }
    EncodedSequence(out)
}

/// Encode a reading set: flatten values in field order, then encode.
///
/// Total: unmapped symbols (`.`, `-`, spaces, non-ASCII) become the sentinel.
#[must_use]
pub fn encode(readings: &ReadingSet) -> EncodedSequence {
    encode_text(&readings.flatten())
}
