// Coarse document statistics that can be prepended to a LIWC vector.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::DocumentError;

/// Words at least this many characters long count as long words.
pub const LONG_WORD_CHARS: usize = 6;

/// Length-based statistics for one document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoarseFeatures {
    pub word_count: usize,
    pub unique_words: usize,
    /// Fraction of tokens with at least [`LONG_WORD_CHARS`] characters.
    pub long_word_ratio: f64,
}

impl CoarseFeatures {
    /// Number of values produced by [`CoarseFeatures::as_array`].
    pub const LEN: usize = 3;

    pub fn as_array(&self) -> [f64; Self::LEN] {
        [
            self.word_count as f64,
            self.unique_words as f64,
            self.long_word_ratio,
        ]
    }
}

/// Compute coarse statistics over raw tokens (no cleaning applied).
pub fn coarse_features<S: AsRef<str>>(tokens: &[S]) -> Result<CoarseFeatures, DocumentError> {
    if tokens.is_empty() {
        return Err(DocumentError::EmptyDocument);
    }
    let words: Vec<&str> = tokens.iter().map(|t| t.as_ref()).collect();
    let unique: HashSet<&str> = words.iter().copied().collect();
    let long = words
        .iter()
        .filter(|w| w.chars().count() >= LONG_WORD_CHARS)
        .count();

    Ok(CoarseFeatures {
        word_count: tokens.len(),
        unique_words: unique.len(),
        long_word_ratio: long as f64 / tokens.len() as f64,
    })
}
