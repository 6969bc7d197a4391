// LIWC feature vectors.
//
// Each token is cleaned, then matched against the dictionary:
// 1. exact match on the cleaned token, otherwise
// 2. the longest `prefix*` wildcard, trying prefixes from the full token
//    down to a single character.
// A match adds 1 to every distinct category it activates. Counts are then
// divided by the total number of tokens, matched or not.

use std::ops::Deref;

use serde::{Deserialize, Serialize};

use super::coarse::CoarseFeatures;
use super::normalize::clean_token;
use crate::dictionary::CompiledDictionary;
use crate::errors::DocumentError;

/// Normalized category counts for one document, in dictionary vector order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    /// Pair each value with its category name.
    ///
    /// Only meaningful for a vector computed from `dict` without coarse
    /// features prepended.
    pub fn labeled<'a>(&'a self, dict: &'a CompiledDictionary) -> Vec<(&'a str, f64)> {
        dict.category_names()
            .into_iter()
            .zip(self.0.iter().copied())
            .collect()
    }

    /// Prepend word count, unique word count and long-word ratio.
    pub fn with_coarse(self, coarse: &CoarseFeatures) -> Self {
        let mut values = Vec::with_capacity(self.0.len() + CoarseFeatures::LEN);
        values.extend(coarse.as_array());
        values.extend(self.0);
        Self(values)
    }
}

impl Deref for FeatureVector {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

/// Find the category ids a cleaned token activates, if any.
///
/// An exact entry always wins; wildcards are only consulted without one.
fn match_entry<'d>(cleaned: &str, dict: &'d CompiledDictionary) -> Option<&'d [String]> {
    if let Some(ids) = dict.lookup(cleaned) {
        return Some(ids);
    }

    // Cleaned tokens are pure ASCII, so every byte offset is a char boundary.
    let mut pattern = String::with_capacity(cleaned.len() + 1);
    (1..=cleaned.len()).rev().find_map(|end| {
        pattern.clear();
        pattern.push_str(&cleaned[..end]);
        pattern.push('*');
        dict.lookup(&pattern)
    })
}

/// Raw (un-normalized) category counts for a token sequence.
pub fn count_matches<S: AsRef<str>>(tokens: &[S], dict: &CompiledDictionary) -> Vec<u32> {
    let mut counts = vec![0u32; dict.dimensions()];
    let mut hit: Vec<usize> = Vec::new();

    for token in tokens {
        let cleaned = clean_token(token.as_ref());
        let Some(ids) = match_entry(&cleaned, dict) else {
            continue;
        };

        // A category listed twice for one entry still counts once.
        hit.clear();
        hit.extend(ids.iter().filter_map(|id| dict.index_of(id)));
        hit.sort_unstable();
        hit.dedup();
        for &idx in &hit {
            counts[idx] += 1;
        }
    }

    counts
}

/// Compute the normalized LIWC vector for one tokenized document.
pub fn compute_vector<S: AsRef<str>>(
    tokens: &[S],
    dict: &CompiledDictionary,
) -> Result<FeatureVector, DocumentError> {
    if tokens.is_empty() {
        return Err(DocumentError::EmptyDocument);
    }
    let total = tokens.len() as f64;
    let values = count_matches(tokens, dict)
        .into_iter()
        .map(|count| f64::from(count) / total)
        .collect();
    Ok(FeatureVector(values))
}
