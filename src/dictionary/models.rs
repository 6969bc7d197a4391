// Compiled dictionary tables.
//
// Three lookup tables come out of a raw LIWC file:
//   categories: category name -> category id
//   idmap:      category id -> vector index (header order)
//   wordmap:    word or `prefix*` -> category ids
// They are immutable once built, so a dictionary can be shared behind an Arc.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::LiwcError;

pub type CategoryTable = HashMap<String, String>;
pub type CategoryOrder = HashMap<String, usize>;
pub type WordMap = HashMap<String, Vec<String>>;

/// The parsed lookup structure for one language.
///
/// Deserialization goes through [`CompiledDictionary::from_parts`], so a
/// decoded dictionary satisfies the same invariants as a parsed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTables")]
pub struct CompiledDictionary {
    categories: CategoryTable,
    idmap: CategoryOrder,
    wordmap: WordMap,
}

/// Unchecked wire form of [`CompiledDictionary`].
#[derive(Deserialize)]
struct RawTables {
    categories: CategoryTable,
    idmap: CategoryOrder,
    wordmap: WordMap,
}

impl TryFrom<RawTables> for CompiledDictionary {
    type Error = LiwcError;

    fn try_from(raw: RawTables) -> Result<Self, Self::Error> {
        Self::from_parts(raw.categories, raw.idmap, raw.wordmap)
    }
}

impl CompiledDictionary {
    /// Assemble a dictionary from its tables, checking that they agree.
    pub fn from_parts(
        categories: CategoryTable,
        idmap: CategoryOrder,
        wordmap: WordMap,
    ) -> Result<Self, LiwcError> {
        let dict = Self {
            categories,
            idmap,
            wordmap,
        };
        dict.validate().map_err(LiwcError::InvalidTables)?;
        Ok(dict)
    }

    /// Check the cross-table invariants. Returns a description of the first
    /// violation found.
    fn validate(&self) -> Result<(), String> {
        if self.categories.len() != self.idmap.len() {
            return Err(format!(
                "{} category names but {} category ids",
                self.categories.len(),
                self.idmap.len()
            ));
        }
        if let Some(id) = self
            .categories
            .values()
            .find(|id| !self.idmap.contains_key(*id))
        {
            return Err(format!("category id '{id}' has no vector index"));
        }
        let dims = self.idmap.len();
        let mut seen = vec![false; dims];
        for &idx in self.idmap.values() {
            if idx >= dims || std::mem::replace(&mut seen[idx], true) {
                return Err(format!("vector index {idx} is out of range or repeated"));
            }
        }
        for (key, ids) in &self.wordmap {
            if let Some(id) = ids.iter().find(|id| !self.idmap.contains_key(*id)) {
                return Err(format!("entry '{key}' refers to unknown category id '{id}'"));
            }
        }
        Ok(())
    }

    /// Number of categories, i.e. the length of every feature vector.
    pub fn dimensions(&self) -> usize {
        self.idmap.len()
    }

    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    pub fn idmap(&self) -> &CategoryOrder {
        &self.idmap
    }

    pub fn wordmap(&self) -> &WordMap {
        &self.wordmap
    }

    /// Category ids activated by a dictionary key (literal word or `prefix*`).
    pub fn lookup(&self, key: &str) -> Option<&[String]> {
        self.wordmap.get(key).map(Vec::as_slice)
    }

    /// Vector index of a category id.
    pub fn index_of(&self, category_id: &str) -> Option<usize> {
        self.idmap.get(category_id).copied()
    }

    /// Category names in vector order.
    pub fn category_names(&self) -> Vec<&str> {
        let mut names = vec![""; self.dimensions()];
        for (name, id) in &self.categories {
            if let Some(idx) = self.index_of(id) {
                names[idx] = name.as_str();
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> (CategoryTable, CategoryOrder, WordMap) {
        let categories: CategoryTable = [
            ("funct".to_string(), "1".to_string()),
            ("posemo".to_string(), "126".to_string()),
        ]
        .into();
        let idmap: CategoryOrder = [("1".to_string(), 0), ("126".to_string(), 1)].into();
        let wordmap: WordMap = [
            ("the".to_string(), vec!["1".to_string()]),
            ("happ*".to_string(), vec!["126".to_string()]),
        ]
        .into();
        (categories, idmap, wordmap)
    }

    #[test]
    fn category_names_follow_vector_order() {
        let (c, i, w) = tables();
        let dict = CompiledDictionary::from_parts(c, i, w).unwrap();
        assert_eq!(dict.category_names(), vec!["funct", "posemo"]);
        assert_eq!(dict.dimensions(), 2);
    }

    #[test]
    fn unknown_word_category_is_rejected() {
        let (c, i, mut w) = tables();
        w.insert("joy".to_string(), vec!["999".to_string()]);
        let err = CompiledDictionary::from_parts(c, i, w).unwrap_err();
        assert!(err.to_string().contains("999"), "got: {err}");
    }

    #[test]
    fn mismatched_table_sizes_are_rejected() {
        let (mut c, i, w) = tables();
        c.insert("negemo".to_string(), "127".to_string());
        assert!(CompiledDictionary::from_parts(c, i, w).is_err());
    }

    #[test]
    fn repeated_vector_index_is_rejected() {
        let (c, mut i, w) = tables();
        i.insert("126".to_string(), 0);
        assert!(CompiledDictionary::from_parts(c, i, w).is_err());
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let (c, mut i, w) = tables();
        i.insert("126".to_string(), 5);
        let err = CompiledDictionary::from_parts(c, i, w).unwrap_err();
        assert!(matches!(err, LiwcError::InvalidTables(_)), "got {err:?}");
    }

    #[test]
    fn deserialization_enforces_invariants() {
        let json = r#"{"categories":{"posemo":"1"},"idmap":{"1":5},"wordmap":{"happy":["1"]}}"#;
        let err = serde_json::from_str::<CompiledDictionary>(json).unwrap_err();
        assert!(err.to_string().contains("out of range"), "got: {err}");
    }

    #[test]
    fn deserialization_accepts_consistent_tables() {
        let (c, i, w) = tables();
        let dict = CompiledDictionary::from_parts(c, i, w).unwrap();
        let json = serde_json::to_string(&dict).unwrap();
        let back: CompiledDictionary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dict);
    }

    #[test]
    fn lookup_returns_ids() {
        let (c, i, w) = tables();
        let dict = CompiledDictionary::from_parts(c, i, w).unwrap();
        assert_eq!(dict.lookup("happ*"), Some(&["126".to_string()][..]));
        assert_eq!(dict.lookup("happy"), None);
        assert_eq!(dict.index_of("126"), Some(1));
    }
}
