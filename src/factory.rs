// LIWC factory: a compiled dictionary plus the document set it is applied to.
//
// Vectors are computed eagerly whenever the document set changes. A document
// that cannot be vectorized (currently only an empty one) gets an error in
// its slot; the rest of the batch is unaffected.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::Config;
use crate::dictionary::{CompiledDictionary, DictionaryCompiler, Language};
use crate::errors::{DocumentError, Result};
use crate::features::{coarse_features, compute_vector, CoarseFeatures, FeatureVector};

/// What each output vector contains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VectorLayout {
    /// Normalized LIWC category counts only.
    #[default]
    Liwc,
    /// Word count, unique word count and long-word ratio, followed by the
    /// LIWC categories.
    Combined,
}

/// Per-document result, in document order.
pub type DocumentVector = std::result::Result<FeatureVector, DocumentError>;

/// Computes LIWC vectors for a set of tokenized documents.
pub struct LiwcFactory {
    dictionary: Arc<CompiledDictionary>,
    layout: VectorLayout,
    documents: Vec<Vec<String>>,
    vectors: Vec<DocumentVector>,
}

impl LiwcFactory {
    /// Build or load the dictionary for `language` and vectorize `documents`.
    pub fn new(documents: Vec<Vec<String>>, language: &str, config: &Config) -> Result<Self> {
        let language = Language::from_tag(language)?;
        let dictionary = DictionaryCompiler::new(config).compile(language)?;
        Ok(Self::with_dictionary(Arc::new(dictionary), documents))
    }

    /// Like [`LiwcFactory::new`] using the configured language.
    pub fn from_config(documents: Vec<Vec<String>>, config: &Config) -> Result<Self> {
        let dictionary = DictionaryCompiler::new(config).compile(config.language)?;
        Ok(Self::with_dictionary(Arc::new(dictionary), documents))
    }

    /// Use an already compiled (possibly shared) dictionary.
    pub fn with_dictionary(dictionary: Arc<CompiledDictionary>, documents: Vec<Vec<String>>) -> Self {
        let mut factory = Self {
            dictionary,
            layout: VectorLayout::default(),
            documents: Vec::new(),
            vectors: Vec::new(),
        };
        factory.set_documents(documents);
        factory
    }

    /// Switch the output layout and recompute.
    pub fn with_layout(mut self, layout: VectorLayout) -> Self {
        self.layout = layout;
        self.recompute();
        self
    }

    /// Replace the whole document set and recompute every vector.
    pub fn set_documents(&mut self, documents: Vec<Vec<String>>) -> &mut Self {
        self.documents = documents;
        self.recompute();
        self
    }

    /// One result per document, in the order the documents were given.
    pub fn vectors(&self) -> &[DocumentVector] {
        &self.vectors
    }

    pub fn documents(&self) -> &[Vec<String>] {
        &self.documents
    }

    pub fn dictionary(&self) -> &Arc<CompiledDictionary> {
        &self.dictionary
    }

    pub fn layout(&self) -> VectorLayout {
        self.layout
    }

    /// Length of every successfully computed vector.
    pub fn dimensions(&self) -> usize {
        match self.layout {
            VectorLayout::Liwc => self.dictionary.dimensions(),
            VectorLayout::Combined => self.dictionary.dimensions() + CoarseFeatures::LEN,
        }
    }

    fn vectorize(&self, tokens: &[String]) -> DocumentVector {
        let vector = compute_vector(tokens, &self.dictionary)?;
        match self.layout {
            VectorLayout::Liwc => Ok(vector),
            VectorLayout::Combined => Ok(vector.with_coarse(&coarse_features(tokens)?)),
        }
    }

    fn recompute(&mut self) {
        let vectors: Vec<DocumentVector> = self
            .documents
            .iter()
            .map(|doc| self.vectorize(doc))
            .collect();

        let failed = vectors.iter().filter(|v| v.is_err()).count();
        if failed > 0 {
            debug!(failed, "Documents without a vector");
        }
        info!(
            documents = vectors.len(),
            failed,
            dimensions = self.dimensions(),
            "Computed LIWC vectors"
        );

        self.vectors = vectors;
    }
}
