// LIWC: psycholinguistic category feature vectors for tokenized documents.
//
// This is the library root. `dictionary` turns raw LIWC files into cached
// lookup tables, `features` computes per-document vectors from them, and
// `factory` ties both together over a replaceable document set.

pub mod config;
pub mod dictionary;
pub mod errors;
pub mod factory;
pub mod features;

pub use config::Config;
pub use dictionary::{CompiledDictionary, DictionaryCompiler, Language};
pub use errors::{DocumentError, LiwcError, Result};
pub use factory::{LiwcFactory, VectorLayout};
pub use features::{compute_vector, FeatureVector};
