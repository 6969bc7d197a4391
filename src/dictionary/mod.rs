// LIWC dictionaries: parsing raw category files and caching the result.

pub mod cache;
pub mod compiler;
pub mod language;
pub mod models;

pub use compiler::{parse_dictionary, DictionaryCompiler};
pub use language::Language;
pub use models::CompiledDictionary;
