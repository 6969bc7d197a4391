// Dictionary compiler: raw LIWC file to lookup tables, with caching.
//
// Raw file layout (tab separated):
//   line 1             ignored
//   <id>\t<name>       one line per category, in vector order
//   %                  separator
//   <key>\t<id>...     one line per word or `prefix*` wildcard
//
// Compiled tables are cached next to the dictionaries (or in a separate
// cache directory) keyed by language tag and source checksum.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use super::cache::{self, CacheRecord};
use super::language::Language;
use super::models::{CategoryOrder, CategoryTable, CompiledDictionary, WordMap};
use crate::config::Config;
use crate::errors::{LiwcError, Result};

/// Builds or loads [`CompiledDictionary`] values for a dictionary directory.
#[derive(Debug, Clone)]
pub struct DictionaryCompiler {
    dict_dir: PathBuf,
    cache_dir: PathBuf,
}

impl DictionaryCompiler {
    pub fn new(config: &Config) -> Self {
        Self::from_dirs(&config.dict_dir, &config.cache_dir)
    }

    pub fn from_dirs(dict_dir: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            dict_dir: dict_dir.into(),
            cache_dir: cache_dir.into(),
        }
    }

    /// Path of the raw dictionary for a language.
    pub fn source_path(&self, language: Language) -> PathBuf {
        self.dict_dir.join(language.source_file())
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Compile by language tag. Unknown tags fail before touching the filesystem.
    pub fn compile_tag(&self, tag: &str) -> Result<CompiledDictionary> {
        let language = Language::from_tag(tag)?;
        self.compile(language)
    }

    /// Return the compiled dictionary for `language`, loading it from cache
    /// when a matching artifact exists and compiling (then caching) otherwise.
    pub fn compile(&self, language: Language) -> Result<CompiledDictionary> {
        let source_path = self.source_path(language);
        let bytes = match fs::read(&source_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return self.load_orphaned_cache(language, source_path)
            }
            Err(e) => return Err(LiwcError::io(&source_path, e)),
        };

        let checksum = cache::source_checksum(&bytes);
        let cache_path = self
            .cache_dir
            .join(cache::cache_file_name(language, &checksum));

        if cache_path.exists() {
            match cache::load(&cache_path, language, Some(&checksum)) {
                Ok(dict) => {
                    info!(
                        language = language.tag(),
                        dimensions = dict.dimensions(),
                        "Loaded LIWC dictionary from cache"
                    );
                    return Ok(dict);
                }
                Err(e) => {
                    warn!(error = %e, "Discarding dictionary cache, recompiling from source");
                }
            }
        }

        // LIWC2001_Spanish.dic is Latin-1. Lossy decoding only affects
        // non-ASCII keys, which cleaned tokens can never match anyway.
        let text = String::from_utf8_lossy(&bytes);
        let dict = parse_dictionary(&text).inspect_err(|e| {
            error!(path = %source_path.display(), error = %e, "Failed to compile LIWC dictionary");
        })?;

        info!(
            language = language.tag(),
            categories = dict.dimensions(),
            entries = dict.wordmap().len(),
            "Compiled LIWC dictionary"
        );

        // A dictionary that compiled but could not be cached is still usable.
        let record = CacheRecord::new(language, checksum, dict.clone());
        match cache::store(&cache_path, &record) {
            Ok(()) => {
                // Builds of earlier versions of the source are unreachable now.
                if let Err(e) = cache::remove_stale_artifacts(&self.cache_dir, language, &cache_path) {
                    warn!(error = %e, "Failed to remove stale dictionary caches");
                }
            }
            Err(e) => warn!(error = %e, "Failed to write dictionary cache"),
        }

        Ok(dict)
    }

    /// Drop any cached artifacts for `language` and compile from source.
    pub fn rebuild(&self, language: Language) -> Result<CompiledDictionary> {
        self.clear_cache(language)?;
        self.compile(language)
    }

    /// Delete cached artifacts for `language`. Returns how many were removed.
    pub fn clear_cache(&self, language: Language) -> Result<usize> {
        let removed = cache::remove_artifacts(&self.cache_dir, language)?;
        if removed > 0 {
            info!(language = language.tag(), removed, "Cleared dictionary cache");
        }
        Ok(removed)
    }

    /// The source file is gone; serve the newest cached build if there is one.
    fn load_orphaned_cache(
        &self,
        language: Language,
        source_path: PathBuf,
    ) -> Result<CompiledDictionary> {
        let artifacts = cache::find_artifacts(&self.cache_dir, language)?;
        let Some(newest) = artifacts.first() else {
            return Err(LiwcError::FileNotFound(source_path));
        };
        warn!(
            source = %source_path.display(),
            cache = %newest.display(),
            "LIWC source dictionary missing, using cached build without checksum verification"
        );
        cache::load(newest, language, None)
    }
}

/// Compile dictionary text into lookup tables without any I/O.
///
/// Fails with [`LiwcError::Parse`] on the first malformed line; a dictionary
/// is never returned with entries missing.
pub fn parse_dictionary(text: &str) -> Result<CompiledDictionary> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.trim().is_empty())
        .peekable();

    // First line is a file-level header.
    if lines.peek().is_some_and(|(line_no, _)| *line_no == 1) {
        lines.next();
    }

    let mut categories = CategoryTable::new();
    let mut idmap = CategoryOrder::new();
    let mut found_separator = false;

    for (line_no, line) in lines.by_ref() {
        if line.trim() == "%" {
            found_separator = true;
            break;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        let [id, name] = fields.as_slice() else {
            return Err(LiwcError::parse(
                line_no,
                format!(
                    "expected `<category-id>\\t<category-name>`, found {} field(s)",
                    fields.len()
                ),
            ));
        };
        let (id, name) = (id.trim(), name.trim());
        if id.is_empty() || name.is_empty() {
            return Err(LiwcError::parse(line_no, "empty category id or name"));
        }
        if idmap.contains_key(id) {
            return Err(LiwcError::parse(line_no, format!("duplicate category id '{id}'")));
        }
        if categories.contains_key(name) {
            return Err(LiwcError::parse(
                line_no,
                format!("duplicate category name '{name}'"),
            ));
        }
        idmap.insert(id.to_string(), idmap.len());
        categories.insert(name.to_string(), id.to_string());
    }

    if !found_separator {
        return Err(LiwcError::parse(
            text.lines().count(),
            "missing `%` line separating categories from words",
        ));
    }

    let mut wordmap: WordMap = HashMap::new();
    for (line_no, line) in lines {
        let mut fields = line.split('\t');
        let key = fields.next().unwrap_or_default().trim();
        let ids: Vec<String> = fields
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();

        if key.is_empty() {
            return Err(LiwcError::parse(line_no, "empty dictionary entry"));
        }
        if ids.is_empty() {
            return Err(LiwcError::parse(
                line_no,
                format!("entry '{key}' has no category ids"),
            ));
        }
        if let Some(unknown) = ids.iter().find(|id| !idmap.contains_key(id.as_str())) {
            return Err(LiwcError::parse(
                line_no,
                format!("entry '{key}' refers to undeclared category id '{unknown}'"),
            ));
        }
        // Last occurrence wins.
        wordmap.insert(key.to_string(), ids);
    }

    CompiledDictionary::from_parts(categories, idmap, wordmap)
}
