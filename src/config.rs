use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::dictionary::cache;
use crate::dictionary::Language;

/// Where dictionaries and their caches live, and which language to use.
///
/// Passed explicitly to the compiler and the factory; nothing in the crate
/// reads paths from global state.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding the raw LIWC dictionary files
    pub dict_dir: PathBuf,
    /// Directory for compiled dictionary caches (defaults to dict_dir)
    pub cache_dir: PathBuf,
    /// Language used when none is given explicitly
    pub language: Language,
}

/// Returns the default directory for dictionary files.
/// Uses the platform data directory: ~/.local/share/liwc/dictionaries/ on Linux.
pub fn default_dict_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("liwc")
        .join("dictionaries")
}

impl Config {
    pub fn new(dict_dir: impl Into<PathBuf>) -> Self {
        let dict_dir = dict_dir.into();
        Self {
            cache_dir: dict_dir.clone(),
            dict_dir,
            language: Language::English,
        }
    }

    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// A .env file in the working directory is read first if present.
    /// LIWC_DICT_DIR, LIWC_CACHE_DIR and LIWC_LANG are all optional.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let dict_dir = env::var("LIWC_DICT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_dict_dir());

        let cache_dir = env::var("LIWC_CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dict_dir.clone());

        let language = match env::var("LIWC_LANG") {
            Ok(tag) => Language::from_tag(&tag).context("Invalid LIWC_LANG")?,
            Err(_) => Language::English,
        };

        Ok(Self {
            dict_dir,
            cache_dir,
            language,
        })
    }

    /// Path of the raw dictionary for the configured language.
    pub fn source_path(&self) -> PathBuf {
        self.dict_dir.join(self.language.source_file())
    }

    /// Check that the configured language can be loaded: either the source
    /// dictionary exists or a cached build of it does.
    pub fn require_source(&self) -> Result<()> {
        let source = self.source_path();
        if source.exists() {
            return Ok(());
        }
        let cached = cache::find_artifacts(&self.cache_dir, self.language)
            .with_context(|| format!("Failed to scan cache directory {}", self.cache_dir.display()))?;
        if cached.is_empty() {
            anyhow::bail!(
                "LIWC dictionary not found at {}\n\
                 Copy {} into {} or set LIWC_DICT_DIR to the directory that holds it.",
                source.display(),
                self.language.source_file(),
                display_dir(&self.dict_dir),
            );
        }
        Ok(())
    }
}

fn display_dir(dir: &Path) -> String {
    if dir.as_os_str().is_empty() {
        ".".to_string()
    } else {
        dir.display().to_string()
    }
}
