// Supported dictionary languages and their source file names.

use std::fmt;
use std::str::FromStr;

use crate::errors::LiwcError;

/// A language with a LIWC source dictionary.
///
/// Adding a language means adding a variant here with its tag and file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    Spanish,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Spanish];

    /// Short tag used in configuration and cache file names.
    pub fn tag(&self) -> &'static str {
        match self {
            Language::English => "eng",
            Language::Spanish => "span",
        }
    }

    /// File name of the raw dictionary inside the dictionary directory.
    pub fn source_file(&self) -> &'static str {
        match self {
            Language::English => "LIWC2007.txt",
            Language::Spanish => "LIWC2001_Spanish.dic",
        }
    }

    pub fn from_tag(tag: &str) -> Result<Self, LiwcError> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.tag() == tag)
            .ok_or_else(|| LiwcError::UnsupportedLanguage(tag.to_string()))
    }
}

impl FromStr for Language {
    type Err = LiwcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_tag(s)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}
