// Cache artifacts for compiled dictionaries.
//
// Each artifact is a JSON record holding the three tables plus the metadata
// needed to tell whether it still matches its source: a format version, the
// language tag and the sha256 of the raw dictionary file. The checksum is
// also part of the file name, so editing a source dictionary produces a new
// cache key instead of silently reusing the old tables.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::language::Language;
use super::models::CompiledDictionary;
use crate::errors::{LiwcError, Result};

/// Bumped whenever the record layout changes.
pub const CACHE_FORMAT_VERSION: u32 = 1;

const CACHE_PREFIX: &str = "liwcdict_";
const CACHE_EXTENSION: &str = "json";
/// Hex characters of the checksum kept in the file name.
const KEY_CHECKSUM_LEN: usize = 16;

/// On-disk form of a compiled dictionary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheRecord {
    pub format_version: u32,
    pub language: String,
    pub source_sha256: String,
    #[serde(flatten)]
    pub dictionary: CompiledDictionary,
}

impl CacheRecord {
    pub fn new(language: Language, source_sha256: String, dictionary: CompiledDictionary) -> Self {
        Self {
            format_version: CACHE_FORMAT_VERSION,
            language: language.tag().to_string(),
            source_sha256,
            dictionary,
        }
    }
}

/// Hex-encoded sha256 of the raw dictionary bytes.
pub fn source_checksum(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Cache file name for a language and source checksum,
/// e.g. `liwcdict_eng-3f2a9c0d41b7e655.json`.
pub fn cache_file_name(language: Language, checksum: &str) -> String {
    let short = &checksum[..checksum.len().min(KEY_CHECKSUM_LEN)];
    format!("{CACHE_PREFIX}{}-{short}.{CACHE_EXTENSION}", language.tag())
}

fn is_artifact_for(path: &Path, language: Language) -> bool {
    let prefix = format!("{CACHE_PREFIX}{}-", language.tag());
    let suffix = format!(".{CACHE_EXTENSION}");
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(&prefix) && n.ends_with(&suffix))
}

/// Load and verify a cache artifact.
///
/// `expected_checksum` is `None` when the source file is unavailable and the
/// artifact is the only copy of the dictionary; the checksum check is then
/// skipped but the record must still belong to `language`.
pub fn load(
    path: &Path,
    language: Language,
    expected_checksum: Option<&str>,
) -> Result<CompiledDictionary> {
    let bytes = fs::read(path).map_err(|e| LiwcError::io(path, e))?;
    let corrupt = |reason: String| LiwcError::Deserialization {
        path: path.to_path_buf(),
        reason,
    };

    let record: CacheRecord = serde_json::from_slice(&bytes).map_err(|e| corrupt(e.to_string()))?;

    if record.format_version != CACHE_FORMAT_VERSION {
        return Err(corrupt(format!(
            "format version {} (expected {CACHE_FORMAT_VERSION})",
            record.format_version
        )));
    }
    if record.language != language.tag() {
        return Err(corrupt(format!(
            "built for language '{}', not '{}'",
            record.language,
            language.tag()
        )));
    }
    if let Some(expected) = expected_checksum {
        if record.source_sha256 != expected {
            return Err(corrupt("source checksum does not match".to_string()));
        }
    }

    debug!(path = %path.display(), "Loaded dictionary cache");
    Ok(record.dictionary)
}

/// Write a cache artifact atomically: serialize to a sibling temp file, then
/// rename over the final path.
pub fn store(path: &Path, record: &CacheRecord) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| LiwcError::io(parent, e))?;
        }
    }

    let json = serde_json::to_vec(record).map_err(|e| LiwcError::Deserialization {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let tmp = path.with_extension(format!("{CACHE_EXTENSION}.tmp"));
    fs::write(&tmp, json).map_err(|e| LiwcError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| LiwcError::io(path, e))?;

    debug!(path = %path.display(), "Wrote dictionary cache");
    Ok(())
}

/// All cache artifacts for a language, newest first.
pub fn find_artifacts(cache_dir: &Path, language: Language) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(cache_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(LiwcError::io(cache_dir, e)),
    };

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| LiwcError::io(cache_dir, e))?;
        let path = entry.path();
        if is_artifact_for(&path, language) {
            let modified = entry.metadata().and_then(|m| m.modified()).ok();
            found.push((modified, path));
        }
    }

    found.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    Ok(found.into_iter().map(|(_, path)| path).collect())
}

/// Delete every cache artifact for a language. Returns how many were removed.
pub fn remove_artifacts(cache_dir: &Path, language: Language) -> Result<usize> {
    let artifacts = find_artifacts(cache_dir, language)?;
    for path in &artifacts {
        fs::remove_file(path).map_err(|e| LiwcError::io(path, e))?;
    }
    Ok(artifacts.len())
}

/// Delete the artifacts for a language built from other versions of its
/// source, keeping `current`. Returns how many were removed.
pub fn remove_stale_artifacts(cache_dir: &Path, language: Language, current: &Path) -> Result<usize> {
    let mut removed = 0;
    for path in find_artifacts(cache_dir, language)? {
        if path == current {
            continue;
        }
        fs::remove_file(&path).map_err(|e| LiwcError::io(&path, e))?;
        debug!(path = %path.display(), "Removed stale dictionary cache");
        removed += 1;
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::compiler::parse_dictionary;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("liwc-cache-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn sample() -> CompiledDictionary {
        parse_dictionary("%\n1\tfunct\n2\tposemo\n%\nthe\t1\nhapp*\t2\n").unwrap()
    }

    #[test]
    fn file_name_embeds_tag_and_short_checksum() {
        let checksum = source_checksum(b"abc");
        let name = cache_file_name(Language::English, &checksum);
        assert_eq!(name, format!("liwcdict_eng-{}.json", &checksum[..16]));
    }

    #[test]
    fn checksum_is_hex_sha256() {
        let checksum = source_checksum(b"");
        assert_eq!(
            checksum,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn store_then_load_preserves_tables() {
        let dir = scratch_dir("roundtrip");
        let path = dir.join(cache_file_name(Language::English, "deadbeef"));
        let dict = sample();

        store(&path, &CacheRecord::new(Language::English, "deadbeef".into(), dict.clone())).unwrap();
        let loaded = load(&path, Language::English, Some("deadbeef")).unwrap();
        assert_eq!(loaded, dict);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn record_exposes_three_tables_at_top_level() {
        let record = CacheRecord::new(Language::English, "00".into(), sample());
        let value = serde_json::to_value(&record).unwrap();
        for key in ["categories", "idmap", "wordmap"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn checksum_mismatch_is_reported() {
        let dir = scratch_dir("mismatch");
        let path = dir.join("liwcdict_eng-aaaa.json");
        store(&path, &CacheRecord::new(Language::English, "aaaa".into(), sample())).unwrap();

        let err = load(&path, Language::English, Some("bbbb")).unwrap_err();
        assert!(matches!(err, LiwcError::Deserialization { .. }));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn wrong_language_is_reported() {
        let dir = scratch_dir("language");
        let path = dir.join("liwcdict_span-aaaa.json");
        store(&path, &CacheRecord::new(Language::English, "aaaa".into(), sample())).unwrap();

        let err = load(&path, Language::Spanish, None).unwrap_err();
        assert!(matches!(err, LiwcError::Deserialization { .. }));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn other_format_version_is_reported() {
        let dir = scratch_dir("version");
        let path = dir.join("liwcdict_eng-aaaa.json");
        let mut record = CacheRecord::new(Language::English, "aaaa".into(), sample());
        record.format_version = CACHE_FORMAT_VERSION + 1;
        store(&path, &record).unwrap();

        let err = load(&path, Language::English, Some("aaaa")).unwrap_err();
        assert!(matches!(err, LiwcError::Deserialization { .. }));
        assert!(err.to_string().contains("format version 2"), "got: {err}");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn inconsistent_tables_are_a_deserialization_error() {
        let dir = scratch_dir("tables");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("liwcdict_eng-aaaa.json");
        let json = r#"{"format_version":1,"language":"eng","source_sha256":"aaaa",
            "categories":{"posemo":"1"},"idmap":{"1":5},"wordmap":{"happy":["1"]}}"#;
        fs::write(&path, json).unwrap();

        let err = load(&path, Language::English, Some("aaaa")).unwrap_err();
        assert!(matches!(err, LiwcError::Deserialization { .. }), "got {err:?}");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn garbage_is_a_deserialization_error() {
        let dir = scratch_dir("garbage");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("liwcdict_eng-0000.json");
        fs::write(&path, b"\x80not json").unwrap();

        let err = load(&path, Language::English, None).unwrap_err();
        assert!(matches!(err, LiwcError::Deserialization { .. }));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn artifacts_are_filtered_by_language() {
        let dir = scratch_dir("filter");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("liwcdict_eng-1111.json"), b"{}").unwrap();
        fs::write(dir.join("liwcdict_span-2222.json"), b"{}").unwrap();
        fs::write(dir.join("LIWC2007.txt"), b"").unwrap();

        let eng = find_artifacts(&dir, Language::English).unwrap();
        assert_eq!(eng, vec![dir.join("liwcdict_eng-1111.json")]);

        assert_eq!(remove_artifacts(&dir, Language::Spanish).unwrap(), 1);
        assert!(find_artifacts(&dir, Language::Spanish).unwrap().is_empty());
        assert!(dir.join("LIWC2007.txt").exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn stale_artifacts_are_removed_but_current_is_kept() {
        let dir = scratch_dir("stale");
        fs::create_dir_all(&dir).unwrap();
        let current = dir.join("liwcdict_eng-3333.json");
        for name in ["liwcdict_eng-1111.json", "liwcdict_eng-2222.json", "liwcdict_span-4444.json"] {
            fs::write(dir.join(name), b"{}").unwrap();
        }
        fs::write(&current, b"{}").unwrap();

        assert_eq!(remove_stale_artifacts(&dir, Language::English, &current).unwrap(), 2);
        assert_eq!(find_artifacts(&dir, Language::English).unwrap(), vec![current]);
        assert_eq!(find_artifacts(&dir, Language::Spanish).unwrap().len(), 1);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_cache_dir_has_no_artifacts() {
        let dir = scratch_dir("absent");
        assert!(find_artifacts(&dir, Language::English).unwrap().is_empty());
    }
}
