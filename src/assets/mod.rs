//! Static asset index over local files.
//!
//! A flat directory of text assets, scanned once at startup. An asset's id
//! is its file stem; lookups read from disk at call time so edits show up
//! without a restart.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised by the asset index.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Id-keyed index over the files of one directory.
#[derive(Debug, Clone, Default)]
pub struct AssetIndex {
    assets: BTreeMap<String, PathBuf>,
}

impl AssetIndex {
    /// Scan a directory into an index.
    ///
    /// A missing or unreadable directory yields an empty index rather than
    /// an error; the tools report "not found" per lookup.
    pub fn open(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let mut assets = BTreeMap::new();

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(error) => {
                tracing::warn!("asset directory {} unavailable: {}", dir.display(), error);
                return Self::default();
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                assets.insert(stem.to_string(), path);
            }
        }

        tracing::debug!("indexed {} asset(s) from {}", assets.len(), dir.display());
        Self { assets }
    }

    /// All asset ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        self.assets.keys().map(|k| k.as_str()).collect()
    }

    /// Number of indexed assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether the index holds anything.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Read one asset's content by id.
    pub fn get(&self, id: &str) -> Result<String, AssetError> {
        let path = self
            .assets
            .get(id)
            .ok_or_else(|| AssetError::NotFound(id.to_string()))?;
        Ok(std::fs::read_to_string(path)?)
    }

    /// Ids of assets whose content contains `keyword`, case-insensitive.
    pub fn find(&self, keyword: &str) -> Vec<String> {
        let needle = keyword.to_lowercase();
        self.assets
            .iter()
            .filter(|(_, path)| {
                std::fs::read_to_string(path)
                    .map(|content| content.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
            .map(|(id, _)| id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("alpha.md"), "Notes about CRISPR editing").unwrap();
        fs::write(dir.path().join("beta.md"), "Plain sequencing notes").unwrap();
        fs::write(dir.path().join("gamma.txt"), "More crispr material").unwrap();
        dir
    }

    #[test]
    fn test_ids_sorted() {
        let dir = fixture_dir();
        let index = AssetIndex::open(dir.path());
        assert_eq!(index.ids(), vec!["alpha", "beta", "gamma"]);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_get_by_id() {
        let dir = fixture_dir();
        let index = AssetIndex::open(dir.path());
        assert!(index.get("alpha").unwrap().contains("CRISPR"));
        assert!(matches!(index.get("missing"), Err(AssetError::NotFound(_))));
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let dir = fixture_dir();
        let index = AssetIndex::open(dir.path());
        assert_eq!(index.find("crispr"), vec!["alpha", "gamma"]);
        assert!(index.find("nonexistent").is_empty());
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let index = AssetIndex::open("/definitely/not/a/real/path");
        assert!(index.is_empty());
    }
}
