//! Runtime-package lookup and fingerprint tables.
//!
//! The tables are *consumed, not built* here: an embedder ships a document
//! (JSON via serde, or [`TableData`] assembled in code) listing, per asset
//! directory, the per-variant physical names of every asset a package
//! provides. From that single document the core derives everything it
//! needs:
//!
//! - which variants define a given `(directory, name)` key,
//! - how a key translates between two variants' naming conventions,
//! - how many files a complete installation of each variant is expected to
//!   contain, used to score fingerprints of candidate installations.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::asset;
use crate::config::EngineVersion;
use crate::index::DirectoryIndex;
use crate::path::{self, PathRules};
use crate::rtp::RtpVariant;

/// Errors raised while loading a table document.
#[derive(Debug, Error)]
pub enum TableError {
    /// The document could not be read.
    #[error("failed to read table document: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid JSON or does not match the schema.
    #[error("failed to parse table document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One asset across all variants that provide it: variant → physical base
/// name (without extension).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryData {
    pub names: HashMap<RtpVariant, String>,
}

/// All assets of one directory category (e.g. `CharSet`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryData {
    pub directory: String,
    pub entries: Vec<EntryData>,
}

/// The raw table document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableData {
    pub categories: Vec<CategoryData>,
}

#[derive(Debug, Clone)]
struct TableEntry {
    /// Variant → normalized physical base name.
    names: HashMap<RtpVariant, String>,
}

/// Fingerprint score of one variant against one installation.
#[derive(Debug, Clone)]
pub struct RtpHit {
    pub variant: RtpVariant,
    /// Table entries found in the installation.
    pub hits: usize,
    /// Table entries a complete installation would contain.
    pub max: usize,
}

impl RtpHit {
    /// Hit ratio in `0.0..=1.0`.
    pub fn rate(&self) -> f32 {
        if self.max == 0 {
            0.0
        } else {
            self.hits as f32 / self.max as f32
        }
    }
}

/// Compiled, normalized form of a table document.
#[derive(Debug, Default)]
pub struct RtpTable {
    /// Normalized directory → entries in that directory.
    categories: HashMap<String, Vec<TableEntry>>,
    /// Variant → number of entries defining it (expected file count).
    expected: HashMap<RtpVariant, usize>,
}

impl RtpTable {
    /// A table with no variant knowledge. Lookups report no candidates and
    /// fingerprinting finds nothing; inference stays unconstrained.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compile a table document, normalizing all keys and names.
    pub fn from_data(data: TableData) -> Self {
        let mut table = Self::default();

        for category in data.categories {
            let directory = path::normalize(&category.directory);
            let entries = table.categories.entry(directory).or_default();
            for entry in category.entries {
                let mut names = HashMap::new();
                for (variant, name) in entry.names {
                    *table.expected.entry(variant).or_insert(0) += 1;
                    names.insert(variant, path::normalize(&name));
                }
                entries.push(TableEntry { names });
            }
        }

        table
    }

    /// Parse a JSON table document.
    pub fn from_json(document: &str) -> Result<Self, TableError> {
        let data: TableData = serde_json::from_str(document)?;
        Ok(Self::from_data(data))
    }

    /// Read and parse a JSON table document from disk.
    pub fn from_json_file(document: &Path) -> Result<Self, TableError> {
        let text = std::fs::read_to_string(document)?;
        Self::from_json(&text)
    }

    /// Whether the table carries any entries at all.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Expected file count of a complete installation of `variant`.
    pub fn expected_files(&self, variant: RtpVariant) -> usize {
        self.expected.get(&variant).copied().unwrap_or(0)
    }

    /// All variants of the given engine generation that provide an asset
    /// matching `(directory, name)` under their own naming convention.
    ///
    /// Both arguments must already be normalized. The result is in
    /// [`RtpVariant::ALL`] order and may include the addon variant; the
    /// caller decides whether to keep it.
    pub fn lookup_any_to_rtp(
        &self,
        directory: &str,
        name: &str,
        engine: EngineVersion,
    ) -> Vec<RtpVariant> {
        let Some(entries) = self.categories.get(directory) else {
            return Vec::new();
        };

        RtpVariant::ALL
            .into_iter()
            .filter(|variant| variant.engine() == engine)
            .filter(|variant| {
                entries
                    .iter()
                    .any(|entry| entry.names.get(variant).map(String::as_str) == Some(name))
            })
            .collect()
    }

    /// Translate an asset key from one variant's naming to another's.
    ///
    /// Returns the translated name (when the target variant provides the
    /// asset) and whether the key belongs to the source variant at all.
    pub fn lookup_rtp_to_rtp(
        &self,
        directory: &str,
        name: &str,
        from: RtpVariant,
        to: RtpVariant,
    ) -> (Option<String>, bool) {
        if let Some(entries) = self.categories.get(directory) {
            for entry in entries {
                if entry.names.get(&from).map(String::as_str) == Some(name) {
                    return (entry.names.get(&to).cloned(), true);
                }
            }
        }
        (None, false)
    }

    /// Fingerprint an installation against every variant of an engine
    /// generation (or all variants when `engine` is `None`).
    ///
    /// Returns hit counts for every variant with at least one match, in
    /// [`RtpVariant::ALL`] order. Scoring against the expected counts and
    /// picking winners is the caller's business.
    pub fn detect(
        &self,
        index: &DirectoryIndex,
        rules: &PathRules,
        engine: Option<EngineVersion>,
    ) -> Vec<RtpHit> {
        let mut hits: HashMap<RtpVariant, usize> = HashMap::new();

        for (directory, entries) in &self.categories {
            let extensions = asset::kind_for_directory(directory).extensions();
            for entry in entries {
                for (variant, name) in &entry.names {
                    if engine.is_some_and(|e| variant.engine() != e) {
                        continue;
                    }
                    if index.find_file(rules, directory, name, extensions).is_some() {
                        *hits.entry(*variant).or_insert(0) += 1;
                    }
                }
            }
        }

        RtpVariant::ALL
            .into_iter()
            .filter_map(|variant| {
                let count = hits.get(&variant).copied()?;
                Some(RtpHit {
                    variant,
                    hits: count,
                    max: self.expected_files(variant),
                })
            })
            .collect()
    }
}
