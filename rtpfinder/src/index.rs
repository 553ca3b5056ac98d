//! In-memory, case-normalized snapshots of physical directories.
//!
//! A [`DirectoryIndex`] is built once from disk and then answers lookups
//! without further I/O. Keys are normalized with [`crate::path::normalize`];
//! values keep the on-disk spelling so resolved paths preserve original
//! casing on platforms where it matters.
//!
//! An index is a read-only snapshot: changes on disk after the build are not
//! observed. That staleness is an accepted limitation, not a bug: game
//! installations do not mutate mid-session.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::fsops::{self, EntryType};
use crate::path::{self, PathRules};

/// How much of a directory to capture when building an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    /// Regular files in the root only.
    Files,
    /// Subdirectories of the root only.
    Directories,
    /// Files and subdirectories of the root, non-recursive.
    All,
    /// Everything: the root's files and directories, plus a flattened file
    /// map per immediate subdirectory covering all deeper levels.
    Recursive,
}

/// Mapping from normalized name to on-disk name.
pub type NameMap = HashMap<String, String>;

#[derive(Debug, Default)]
struct Members {
    files: NameMap,
    directories: NameMap,
}

/// A normalized snapshot of one physical directory.
#[derive(Debug, Clone)]
pub struct DirectoryIndex {
    root: PathBuf,
    files: NameMap,
    directories: NameMap,
    /// Per immediate subdirectory (normalized name), the flattened file map
    /// of that subtree: normalized relative path → on-disk relative path.
    /// Populated only by [`BuildMode::Recursive`].
    children: HashMap<String, NameMap>,
}

impl DirectoryIndex {
    /// Build an index over `root`.
    ///
    /// Returns `None` when `root` does not exist or is not a directory;
    /// callers must check before use. Enumeration errors deeper in the tree
    /// are logged and the affected subtree is skipped.
    pub fn build(root: impl Into<PathBuf>, mode: BuildMode) -> Option<Self> {
        let root = root.into();
        if !(fsops::exists(&root) && fsops::is_directory(&root, true)) {
            return None;
        }

        let scan_mode = match mode {
            BuildMode::Recursive => BuildMode::All,
            other => other,
        };
        let members = scan(&root, scan_mode, "");

        let mut index = Self {
            root,
            files: members.files,
            directories: members.directories,
            children: HashMap::new(),
        };

        if mode == BuildMode::Recursive {
            for (normalized, actual) in &index.directories {
                let sub = scan(&index.root.join(actual), BuildMode::Recursive, "");
                index.children.insert(normalized.clone(), sub.files);
            }
        }

        Some(index)
    }

    /// The physical root this index was built from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// On-disk name of a root-level file, by normalized name.
    pub fn file(&self, normalized: &str) -> Option<&str> {
        self.files.get(normalized).map(String::as_str)
    }

    /// On-disk name of an immediate subdirectory, by normalized name.
    pub fn directory(&self, normalized: &str) -> Option<&str> {
        self.directories.get(normalized).map(String::as_str)
    }

    /// All root-level files.
    pub fn files(&self) -> &NameMap {
        &self.files
    }

    /// All immediate subdirectories.
    pub fn directories(&self) -> &NameMap {
        &self.directories
    }

    /// Flattened file map of a subdirectory (recursive builds only).
    pub fn files_in(&self, normalized_dir: &str) -> Option<&NameMap> {
        self.children.get(normalized_dir)
    }

    /// Look up `directory/name + extension` inside this index.
    ///
    /// Both parts are normalized independently. The combined path is
    /// canonicalized first: if the request smuggled in traversal or
    /// escape-symbol sequences, the corrected path is used instead, and
    /// when the whole thing collapses to a bare root-relative name, the
    /// lookup retries against the root file map with each extension.
    ///
    /// An empty `directory` addresses the root: a plain name searches the
    /// root file map, a name carrying a separator is split into directory
    /// and basename first.
    ///
    /// Extensions are tried in the given order; the first hit wins. Pass
    /// `&[""]` to look the name up verbatim.
    pub fn find_file(
        &self,
        rules: &PathRules,
        directory: &str,
        name: &str,
        extensions: &[&str],
    ) -> Option<PathBuf> {
        let mut corrected_dir = path::normalize(directory);
        let mut corrected_name = path::normalize(name);

        // A handful of games use `..` inside asset names to point outside
        // the requested directory. Canonicalize with one level of budget
        // (the directory itself) and continue with the corrected pair. An
        // empty directory takes the same route: the name alone decides
        // whether the lookup targets the root or a subdirectory.
        let combined = path::join(&corrected_dir, &corrected_name);
        let canonical = path::canonicalize(&combined, 1, rules);
        if combined != canonical || corrected_dir.is_empty() {
            match canonical.find('/') {
                None => {
                    // Collapsed to a root-relative filename.
                    for extension in extensions {
                        let candidate = path::normalize(&format!("{canonical}{extension}"));
                        if let Some(actual) = self.files.get(&candidate) {
                            return Some(self.root.join(actual));
                        }
                    }
                    return None;
                }
                Some(pos) => {
                    corrected_dir = canonical[..pos].to_string();
                    corrected_name = canonical[pos + 1..].to_string();
                }
            }
        }

        // Escape-symbol occurrences inside the basename address nested
        // entries; rewrite them to the universal separator.
        let escape = rules.escape_symbol();
        if !escape.is_empty() && escape != "/" {
            corrected_name = corrected_name.replace(escape, "/");
        }

        let actual_dir = self.directories.get(&corrected_dir)?;
        let dir_map = self.children.get(&corrected_dir)?;

        for extension in extensions {
            let key = path::normalize(&format!("{corrected_name}{extension}"));
            if let Some(actual) = dir_map.get(&key) {
                return Some(self.root.join(actual_dir).join(actual));
            }
        }

        None
    }

    /// Look up a name at the index root, without appending extensions.
    ///
    /// A name containing a separator is re-split into its first segment
    /// (taken as the directory) and the remainder, and resolved through
    /// [`Self::find_file`].
    pub fn find_default(&self, rules: &PathRules, name: &str) -> Option<PathBuf> {
        let components = path::split(name, rules);
        if components.len() > 1 {
            let rest = components[1..].join("/");
            return self.find_file(rules, &components[0], &rest, &[""]);
        }

        let actual = self.files.get(&path::normalize(name))?;
        Some(self.root.join(actual))
    }
}

/// Scan one directory level (or a whole subtree in `Recursive` mode).
///
/// In `Recursive` mode the returned file map is flattened: keys are
/// normalized paths relative to the scanned root, joined with `/`.
fn scan(dir: &Path, mode: BuildMode, parent: &str) -> Members {
    let mut members = Members::default();

    let entries = match fsops::enumerate_entries(dir) {
        Ok(entries) => entries,
        Err(error) => {
            debug!(path = %dir.display(), %error, "failed to enumerate directory");
            return members;
        }
    };

    for (name, entry_type) in entries {
        let is_directory = match entry_type {
            EntryType::Directory => true,
            EntryType::File => false,
            EntryType::Unknown => fsops::is_directory(&dir.join(&name), true),
        };

        match mode {
            BuildMode::Files if is_directory => continue,
            BuildMode::Directories if !is_directory => continue,
            BuildMode::Recursive => {
                if is_directory {
                    let sub = scan(&dir.join(&name), BuildMode::Recursive, &path::join(parent, &name));
                    members.files.extend(sub.files);
                    members.directories.extend(sub.directories);
                    continue;
                }
                let relative = path::join(parent, &name);
                members.files.insert(path::normalize(&relative), relative);
                continue;
            }
            _ => {}
        }

        let normalized = path::normalize(&name);
        if is_directory {
            if members.directories.contains_key(&normalized) {
                // Broken installations sometimes provide a folder twice with
                // different casing. First one wins; the operator has to merge
                // them by hand.
                warn!(
                    directory = %name,
                    "directory provided twice with different casing; keeping the first"
                );
                continue;
            }
            members.directories.insert(normalized, name);
        } else {
            members.files.insert(normalized, name);
        }
    }

    members
}
