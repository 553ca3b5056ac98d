//! Thin wrappers over the filesystem primitives the core depends on.
//!
//! Everything the index builder and resolver need from the host boils down
//! to four operations: existence, directory check, entry enumeration, and
//! file size. Keeping them in one place makes the dependency surface of the
//! rest of the crate explicit.

use std::fs;
use std::io;
use std::path::Path;

/// Entry type reported by [`enumerate_entries`].
///
/// `Unknown` means the directory enumeration could not cheaply classify the
/// entry (typical for symlinks or exotic filesystems); callers should fall
/// back to [`is_directory`] with symlink following.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    File,
    Directory,
    Unknown,
}

/// Whether a path exists at all.
pub fn exists(path: &Path) -> bool {
    path.exists()
}

/// Whether a path is a directory.
///
/// With `follow_symlinks` a symlink to a directory counts as a directory;
/// without it, only a real directory does.
pub fn is_directory(path: &Path, follow_symlinks: bool) -> bool {
    let metadata = if follow_symlinks {
        fs::metadata(path)
    } else {
        fs::symlink_metadata(path)
    };
    metadata.map(|m| m.is_dir()).unwrap_or(false)
}

/// Enumerate the entries of a directory as `(name, type)` pairs.
///
/// Entries whose names are not valid Unicode are skipped; game data with
/// such names cannot be addressed by logical lookups anyway.
pub fn enumerate_entries(path: &Path) -> io::Result<Vec<(String, EntryType)>> {
    let mut entries = Vec::new();

    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(_) => continue,
        };

        let entry_type = match entry.file_type() {
            Ok(t) if t.is_dir() => EntryType::Directory,
            Ok(t) if t.is_file() => EntryType::File,
            _ => EntryType::Unknown,
        };

        entries.push((name, entry_type));
    }

    Ok(entries)
}

/// Size of a regular file in bytes, or `None` when the path is missing or
/// not a regular file.
pub fn file_size(path: &Path) -> Option<u64> {
    fs::metadata(path)
        .ok()
        .filter(|m| m.is_file())
        .map(|m| m.len())
}
