//! Filesystem utilities.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Remove a file if it exists. Returns whether something was removed.
pub fn remove_file_if_exists(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(path).with_context(|| format!("failed to remove file: {}", path.display()))?;
    Ok(true)
}

/// C headers directly inside `dir`, sorted by path.
pub fn header_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut results = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("failed to list directory: {}", dir.display()))?;
        let path = entry.path();
        let is_header = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("h") | Some("hpp")
        );
        if entry.file_type().is_file() && is_header {
            results.push(path.to_path_buf());
        }
    }

    results.sort();
    Ok(results)
}

/// A set of files written next to their destinations and moved into place
/// together.
///
/// Dropping the set without calling [`StagedFiles::commit`] deletes every
/// staged file and leaves the destinations untouched.
#[derive(Default)]
pub struct StagedFiles {
    staged: Vec<(NamedTempFile, PathBuf)>,
}

impl StagedFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `contents` to a temporary file in the destination's directory.
    pub fn stage(&mut self, path: &Path, contents: &str) -> Result<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        ensure_dir(&parent)?;

        let mut file = NamedTempFile::new_in(&parent)
            .with_context(|| format!("failed to create temporary file in {}", parent.display()))?;
        file.write_all(contents.as_bytes())
            .with_context(|| format!("failed to stage {}", path.display()))?;
        self.staged.push((file, path.to_path_buf()));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Move every staged file onto its destination.
    pub fn commit(self) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.staged.len());
        for (file, path) in self.staged {
            file.persist(&path)
                .with_context(|| format!("failed to write file: {}", path.display()))?;
            written.push(path);
        }
        Ok(written)
    }
}
