//! # File Collector Module
//!
//! This module walks a root directory and yields the regular files beneath
//! it. Directories are only traversed, and symbolic links and special files
//! are never yielded.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// File collector for directory traversal.
///
/// The `FileCollector` handles:
/// - Recursive traversal of a root without following symbolic links
/// - Pruning of files and directories that match an ignore pattern
pub struct FileCollector {
  /// Compiled ignore patterns
  ignore_patterns: Vec<glob::Pattern>,
}

impl FileCollector {
  /// Creates a new FileCollector with the given ignore patterns.
  ///
  /// Patterns are matched against the path relative to the walked root and
  /// against the bare file name. A trailing `/` is accepted and ignored.
  ///
  /// # Errors
  ///
  /// Returns an error if any pattern is not a valid glob.
  pub fn new(patterns: &[String]) -> Result<Self> {
    let ignore_patterns = patterns
      .iter()
      .map(|pattern| {
        let trimmed = pattern.trim_end_matches('/');
        glob::Pattern::new(trimmed).with_context(|| format!("Invalid ignore pattern: {}", pattern))
      })
      .collect::<Result<Vec<_>>>()?;

    Ok(Self { ignore_patterns })
  }

  /// Checks whether `path`, found under `root`, matches an ignore pattern.
  pub fn is_ignored(&self, root: &Path, path: &Path) -> bool {
    if self.ignore_patterns.is_empty() {
      return false;
    }

    let relative = path.strip_prefix(root).unwrap_or(path);
    let relative = relative.to_string_lossy().replace('\\', "/");
    let file_name = path.file_name().map(|name| name.to_string_lossy()).unwrap_or_default();

    self
      .ignore_patterns
      .iter()
      .any(|pattern| pattern.matches(&relative) || pattern.matches(&file_name))
  }

  /// Walks `root` recursively and yields every regular file beneath it.
  ///
  /// Entries within a directory are visited in file name order. If `root` is
  /// itself a regular file, it is the only item yielded. Traversal errors
  /// (unreadable directories, entries removed mid-walk) are yielded as
  /// `Err` so the caller decides whether they abort the run.
  pub fn files<'a>(&'a self, root: &'a Path) -> impl Iterator<Item = Result<PathBuf, walkdir::Error>> + 'a {
    debug!("Scanning directory: {}", root.display());

    WalkDir::new(root)
      .follow_links(false)
      .sort_by_file_name()
      .into_iter()
      .filter_entry(move |entry| {
        if entry.depth() > 0 && self.is_ignored(root, entry.path()) {
          trace!("Skipping: {} (matches ignore pattern)", entry.path().display());
          return false;
        }
        true
      })
      .filter_map(|entry| match entry {
        Ok(entry) if entry.file_type().is_file() => Some(Ok(entry.into_path())),
        Ok(entry) => {
          if !entry.file_type().is_dir() {
            trace!("Skipping: {} (not a regular file)", entry.path().display());
          }
          None
        }
        Err(e) => Some(Err(e)),
      })
  }
}
