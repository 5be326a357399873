//! # Processor Module
//!
//! This module contains the core of headerstamp: making sure a file starts
//! with its license header, and running that over whole directory trees.
//!
//! The module is organized into several submodules:
//! - [`file_io`] - File reading and writing operations
//! - [`file_collector`] - Directory traversal and ignore patterns
//!
//! [`FileProcessor`] handles a single file. [`Processor`] walks the roots,
//! feeds each regular file to the [`FileProcessor`], and collects a
//! [`FileReport`] for every file it visited.

mod file_collector;
mod file_io;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
pub use file_collector::FileCollector;
pub use file_io::FileIO;
use tracing::{debug, trace, warn};

use crate::config::HeaderConfig;
use crate::diff::DiffManager;
use crate::header::{HeaderFormatter, extension_of};
use crate::report::{FileAction, FileReport};

/// Outcome of [`FileProcessor::update_header`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderUpdate {
  /// The extension has no header; the file was not read
  NotApplicable,
  /// The file already starts with its header
  AlreadyPresent,
  /// The header was prepended to the file
  Added,
  /// The header is missing; nothing was written because of check mode
  WouldAdd,
}

impl From<HeaderUpdate> for FileAction {
  fn from(update: HeaderUpdate) -> Self {
    match update {
      HeaderUpdate::NotApplicable => FileAction::Skipped,
      HeaderUpdate::AlreadyPresent => FileAction::Present,
      HeaderUpdate::Added => FileAction::Added,
      HeaderUpdate::WouldAdd => FileAction::WouldAdd,
    }
  }
}

/// Ensures a single file is prefixed with its license header.
pub struct FileProcessor {
  formatter: HeaderFormatter,
  check_only: bool,
  diff_manager: DiffManager,
}

impl FileProcessor {
  /// Creates a processor that writes headers into files.
  pub fn new(formatter: HeaderFormatter) -> Self {
    Self {
      formatter,
      check_only: false,
      diff_manager: DiffManager::default(),
    }
  }

  /// Switches to check mode: files are inspected but never written.
  pub fn check_only(mut self, check_only: bool) -> Self {
    self.check_only = check_only;
    self
  }

  /// Uses `diff_manager` to render the change for every file missing its
  /// header.
  pub fn with_diff_manager(mut self, diff_manager: DiffManager) -> Self {
    self.diff_manager = diff_manager;
    self
  }

  /// The formatter used to build headers.
  pub const fn formatter(&self) -> &HeaderFormatter {
    &self.formatter
  }

  /// Makes sure the file at `path` starts with the header for its extension.
  ///
  /// Files whose extension has no header are left untouched without being
  /// read. A file already starting with exactly its header is not rewritten,
  /// which makes the operation idempotent. Otherwise the whole file is
  /// overwritten with the header followed by its previous content, unless the
  /// processor is in check mode.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or written.
  pub fn update_header(&self, path: &Path) -> Result<HeaderUpdate> {
    let Some(header) = self.formatter.format_for_path(path) else {
      trace!("Skipping: {} (no header for extension)", path.display());
      return Ok(HeaderUpdate::NotApplicable);
    };

    let content = FileIO::read_full_content(path)?;
    if content.starts_with(header.as_bytes()) {
      trace!("Header present: {}", path.display());
      return Ok(HeaderUpdate::AlreadyPresent);
    }

    if self.diff_manager.is_enabled() {
      let original = String::from_utf8_lossy(&content);
      let updated = format!("{}{}", header, original);
      self
        .diff_manager
        .display_diff(path, &original, &updated)
        .with_context(|| format!("Failed to render diff for {}", path.display()))?;
    }

    if self.check_only {
      debug!("Missing header: {}", path.display());
      return Ok(HeaderUpdate::WouldAdd);
    }

    FileIO::write_with_prefix(path, header.as_bytes(), &content)?;
    debug!("Added header: {}", path.display());

    Ok(HeaderUpdate::Added)
  }
}

/// Configuration for creating a Processor instance.
pub struct ProcessorConfig {
  pub header_config: Arc<HeaderConfig>,

  // Behavior flags
  pub check_only: bool,
  pub keep_going: bool,

  // Optional components
  pub ignore_patterns: Vec<String>,
  pub diff_manager: Option<DiffManager>,
}

impl ProcessorConfig {
  /// Creates a new ProcessorConfig with required fields and sensible defaults.
  ///
  /// Use struct update syntax to override specific fields:
  /// ```ignore
  /// ProcessorConfig {
  ///     check_only: true,
  ///     ..ProcessorConfig::new(header_config)
  /// }
  /// ```
  pub fn new(header_config: HeaderConfig) -> Self {
    Self {
      header_config: Arc::new(header_config),
      check_only: false,
      keep_going: false,
      ignore_patterns: vec![],
      diff_manager: None,
    }
  }
}

/// Runs [`FileProcessor::update_header`] over every regular file beneath a
/// set of roots.
///
/// By default the first error aborts the run. With `keep_going`, failures are
/// recorded as [`FileAction::Failed`] reports and the walk continues.
pub struct Processor {
  file_processor: FileProcessor,
  file_collector: FileCollector,
  keep_going: bool,
}

impl Processor {
  /// Creates a new processor from `config`.
  ///
  /// # Errors
  ///
  /// Returns an error if any of the ignore patterns is invalid.
  pub fn new(config: ProcessorConfig) -> Result<Self> {
    let file_collector = FileCollector::new(&config.ignore_patterns)?;

    let file_processor = FileProcessor::new(HeaderFormatter::new(config.header_config))
      .check_only(config.check_only)
      .with_diff_manager(config.diff_manager.unwrap_or_default());

    Ok(Self {
      file_processor,
      file_collector,
      keep_going: config.keep_going,
    })
  }

  /// The single-file processor used for every visited file.
  pub const fn file_processor(&self) -> &FileProcessor {
    &self.file_processor
  }

  /// Processes every regular file beneath each of `roots`.
  ///
  /// A file reached twice in the same run (overlapping roots, or the same
  /// root spelled differently) is processed once, under the first path it was
  /// reached by.
  ///
  /// # Returns
  ///
  /// One report per visited file, in visiting order.
  ///
  /// # Errors
  ///
  /// Returns an error if a root does not exist, or, unless `keep_going` is
  /// set, on the first file or directory that cannot be processed.
  pub fn process(&self, roots: &[PathBuf]) -> Result<Vec<FileReport>> {
    let mut reports = Vec::new();
    let mut visited = HashSet::new();

    for root in roots {
      anyhow::ensure!(root.exists(), "Root path does not exist: {}", root.display());

      let start = std::time::Instant::now();
      let before = reports.len();

      for entry in self.file_collector.files(root) {
        let path = match entry {
          Ok(path) => path,
          Err(e) => {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone());
            let error = anyhow::Error::new(e).context(format!("Failed to walk {}", root.display()));
            self.record_failure(path, error, &mut reports)?;
            continue;
          }
        };

        let key = std::fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
        if !visited.insert(key) {
          trace!("Skipping: {} (already visited)", path.display());
          continue;
        }

        match self.file_processor.update_header(&path) {
          Ok(update) => {
            let config = self.file_processor.formatter().config();
            let category = extension_of(&path).and_then(|ext| config.category_of(ext));
            reports.push(FileReport::new(path, category, update.into()));
          }
          Err(e) => self.record_failure(path, e, &mut reports)?,
        }
      }

      debug!(
        "Visited {} files under {} in {}ms",
        reports.len() - before,
        root.display(),
        start.elapsed().as_millis()
      );
    }

    Ok(reports)
  }

  fn record_failure(&self, path: PathBuf, error: anyhow::Error, reports: &mut Vec<FileReport>) -> Result<()> {
    if !self.keep_going {
      return Err(error);
    }

    warn!("{:#}", error);
    reports.push(FileReport::failed(path, &error));
    Ok(())
  }
}
