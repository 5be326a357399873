//! # File I/O Module
//!
//! This module provides the file reading and writing used by the processor.
//! Contents are handled as raw bytes so that files which are not valid UTF-8
//! are prefixed without being re-encoded.

use std::path::Path;

use anyhow::{Context, Result};

/// File I/O operations for the processor.
///
/// This struct provides static methods for reading and writing files.
pub struct FileIO;

impl FileIO {
  /// Read the full content of a file.
  ///
  /// # Parameters
  ///
  /// * `path` - Path to the file to read
  ///
  /// # Returns
  ///
  /// The complete file content as bytes.
  pub fn read_full_content(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))
  }

  /// Overwrite a file with `header` followed by `body`, in a single write.
  ///
  /// # Parameters
  ///
  /// * `path` - Path to the file to write
  /// * `header` - Bytes placed at the start of the file
  /// * `body` - The previous content of the file
  pub fn write_with_prefix(path: &Path, header: &[u8], body: &[u8]) -> Result<()> {
    let mut content = Vec::with_capacity(header.len() + body.len());
    content.extend_from_slice(header);
    content.extend_from_slice(body);

    std::fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
  }
}
