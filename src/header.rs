//! # Header Module
//!
//! This module turns the configured license text into a header block for a
//! given file extension.
//!
//! The module includes:
//! - [`extension_of`] for deriving the extension of a path
//! - [`CommentStyle`] for the delimiters of each [`Category`]
//! - [`HeaderFormatter`] for producing the formatted header (or `None` when no
//!   header applies to an extension)
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use headerstamp::config::HeaderConfig;
//! use headerstamp::header::HeaderFormatter;
//!
//! let formatter = HeaderFormatter::new(Arc::new(HeaderConfig::default()));
//!
//! let header = formatter.format("css").expect("css is a stylesheet extension");
//! assert!(header.starts_with("/*\nCopyright 2020 Google LLC\n"));
//! assert!(header.ends_with("\n*/\n\n"));
//!
//! assert!(formatter.format("md").is_none());
//! ```

use std::path::Path;
use std::sync::Arc;

use crate::config::{Category, HeaderConfig};

/// Returns the extension of `path`: the part of its file name after the last
/// `.`.
///
/// A file name without any `.` has no extension. Hidden files are not special
/// cased, so `.html` yields `html`. A trailing dot yields an empty extension,
/// which no category recognizes. The rest of the file name need not be valid
/// UTF-8; only a non-UTF-8 extension yields `None`.
pub fn extension_of(path: &Path) -> Option<&str> {
  let file_name = path.file_name()?.as_encoded_bytes();
  let dot = file_name.iter().rposition(|&b| b == b'.')?;
  std::str::from_utf8(&file_name[dot + 1..]).ok()
}

/// Defines the comment delimiters wrapped around the license text.
///
/// # Fields
///
/// * `top` - Line emitted before the license text (e.g., "<!--")
/// * `middle` - Prefix for each license line (e.g., "// ")
/// * `bottom` - Line emitted after the license text (e.g., "*/")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentStyle {
  /// The string to use at the top of a comment block
  pub top: String,

  /// The string to use at the beginning of each line in the comment block
  pub middle: String,

  /// The string to use at the bottom of a comment block
  pub bottom: String,
}

impl CommentStyle {
  /// Create a line-comment style (no top/bottom markers).
  ///
  /// # Arguments
  ///
  /// * `prefix` - The prefix to use for each line (e.g., "// ")
  pub fn line(prefix: &str) -> Self {
    Self {
      top: String::new(),
      middle: prefix.to_string(),
      bottom: String::new(),
    }
  }

  /// Create a block-comment style whose body is the raw license text.
  ///
  /// # Arguments
  ///
  /// * `top` - The string to start the comment block (e.g., "/*")
  /// * `bottom` - The string to end the comment block (e.g., "*/")
  pub fn block(top: &str, bottom: &str) -> Self {
    Self {
      top: top.to_string(),
      middle: String::new(),
      bottom: bottom.to_string(),
    }
  }

  /// The comment style used for every extension of `category`.
  pub fn for_category(category: Category) -> Self {
    match category {
      Category::Markup => Self::block("<!--", "-->"),
      Category::Code => Self::line("// "),
      Category::Stylesheet => Self::block("/*", "*/"),
    }
  }

  /// Wraps `text` in this comment style.
  pub fn wrap(&self, text: &str) -> String {
    format_with_comment_style(text, self)
  }
}

/// Formats license text with the given comment style.
///
/// It handles:
/// - Adding the top comment marker (if any) on its own line
/// - Prefixing each line with the middle marker; an empty line gets the
///   marker without its trailing whitespace
/// - Adding the bottom comment marker (if any) on its own line
/// - Ending with a blank line that separates the header from the file body
pub fn format_with_comment_style(license_text: &str, style: &CommentStyle) -> String {
  let mut result = String::with_capacity(license_text.len() + 64);

  if !style.top.is_empty() {
    result.push_str(&style.top);
    result.push('\n');
  }

  for line in license_text.lines() {
    if line.is_empty() {
      result.push_str(style.middle.trim_end());
    } else {
      result.push_str(&style.middle);
      result.push_str(line);
    }
    result.push('\n');
  }

  if !style.bottom.is_empty() {
    result.push_str(&style.bottom);
    result.push('\n');
  }

  result.push('\n');

  result
}

/// Maps extensions to fully formatted license headers.
///
/// The formatter is pure: the same extension always yields the same header
/// for a given [`HeaderConfig`].
#[derive(Debug, Clone)]
pub struct HeaderFormatter {
  config: Arc<HeaderConfig>,
}

impl HeaderFormatter {
  /// Creates a formatter over a shared configuration.
  pub const fn new(config: Arc<HeaderConfig>) -> Self {
    Self { config }
  }

  /// The configuration this formatter reads from.
  pub fn config(&self) -> &HeaderConfig {
    &self.config
  }

  /// Returns the header for `extension`, or `None` when the extension belongs
  /// to no category.
  pub fn format(&self, extension: &str) -> Option<String> {
    let category = self.config.category_of(extension)?;
    Some(CommentStyle::for_category(category).wrap(self.config.license_text()))
  }

  /// Returns the header for the file at `path`, or `None` when no header
  /// applies.
  pub fn format_for_path(&self, path: &Path) -> Option<String> {
    extension_of(path).and_then(|ext| self.format(ext))
  }
}
