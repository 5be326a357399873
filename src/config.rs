//! # Configuration Module
//!
//! This module holds the process-wide, read-only configuration for
//! headerstamp: the license text and the mapping from file extensions to
//! their [`Category`].
//!
//! A [`HeaderConfig`] is built once at startup (from CLI arguments or the
//! built-in defaults) and handed explicitly to the formatter and the walker.
//! There is no configuration file.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::verbose_log;

/// The license notice applied when no `--license-file` is given.
pub const DEFAULT_LICENSE: &str = "Copyright 2020 Google LLC

Licensed under the Apache License, Version 2.0 (the \"License\");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an \"AS IS\" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.";

/// Default markup-like extensions.
pub const DEFAULT_MARKUP_EXTENSIONS: &[&str] = &["html"];

/// Default code-like extensions.
pub const DEFAULT_CODE_EXTENSIONS: &[&str] = &["ts"];

/// Default stylesheet-like extensions.
pub const DEFAULT_STYLESHEET_EXTENSIONS: &[&str] = &["css"];

/// Default directory walked when no root is given on the command line.
pub const DEFAULT_ROOT: &str = "src/app";

/// Placeholder substituted with the copyright year in license files.
pub const YEAR_PLACEHOLDER: &str = "{{year}}";

/// The three disjoint groups a recognized extension can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
  /// HTML-like files, commented with `<!-- -->`
  Markup,
  /// C-like files, commented with `//` on every line
  Code,
  /// CSS-like files, commented with `/* */`
  Stylesheet,
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Category::Markup => write!(f, "markup"),
      Category::Code => write!(f, "code"),
      Category::Stylesheet => write!(f, "stylesheet"),
    }
  }
}

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The license text is empty after trimming.
  #[error("License text cannot be empty")]
  EmptyLicense,

  /// An extension entry is malformed.
  #[error("Invalid extension '{extension}': {message}")]
  InvalidExtension { extension: String, message: String },

  /// The same extension was assigned to two categories.
  #[error("Extension '{extension}' is listed as both {first} and {second}")]
  DuplicateExtension {
    extension: String,
    first: Category,
    second: Category,
  },

  /// The license file could not be read.
  #[error("Failed to read license file '{path}': {source}")]
  ReadLicense { path: PathBuf, source: std::io::Error },
}

/// Immutable header configuration: the license text plus the
/// extension-to-category map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderConfig {
  license_text: String,
  categories: HashMap<String, Category>,
}

impl Default for HeaderConfig {
  fn default() -> Self {
    let mut categories = HashMap::new();
    for (extensions, category) in [
      (DEFAULT_MARKUP_EXTENSIONS, Category::Markup),
      (DEFAULT_CODE_EXTENSIONS, Category::Code),
      (DEFAULT_STYLESHEET_EXTENSIONS, Category::Stylesheet),
    ] {
      for ext in extensions {
        categories.insert((*ext).to_string(), category);
      }
    }

    Self {
      license_text: DEFAULT_LICENSE.to_string(),
      categories,
    }
  }
}

impl HeaderConfig {
  /// Build a configuration from license text and the three extension sets.
  ///
  /// Extensions are normalized to lowercase. Trailing line breaks of the
  /// license text are dropped so that a license file ending in a newline
  /// produces the same header as the built-in text.
  ///
  /// # Errors
  ///
  /// Returns an error if the license text is empty, an extension is empty or
  /// contains a dot, or an extension appears in more than one set.
  pub fn new<S: AsRef<str>>(
    license_text: &str,
    markup: &[S],
    code: &[S],
    stylesheet: &[S],
  ) -> Result<Self, ConfigError> {
    let license_text = license_text.trim_end_matches(['\n', '\r']);
    if license_text.trim().is_empty() {
      return Err(ConfigError::EmptyLicense);
    }

    let mut categories = HashMap::new();
    for (extensions, category) in [
      (markup, Category::Markup),
      (code, Category::Code),
      (stylesheet, Category::Stylesheet),
    ] {
      for ext in extensions {
        let ext = normalize_extension(ext.as_ref())?;
        match categories.get(&ext) {
          Some(&first) if first != category => {
            return Err(ConfigError::DuplicateExtension {
              extension: ext,
              first,
              second: category,
            });
          }
          Some(_) => {}
          None => {
            categories.insert(ext, category);
          }
        }
      }
    }

    Ok(Self {
      license_text: license_text.to_string(),
      categories,
    })
  }

  /// The license text, without comment markers.
  pub fn license_text(&self) -> &str {
    &self.license_text
  }

  /// Returns the category of `extension`, or `None` if it is not recognized.
  pub fn category_of(&self, extension: &str) -> Option<Category> {
    self.categories.get(&extension.to_lowercase()).copied()
  }

  /// All extensions of one category, sorted.
  pub fn extensions_for(&self, category: Category) -> Vec<&str> {
    let mut extensions: Vec<&str> = self
      .categories
      .iter()
      .filter(|&(_, c)| *c == category)
      .map(|(ext, _)| ext.as_str())
      .collect();
    extensions.sort_unstable();
    extensions
  }
}

fn normalize_extension(ext: &str) -> Result<String, ConfigError> {
  let ext = ext.trim();
  if ext.is_empty() {
    return Err(ConfigError::InvalidExtension {
      extension: ext.to_string(),
      message: "extension cannot be empty".to_string(),
    });
  }

  if ext.starts_with('.') {
    return Err(ConfigError::InvalidExtension {
      extension: ext.to_string(),
      message: "extension should not include leading dot".to_string(),
    });
  }

  if ext.contains('.') {
    return Err(ConfigError::InvalidExtension {
      extension: ext.to_string(),
      message: "extension cannot contain a dot".to_string(),
    });
  }

  if ext.contains(['/', '\\']) {
    return Err(ConfigError::InvalidExtension {
      extension: ext.to_string(),
      message: "extension cannot contain a path separator".to_string(),
    });
  }

  Ok(ext.to_lowercase())
}

/// Substitute every `{{year}}` placeholder in a license template.
pub fn render_license(template: &str, year: &str) -> String {
  template.replace(YEAR_PLACEHOLDER, year)
}

/// Load a license template from disk and render it with `year`.
///
/// # Errors
///
/// Returns [`ConfigError::ReadLicense`] if the file cannot be read or is not
/// valid UTF-8.
pub fn load_license_file(path: &Path, year: &str) -> Result<String, ConfigError> {
  verbose_log!("Loading license from: {}", path.display());

  let template = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadLicense {
    path: path.to_path_buf(),
    source: e,
  })?;

  Ok(render_license(&template, year))
}
