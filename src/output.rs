//! # Output Module
//!
//! This module centralizes all user-facing output for headerstamp.
//! It provides consistent formatting, colors, and symbols for terminal output.
//!
//! - More detail with `-v`, silence with `-q`
//! - In quiet mode, file lists are printed as bare paths for scripting

use std::path::{Path, PathBuf};

use owo_colors::{OwoColorize, Stream};

use crate::logging::{is_quiet, is_verbose};
use crate::report::{FileAction, FileReport, ProcessingSummary};

/// Symbols used in output
pub mod symbols {
  /// Success/header present or added
  pub const SUCCESS: &str = "\u{2713}"; // ✓
  /// Missing header/failure
  pub const FAILURE: &str = "\u{2717}"; // ✗
  /// Skipped
  pub const SKIPPED: &str = "-";
}

/// Maximum number of files to show in the default output before truncating
const DEFAULT_FILE_LIST_LIMIT: usize = 20;

/// Print the initial "Checking ..." or "Processing ..." message.
pub fn print_start_message(roots: &[PathBuf], check_only: bool) {
  if is_quiet() {
    return;
  }

  let verb = if check_only { "Checking" } else { "Processing" };
  let roots = roots
    .iter()
    .map(|root| root.display().to_string())
    .collect::<Vec<_>>()
    .join(", ");

  println!("{} files under {}...", verb, roots);
}

/// Print a blank line (unless quiet).
pub fn print_blank_line() {
  if !is_quiet() {
    println!();
  }
}

/// Print the success message when no file needed attention.
pub fn print_all_files_ok() {
  if is_quiet() {
    return;
  }

  println!(
    "{} All files have their license header",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green())
  );
}

/// Print files whose header was added.
pub fn print_added_files(files: &[&FileReport], base: Option<&Path>) {
  let header = |count: usize| {
    format!(
      "{} Added header to {} {}:",
      symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
      count,
      files_word(count)
    )
  };
  print_file_list(files, base, header);
}

/// Print files missing their header (check mode).
pub fn print_missing_files(files: &[&FileReport], base: Option<&Path>) {
  let header = |count: usize| {
    format!(
      "{} {} {} missing a license header:",
      symbols::FAILURE.if_supports_color(Stream::Stdout, |s| s.red()),
      count,
      files_word(count)
    )
  };
  print_file_list(files, base, header);
}

/// Print files that could not be processed, with their errors.
///
/// Failures go to stderr and are printed even in quiet mode.
pub fn print_failed_files(files: &[&FileReport], base: Option<&Path>) {
  if files.is_empty() {
    return;
  }

  eprintln!(
    "{} {} {} could not be processed:",
    symbols::FAILURE.if_supports_color(Stream::Stderr, |s| s.red()),
    files.len(),
    files_word(files.len())
  );
  for file in files {
    let display_path = make_relative_path(&file.path, base);
    match file.error {
      Some(ref error) => eprintln!("  {}: {}", display_path, error),
      None => eprintln!("  {}", display_path),
    }
  }
}

/// Print a list of files under a header line.
///
/// Shows up to `DEFAULT_FILE_LIST_LIMIT` files, or all of them in verbose
/// mode. Files are sorted alphabetically by path.
fn print_file_list(files: &[&FileReport], base: Option<&Path>, header: impl Fn(usize) -> String) {
  if files.is_empty() {
    return;
  }

  let mut sorted_files: Vec<_> = files.to_vec();
  sorted_files.sort_by(|a, b| a.path.cmp(&b.path));

  if is_quiet() {
    for file in &sorted_files {
      println!("{}", make_relative_path(&file.path, base));
    }
    return;
  }

  let count = sorted_files.len();
  println!("{}", header(count));

  let effective_limit = if is_verbose() { count } else { DEFAULT_FILE_LIST_LIMIT };

  for file in sorted_files.iter().take(effective_limit) {
    println!("  {}", make_relative_path(&file.path, base));
  }

  if count > effective_limit {
    println!(
      "  {}",
      format!("... and {} more (use -v to see all)", count - effective_limit)
        .if_supports_color(Stream::Stdout, |s| s.dimmed())
    );
  }
}

/// Print one line per visited file (verbose mode only).
pub fn print_file_statuses(files: &[FileReport], base: Option<&Path>) {
  if !is_verbose() {
    return;
  }

  for file in files {
    print_file_status(file, base);
  }
}

fn print_file_status(file: &FileReport, base: Option<&Path>) {
  let display_path = make_relative_path(&file.path, base);

  let (symbol, message) = match file.action {
    FileAction::Added => (
      symbols::SUCCESS
        .if_supports_color(Stream::Stdout, |s| s.green())
        .to_string(),
      format!("{} (added)", display_path),
    ),
    FileAction::Present => (
      symbols::SUCCESS
        .if_supports_color(Stream::Stdout, |s| s.green())
        .to_string(),
      display_path,
    ),
    FileAction::WouldAdd => (
      symbols::FAILURE
        .if_supports_color(Stream::Stdout, |s| s.red())
        .to_string(),
      format!("{} (missing header)", display_path),
    ),
    FileAction::Failed => (
      symbols::FAILURE
        .if_supports_color(Stream::Stdout, |s| s.red())
        .to_string(),
      format!("{} (failed)", display_path),
    ),
    FileAction::Skipped => (
      symbols::SKIPPED
        .if_supports_color(Stream::Stdout, |s| s.dimmed())
        .to_string(),
      format!(
        "{} (skipped: no header for extension)",
        display_path.if_supports_color(Stream::Stdout, |s| s.dimmed())
      ),
    ),
  };

  println!("  {} {}", symbol, message);
}

/// Print the end-of-run summary line.
pub fn print_summary(summary: &ProcessingSummary, check_only: bool) {
  if is_quiet() {
    return;
  }

  let mut parts = Vec::new();
  if check_only {
    parts.push(format!("{} missing", summary.headers_missing));
  } else {
    parts.push(format!("{} added", summary.headers_added));
  }
  parts.push(format!("{} ok", summary.headers_present));
  parts.push(format!("{} skipped", summary.files_skipped));
  if summary.files_failed > 0 {
    parts.push(format!("{} failed", summary.files_failed));
  }

  println!(
    "{} {} in {:.2}s ({})",
    summary.total_files,
    files_word(summary.total_files),
    summary.processing_time_secs,
    parts.join(", ")
  );
}

/// Print a dimmed hint line.
pub fn print_hint(hint: &str) {
  if is_quiet() {
    return;
  }

  println!("{}", hint.if_supports_color(Stream::Stdout, |s| s.dimmed()));
}

const fn files_word(count: usize) -> &'static str {
  if count == 1 { "file" } else { "files" }
}

/// Reports grouped by outcome for output.
pub struct CategorizedReports<'a> {
  /// Files that had headers added
  pub added: Vec<&'a FileReport>,
  /// Files missing their header (check mode)
  pub missing: Vec<&'a FileReport>,
  /// Files that already had their header
  pub present: Vec<&'a FileReport>,
  /// Files with no applicable header
  pub skipped: Vec<&'a FileReport>,
  /// Files that could not be processed
  pub failed: Vec<&'a FileReport>,
}

impl<'a> CategorizedReports<'a> {
  /// Categorize a slice of file reports.
  pub fn from_reports(reports: &'a [FileReport]) -> Self {
    let mut categorized = Self {
      added: Vec::new(),
      missing: Vec::new(),
      present: Vec::new(),
      skipped: Vec::new(),
      failed: Vec::new(),
    };

    for report in reports {
      match report.action {
        FileAction::Added => categorized.added.push(report),
        FileAction::WouldAdd => categorized.missing.push(report),
        FileAction::Present => categorized.present.push(report),
        FileAction::Skipped => categorized.skipped.push(report),
        FileAction::Failed => categorized.failed.push(report),
      }
    }

    categorized
  }
}

/// Make a path relative to `base` for display.
///
/// Falls back to the path as given when no relative form exists.
fn make_relative_path(path: &Path, base: Option<&Path>) -> String {
  match base {
    Some(base) if path.is_absolute() == base.is_absolute() => pathdiff::diff_paths(path, base)
      .filter(|relative| !relative.as_os_str().is_empty())
      .unwrap_or_else(|| path.to_path_buf())
      .to_string_lossy()
      .to_string(),
    _ => path.to_string_lossy().to_string(),
  }
}
