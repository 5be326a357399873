//! # Report Module
//!
//! This module records what happened to every visited file and can write the
//! result of a run as JSON or CSV.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;

use crate::config::Category;
use crate::header::extension_of;

/// Information about a visited file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
  /// Path to the file
  #[serde(serialize_with = "serialize_path")]
  pub path: PathBuf,
  /// Category of the file's extension, if recognized
  pub category: Option<Category>,
  /// What happened to the file
  pub action: FileAction,
  /// Error message for failed files
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl FileReport {
  /// Report for a file that was handled without error.
  pub const fn new(path: PathBuf, category: Option<Category>, action: FileAction) -> Self {
    Self {
      path,
      category,
      action,
      error: None,
    }
  }

  /// Report for a file whose processing failed.
  pub fn failed(path: PathBuf, error: &anyhow::Error) -> Self {
    Self {
      path,
      category: None,
      action: FileAction::Failed,
      error: Some(format!("{:#}", error)),
    }
  }
}

/// Possible outcomes for a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileAction {
  /// Header was written to the file
  Added,
  /// Header is missing and would be written outside of check mode
  WouldAdd,
  /// File already starts with its header
  Present,
  /// No header applies to the file's extension
  Skipped,
  /// The file could not be processed
  Failed,
}

impl FileAction {
  /// Short label used in CSV output.
  pub const fn label(self) -> &'static str {
    match self {
      FileAction::Added => "added",
      FileAction::WouldAdd => "would_add",
      FileAction::Present => "present",
      FileAction::Skipped => "skipped",
      FileAction::Failed => "failed",
    }
  }
}

fn serialize_path<S>(path: &Path, serializer: S) -> Result<S::Ok, S::Error>
where
  S: serde::Serializer,
{
  serializer.serialize_str(&path.to_string_lossy())
}

/// Supported report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
  /// JSON format for machine readability
  Json,
  /// CSV format for spreadsheet compatibility
  Csv,
}

impl std::fmt::Display for ReportFormat {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ReportFormat::Json => write!(f, "JSON"),
      ReportFormat::Csv => write!(f, "CSV"),
    }
  }
}

/// Report Generator for writing run reports to disk
pub struct ReportGenerator<'a> {
  format: ReportFormat,
  output_path: &'a Path,
}

#[derive(Serialize)]
struct JsonReport<'a> {
  summary: &'a ProcessingSummary,
  files: &'a [FileReport],
}

impl<'a> ReportGenerator<'a> {
  /// Create a new report generator
  pub const fn new(format: ReportFormat, output_path: &'a Path) -> Self {
    Self { format, output_path }
  }

  /// Write the report for `files` and `summary` to the output path.
  pub fn generate(&self, files: &[FileReport], summary: &ProcessingSummary) -> Result<()> {
    let content = self.render(files, summary)?;

    fs::write(self.output_path, content)
      .with_context(|| format!("Failed to write {} report to {}", self.format, self.output_path.display()))
  }

  /// Render the report without writing it.
  pub fn render(&self, files: &[FileReport], summary: &ProcessingSummary) -> Result<String> {
    match self.format {
      ReportFormat::Json => Self::generate_json(files, summary),
      ReportFormat::Csv => Ok(Self::generate_csv(files, summary)),
    }
  }

  fn generate_json(files: &[FileReport], summary: &ProcessingSummary) -> Result<String> {
    let report = JsonReport { summary, files };
    serde_json::to_string_pretty(&report).context("Failed to serialize JSON report")
  }

  fn generate_csv(files: &[FileReport], summary: &ProcessingSummary) -> String {
    let mut csv = String::from("file_path,extension,category,action,error\n");

    for file in files {
      // Escape commas so each row keeps five columns
      let path = file.path.to_string_lossy().replace(',', "%2C");
      let extension = extension_of(&file.path).unwrap_or("").replace(',', "%2C");
      let category = file.category.map(|c| c.to_string()).unwrap_or_default();
      let error = file.error.as_deref().unwrap_or("").replace(',', "%2C").replace('\n', " ");

      csv.push_str(&format!(
        "{},{},{},{},{}\n",
        path,
        extension,
        category,
        file.action.label(),
        error
      ));
    }

    csv.push_str("\n# Summary\n");
    csv.push_str(&format!("Total files,{}\n", summary.total_files));
    csv.push_str(&format!("Headers added,{}\n", summary.headers_added));
    csv.push_str(&format!("Headers missing,{}\n", summary.headers_missing));
    csv.push_str(&format!("Headers present,{}\n", summary.headers_present));
    csv.push_str(&format!("Files skipped,{}\n", summary.files_skipped));
    csv.push_str(&format!("Files failed,{}\n", summary.files_failed));
    csv.push_str(&format!("Processing time (seconds),{:.2}\n", summary.processing_time_secs));

    csv
  }
}

/// Summary of a run
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingSummary {
  /// Number of files visited
  pub total_files: usize,
  /// Number of headers written
  pub headers_added: usize,
  /// Number of files missing their header (check mode)
  pub headers_missing: usize,
  /// Number of files already carrying their header
  pub headers_present: usize,
  /// Number of files with no applicable header
  pub files_skipped: usize,
  /// Number of files that could not be processed
  pub files_failed: usize,
  /// Total processing time
  #[serde(skip_serializing)]
  pub processing_time: Duration,
  /// Processing time in seconds for serialization
  #[serde(rename = "processing_time_seconds")]
  pub processing_time_secs: f64,
  /// Unix timestamp of when the summary was created
  pub timestamp: i64,
}

impl ProcessingSummary {
  /// Create a new ProcessingSummary initialized to zero
  pub fn new(processing_time: Duration) -> Self {
    Self {
      total_files: 0,
      headers_added: 0,
      headers_missing: 0,
      headers_present: 0,
      files_skipped: 0,
      files_failed: 0,
      processing_time,
      processing_time_secs: processing_time.as_secs_f64(),
      timestamp: Local::now().timestamp(),
    }
  }

  /// Create a ProcessingSummary from a collection of FileReports
  pub fn from_reports(files: &[FileReport], processing_time: Duration) -> Self {
    let mut summary = Self::new(processing_time);
    summary.total_files = files.len();

    for file in files {
      match file.action {
        FileAction::Added => summary.headers_added += 1,
        FileAction::WouldAdd => summary.headers_missing += 1,
        FileAction::Present => summary.headers_present += 1,
        FileAction::Skipped => summary.files_skipped += 1,
        FileAction::Failed => summary.files_failed += 1,
      }
    }

    summary
  }

  /// Whether the run leaves files that still need attention.
  pub const fn has_issues(&self) -> bool {
    self.headers_missing > 0 || self.files_failed > 0
  }
}
