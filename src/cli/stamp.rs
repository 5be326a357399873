//! # Stamp Command
//!
//! This module implements the one command of headerstamp: walk the roots and
//! add (or, with `--check`, look for) license headers.

use std::path::PathBuf;
use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::Args;
use headerstamp::config::{
  Category, DEFAULT_CODE_EXTENSIONS, DEFAULT_LICENSE, DEFAULT_MARKUP_EXTENSIONS, DEFAULT_ROOT, DEFAULT_STYLESHEET_EXTENSIONS,
  HeaderConfig, load_license_file,
};
use headerstamp::diff::DiffManager;
use headerstamp::info_log;
use headerstamp::logging::{ColorMode, init_tracing, set_quiet, set_verbose};
use headerstamp::output::{
  CategorizedReports, print_added_files, print_all_files_ok, print_blank_line, print_failed_files, print_file_statuses,
  print_hint, print_missing_files, print_start_message, print_summary,
};
use headerstamp::processor::{Processor, ProcessorConfig};
use headerstamp::report::{FileReport, ProcessingSummary, ReportFormat, ReportGenerator};
use tracing::debug;

/// Arguments for the stamp command
#[derive(Args, Debug, Default)]
pub struct StampArgs {
  /// Directories (or files) to process recursively [default: src/app]
  #[arg(value_name = "ROOT")]
  pub roots: Vec<PathBuf>,

  /// Check mode: report files missing their header without modifying them
  #[arg(long)]
  pub check: bool,

  /// Show a diff of the changes check mode would make
  #[arg(long, requires = "check")]
  pub show_diff: bool,

  /// Save the diff of the changes check mode would make to a file
  #[arg(long, short = 'o', value_name = "FILE", requires = "check")]
  pub save_diff: Option<PathBuf>,

  /// License text to use instead of the built-in notice; `{{year}}` is
  /// replaced with the copyright year
  #[arg(long, short = 'f', value_name = "FILE")]
  pub license_file: Option<PathBuf>,

  /// Copyright year substituted into the license file [default: current year]
  #[arg(long)]
  pub year: Option<String>,

  /// Extensions commented with `<!-- -->` (repeatable, replaces the default
  /// "html")
  #[arg(long, value_name = "EXT")]
  pub markup_ext: Vec<String>,

  /// Extensions commented with `//` on every line (repeatable, replaces the
  /// default "ts")
  #[arg(long, value_name = "EXT")]
  pub code_ext: Vec<String>,

  /// Extensions commented with `/* */` (repeatable, replaces the default
  /// "css")
  #[arg(long, value_name = "EXT")]
  pub style_ext: Vec<String>,

  /// File patterns to ignore (supports glob patterns)
  #[arg(long, short = 'i', value_name = "GLOB")]
  pub ignore: Vec<String>,

  /// Keep processing other files when one cannot be read or written
  #[arg(long)]
  pub keep_going: bool,

  /// Write a JSON report of the run to the specified path
  #[arg(long, value_name = "OUTPUT")]
  pub report_json: Option<PathBuf>,

  /// Write a CSV report of the run to the specified path
  #[arg(long, value_name = "OUTPUT")]
  pub report_csv: Option<PathBuf>,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,
}

impl StampArgs {
  /// The roots to walk, falling back to the default root.
  pub fn roots(&self) -> Vec<PathBuf> {
    if self.roots.is_empty() {
      vec![PathBuf::from(DEFAULT_ROOT)]
    } else {
      self.roots.clone()
    }
  }

  /// Build the header configuration from the license and extension flags.
  pub fn header_config(&self) -> Result<HeaderConfig> {
    let license_text = match self.license_file {
      Some(ref path) => {
        let year = self
          .year
          .clone()
          .unwrap_or_else(|| chrono::Local::now().year().to_string());
        load_license_file(path, &year)?
      }
      None => DEFAULT_LICENSE.to_string(),
    };

    let markup = extensions_or_default(&self.markup_ext, DEFAULT_MARKUP_EXTENSIONS);
    let code = extensions_or_default(&self.code_ext, DEFAULT_CODE_EXTENSIONS);
    let stylesheet = extensions_or_default(&self.style_ext, DEFAULT_STYLESHEET_EXTENSIONS);

    let config = HeaderConfig::new(&license_text, &markup, &code, &stylesheet)?;
    Ok(config)
  }
}

fn extensions_or_default(given: &[String], default: &[&str]) -> Vec<String> {
  if given.is_empty() {
    default.iter().map(|ext| (*ext).to_string()).collect()
  } else {
    given.to_vec()
  }
}

/// Run the stamp command with the given arguments
pub fn run_stamp(args: StampArgs) -> Result<()> {
  init_tracing(args.quiet, args.verbose);

  if args.verbose > 0 {
    set_verbose();
  } else if args.quiet {
    set_quiet();
  }
  args.colors.apply();

  let header_config = args.header_config().context("Invalid header configuration")?;
  debug!(
    "Using {} markup, {} code, {} stylesheet extensions",
    header_config.extensions_for(Category::Markup).len(),
    header_config.extensions_for(Category::Code).len(),
    header_config.extensions_for(Category::Stylesheet).len()
  );

  let check_only = args.check;
  let roots = args.roots();

  let diff_manager = DiffManager::new(args.show_diff, args.save_diff.clone());
  diff_manager.init()?;

  let processor = Processor::new(ProcessorConfig {
    check_only,
    keep_going: args.keep_going,
    ignore_patterns: args.ignore.clone(),
    diff_manager: Some(diff_manager),
    ..ProcessorConfig::new(header_config)
  })?;

  print_start_message(&roots, check_only);

  let start_time = Instant::now();
  let reports = processor.process(&roots)?;
  let summary = ProcessingSummary::from_reports(&reports, start_time.elapsed());
  let categorized = CategorizedReports::from_reports(&reports);

  let base = std::env::current_dir().ok();
  let base = base.as_deref();

  print_file_statuses(&reports, base);
  print_blank_line();

  if check_only {
    print_missing_files(&categorized.missing, base);
  } else {
    print_added_files(&categorized.added, base);
  }
  print_failed_files(&categorized.failed, base);

  if categorized.added.is_empty() && !summary.has_issues() {
    print_all_files_ok();
  }

  print_blank_line();
  print_summary(&summary, check_only);

  if check_only && summary.headers_missing > 0 {
    print_blank_line();
    print_hint("Run without --check to add missing headers.");
  }

  write_report(ReportFormat::Json, args.report_json.as_ref(), &reports, &summary);
  write_report(ReportFormat::Csv, args.report_csv.as_ref(), &reports, &summary);

  if summary.has_issues() {
    process::exit(1);
  }

  Ok(())
}

fn write_report(format: ReportFormat, output_path: Option<&PathBuf>, reports: &[FileReport], summary: &ProcessingSummary) {
  let Some(output_path) = output_path else {
    return;
  };

  let report_generator = ReportGenerator::new(format, output_path);
  if let Err(e) = report_generator.generate(reports, summary) {
    eprintln!("Error generating {} report: {:#}", format, e);
  } else {
    info_log!("Generated {} report at {}", format, output_path.display());
  }
}
