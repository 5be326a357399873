mod common;

use std::fs;
use std::sync::Arc;

use anyhow::Result;
use common::{CODE_HEADER, MARKUP_HEADER, STYLESHEET_HEADER, create_sample_app, read_file, write_file};
use headerstamp::config::{Category, HeaderConfig};
use headerstamp::diff::DiffManager;
use headerstamp::header::HeaderFormatter;
use headerstamp::processor::{FileProcessor, HeaderUpdate, Processor, ProcessorConfig};
use headerstamp::report::{FileAction, ProcessingSummary};
use tempfile::tempdir;

fn default_processor(check_only: bool) -> Result<Processor> {
  Processor::new(ProcessorConfig {
    check_only,
    ..ProcessorConfig::new(HeaderConfig::default())
  })
}

#[test]
fn test_adds_default_headers_to_every_category() -> Result<()> {
  let temp_dir = tempdir()?;
  let app = create_sample_app(temp_dir.path())?;

  let reports = default_processor(false)?.process(&[app])?;

  assert_eq!(
    read_file(temp_dir.path(), "src/app/app.component.ts")?,
    format!("{}export class AppComponent {{}}\n", CODE_HEADER)
  );
  assert_eq!(
    read_file(temp_dir.path(), "src/app/app.component.html")?,
    format!("{}<h1>Hello</h1>\n", MARKUP_HEADER)
  );
  assert_eq!(
    read_file(temp_dir.path(), "src/app/app.component.css")?,
    format!("{}h1 {{ color: red; }}\n", STYLESHEET_HEADER)
  );
  assert_eq!(
    read_file(temp_dir.path(), "src/app/shared/util.ts")?,
    format!("{}export const x = 1;\n", CODE_HEADER)
  );
  assert_eq!(read_file(temp_dir.path(), "src/app/README.md")?, "# App\n");

  let summary = ProcessingSummary::from_reports(&reports, std::time::Duration::ZERO);
  assert_eq!(summary.total_files, 5);
  assert_eq!(summary.headers_added, 4);
  assert_eq!(summary.files_skipped, 1);
  assert!(!summary.has_issues());

  Ok(())
}

#[test]
fn test_second_run_changes_nothing() -> Result<()> {
  let temp_dir = tempdir()?;
  let app = create_sample_app(temp_dir.path())?;
  let processor = default_processor(false)?;

  processor.process(std::slice::from_ref(&app))?;
  let after_first = read_file(temp_dir.path(), "src/app/app.component.html")?;

  let reports = processor.process(&[app])?;
  let after_second = read_file(temp_dir.path(), "src/app/app.component.html")?;

  assert_eq!(after_first, after_second);
  assert!(
    reports
      .iter()
      .all(|r| matches!(r.action, FileAction::Present | FileAction::Skipped))
  );

  Ok(())
}

#[test]
fn test_empty_file_gets_only_the_header() -> Result<()> {
  let temp_dir = tempdir()?;
  write_file(temp_dir.path(), "empty.css", "")?;

  default_processor(false)?.process(&[temp_dir.path().to_path_buf()])?;

  assert_eq!(read_file(temp_dir.path(), "empty.css")?, STYLESHEET_HEADER);

  Ok(())
}

#[test]
fn test_header_with_one_extra_space_is_prefixed_again() -> Result<()> {
  let temp_dir = tempdir()?;
  let almost = CODE_HEADER.replacen("// Copyright", "//  Copyright", 1);
  write_file(temp_dir.path(), "a.ts", &almost)?;

  let reports = default_processor(false)?.process(&[temp_dir.path().to_path_buf()])?;

  assert_eq!(reports[0].action, FileAction::Added);
  assert_eq!(read_file(temp_dir.path(), "a.ts")?, format!("{}{}", CODE_HEADER, almost));

  Ok(())
}

#[test]
fn test_unrecognized_files_are_byte_identical() -> Result<()> {
  let temp_dir = tempdir()?;
  let bytes: &[u8] = &[0xff, 0xfe, 0x00, b'x'];
  fs::write(temp_dir.path().join("blob.bin"), bytes)?;
  write_file(temp_dir.path(), "Makefile", "all:\n")?;
  write_file(temp_dir.path(), "archive.tar.gz", "gz")?;
  write_file(temp_dir.path(), "trailing.", "dot")?;

  let reports = default_processor(false)?.process(&[temp_dir.path().to_path_buf()])?;

  assert_eq!(fs::read(temp_dir.path().join("blob.bin"))?, bytes);
  assert_eq!(read_file(temp_dir.path(), "Makefile")?, "all:\n");
  assert_eq!(read_file(temp_dir.path(), "archive.tar.gz")?, "gz");
  assert_eq!(read_file(temp_dir.path(), "trailing.")?, "dot");
  assert!(reports.iter().all(|r| r.action == FileAction::Skipped));

  Ok(())
}

#[test]
fn test_non_utf8_body_is_preserved() -> Result<()> {
  let temp_dir = tempdir()?;
  let path = temp_dir.path().join("latin1.ts");
  let body: &[u8] = b"const s = '\xe9t\xe9';\n";
  fs::write(&path, body)?;

  default_processor(false)?.process(&[temp_dir.path().to_path_buf()])?;

  let mut expected = CODE_HEADER.as_bytes().to_vec();
  expected.extend_from_slice(body);
  assert_eq!(fs::read(&path)?, expected);

  Ok(())
}

#[test]
fn test_extension_matching_ignores_case() -> Result<()> {
  let temp_dir = tempdir()?;
  write_file(temp_dir.path(), "INDEX.HTML", "<p></p>")?;

  default_processor(false)?.process(&[temp_dir.path().to_path_buf()])?;

  assert_eq!(read_file(temp_dir.path(), "INDEX.HTML")?, format!("{}<p></p>", MARKUP_HEADER));

  Ok(())
}

#[test]
fn test_check_mode_reports_without_writing() -> Result<()> {
  let temp_dir = tempdir()?;
  let app = create_sample_app(temp_dir.path())?;

  let reports = default_processor(true)?.process(&[app])?;

  assert_eq!(
    read_file(temp_dir.path(), "src/app/app.component.ts")?,
    "export class AppComponent {}\n"
  );
  let summary = ProcessingSummary::from_reports(&reports, std::time::Duration::ZERO);
  assert_eq!(summary.headers_missing, 4);
  assert_eq!(summary.headers_added, 0);
  assert!(summary.has_issues());

  Ok(())
}

#[test]
fn test_check_mode_saves_diff() -> Result<()> {
  let temp_dir = tempdir()?;
  write_file(temp_dir.path(), "src/style.css", "body {}\n")?;
  let diff_path = temp_dir.path().join("changes.diff");

  let diff_manager = DiffManager::new(false, Some(diff_path.clone()));
  diff_manager.init()?;
  let processor = Processor::new(ProcessorConfig {
    check_only: true,
    diff_manager: Some(diff_manager),
    ..ProcessorConfig::new(HeaderConfig::default())
  })?;

  processor.process(&[temp_dir.path().join("src")])?;

  let diff = fs::read_to_string(&diff_path)?;
  assert!(diff.contains("Diff for"));
  assert!(diff.contains("+/*\n"));
  assert!(diff.contains("+Copyright 2020 Google LLC\n"));
  assert!(diff.contains(" body {}\n"));
  assert_eq!(read_file(temp_dir.path(), "src/style.css")?, "body {}\n");

  Ok(())
}

#[test]
fn test_ignore_patterns_skip_matching_paths() -> Result<()> {
  let temp_dir = tempdir()?;
  write_file(temp_dir.path(), "app/main.ts", "main();\n")?;
  write_file(temp_dir.path(), "app/generated/api.ts", "api();\n")?;
  write_file(temp_dir.path(), "app/main.spec.ts", "it();\n")?;

  let processor = Processor::new(ProcessorConfig {
    ignore_patterns: vec!["generated/".to_string(), "*.spec.ts".to_string()],
    ..ProcessorConfig::new(HeaderConfig::default())
  })?;
  let reports = processor.process(&[temp_dir.path().join("app")])?;

  assert_eq!(reports.len(), 1);
  assert_eq!(reports[0].path, temp_dir.path().join("app/main.ts"));
  assert_eq!(read_file(temp_dir.path(), "app/generated/api.ts")?, "api();\n");
  assert_eq!(read_file(temp_dir.path(), "app/main.spec.ts")?, "it();\n");

  Ok(())
}

#[test]
fn test_custom_categories() -> Result<()> {
  let temp_dir = tempdir()?;
  write_file(temp_dir.path(), "a.js", "a();")?;
  write_file(temp_dir.path(), "b.vue", "<template/>")?;
  write_file(temp_dir.path(), "c.ts", "c();")?;

  let config = HeaderConfig::new("Copyright Acme", &["vue"], &["js"], &["scss"])?;
  let processor = Processor::new(ProcessorConfig::new(config))?;
  let reports = processor.process(&[temp_dir.path().to_path_buf()])?;

  assert_eq!(read_file(temp_dir.path(), "a.js")?, "// Copyright Acme\n\na();");
  assert_eq!(
    read_file(temp_dir.path(), "b.vue")?,
    "<!--\nCopyright Acme\n-->\n\n<template/>"
  );
  assert_eq!(read_file(temp_dir.path(), "c.ts")?, "c();");

  let categories: Vec<Option<Category>> = reports.iter().map(|r| r.category).collect();
  assert_eq!(categories, vec![Some(Category::Code), Some(Category::Markup), None]);

  Ok(())
}

#[test]
fn test_single_file_root() -> Result<()> {
  let temp_dir = tempdir()?;
  let path = write_file(temp_dir.path(), "only.ts", "x;")?;

  let reports = default_processor(false)?.process(std::slice::from_ref(&path))?;

  assert_eq!(reports.len(), 1);
  assert_eq!(reports[0].path, path);
  assert_eq!(read_file(temp_dir.path(), "only.ts")?, format!("{}x;", CODE_HEADER));

  Ok(())
}

#[test]
fn test_same_root_spelled_differently_visits_once() -> Result<()> {
  let temp_dir = tempdir()?;
  write_file(temp_dir.path(), "app/a.ts", "a;")?;
  let app = temp_dir.path().join("app");
  let detour = temp_dir.path().join("app/../app");

  let reports = default_processor(true)?.process(&[app.clone(), detour])?;

  assert_eq!(reports.len(), 1);
  assert_eq!(reports[0].path, app.join("a.ts"));
  assert_eq!(reports[0].action, FileAction::WouldAdd);

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_non_utf8_file_name_gets_header() -> Result<()> {
  use std::ffi::OsStr;
  use std::os::unix::ffi::OsStrExt;

  let temp_dir = tempdir()?;
  let path = temp_dir.path().join(OsStr::from_bytes(b"caf\xe9.ts"));
  if fs::write(&path, "x;").is_err() {
    // The filesystem only accepts UTF-8 names
    return Ok(());
  }

  let reports = default_processor(false)?.process(&[temp_dir.path().to_path_buf()])?;

  assert_eq!(reports[0].action, FileAction::Added);
  assert_eq!(reports[0].category, Some(Category::Code));
  assert_eq!(fs::read_to_string(&path)?, format!("{}x;", CODE_HEADER));

  Ok(())
}

#[test]
fn test_missing_root_is_an_error() -> Result<()> {
  let temp_dir = tempdir()?;

  let result = default_processor(false)?.process(&[temp_dir.path().join("src/app")]);

  let error = result.expect_err("missing root should fail");
  assert!(format!("{:#}", error).contains("Root path does not exist"));

  Ok(())
}

#[test]
fn test_file_processor_reuses_shared_formatter() -> Result<()> {
  let temp_dir = tempdir()?;
  let path = write_file(temp_dir.path(), "x.css", "a {}")?;
  let config = Arc::new(HeaderConfig::default());

  let checker = FileProcessor::new(HeaderFormatter::new(Arc::clone(&config))).check_only(true);
  let writer = FileProcessor::new(HeaderFormatter::new(config));

  assert_eq!(checker.update_header(&path)?, HeaderUpdate::WouldAdd);
  assert_eq!(writer.update_header(&path)?, HeaderUpdate::Added);
  assert_eq!(checker.update_header(&path)?, HeaderUpdate::AlreadyPresent);

  Ok(())
}

#[cfg(unix)]
mod unreadable {
  use std::os::unix::fs::PermissionsExt;

  use super::*;

  /// Makes `path` unreadable; returns false when the current user can read it
  /// anyway (e.g. root).
  fn make_unreadable(path: &std::path::Path) -> Result<bool> {
    fs::set_permissions(path, fs::Permissions::from_mode(0o000))?;
    Ok(fs::read(path).is_err())
  }

  #[test]
  fn test_fail_fast_stops_on_unreadable_file() -> Result<()> {
    let temp_dir = tempdir()?;
    let locked = write_file(temp_dir.path(), "a.ts", "a;")?;
    write_file(temp_dir.path(), "b.ts", "b;")?;
    if !make_unreadable(&locked)? {
      return Ok(());
    }

    let result = default_processor(false)?.process(&[temp_dir.path().to_path_buf()]);

    assert!(result.is_err());
    // Files are visited in name order, so b.ts was never reached
    assert_eq!(read_file(temp_dir.path(), "b.ts")?, "b;");

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644))?;
    Ok(())
  }

  #[test]
  fn test_keep_going_records_failures() -> Result<()> {
    let temp_dir = tempdir()?;
    let locked = write_file(temp_dir.path(), "a.ts", "a;")?;
    write_file(temp_dir.path(), "b.ts", "b;")?;
    if !make_unreadable(&locked)? {
      return Ok(());
    }

    let processor = Processor::new(ProcessorConfig {
      keep_going: true,
      ..ProcessorConfig::new(HeaderConfig::default())
    })?;
    let reports = processor.process(&[temp_dir.path().to_path_buf()])?;

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].action, FileAction::Failed);
    assert!(reports[0].error.is_some());
    assert_eq!(reports[1].action, FileAction::Added);
    assert_eq!(read_file(temp_dir.path(), "b.ts")?, format!("{}b;", CODE_HEADER));

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644))?;
    Ok(())
  }
}
