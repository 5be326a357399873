//! # headerstamp
//!
//! A tool that walks a source tree and makes sure every recognized source file
//! begins with the project's license header, written in the comment syntax of
//! the file's extension.
//!
//! Extensions fall into three categories, each with one comment style:
//!
//! * markup (`html` by default): `<!-- ... -->`
//! * code (`ts` by default): `// ` before every line
//! * stylesheet (`css` by default): `/* ... */`
//!
//! Files with any other extension are left alone. A file that already starts
//! with its exact header is never rewritten, so running the tool twice is the
//! same as running it once.
//!
//! ## Usage as a Library
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! use headerstamp::config::HeaderConfig;
//! use headerstamp::processor::{Processor, ProcessorConfig};
//! use headerstamp::report::FileAction;
//!
//! fn main() -> anyhow::Result<()> {
//!     let processor = Processor::new(ProcessorConfig::new(HeaderConfig::default()))?;
//!
//!     let reports = processor.process(&[PathBuf::from("src/app")])?;
//!
//!     let added = reports.iter().filter(|r| r.action == FileAction::Added).count();
//!     println!("Added {} headers", added);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`config`] - License text and extension categories
//! * [`header`] - Header formatting per comment style
//! * [`processor`] - Updating single files and walking directory trees
//! * [`report`] - Per-file outcomes and run summaries
//! * [`diff`] - Diffs of the changes check mode would make
//! * [`output`] - User-facing terminal output
//! * [`logging`] - Logging utilities for verbose output

pub mod config;
pub mod diff;
pub mod header;
pub mod logging;
pub mod output;
pub mod processor;
pub mod report;
