//! # headerstamp
//!
//! A tool that makes sure source files start with the project's license
//! header.

mod cli;

use anyhow::Result;

use crate::cli::{Cli, run_stamp};

fn main() -> Result<()> {
  let cli = Cli::parse_args();

  run_stamp(cli.stamp_args)
}
