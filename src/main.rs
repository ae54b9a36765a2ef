//! Main entry point for the zip2hash CLI application.
//!
//! Every archive named on the command line is processed independently;
//! hash lines are written to stdout and a broken archive only produces a
//! diagnostic on stderr.

use anyhow::Result;
use clap::Parser;
use std::io::Write;
use std::path::Path;
use tracing::error;

use zip2hash::{Cli, logging, process_archive};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_level());

    let config = cli.config()?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for file in &cli.files {
        match process_archive(Path::new(file), &config) {
            Ok(Some(line)) => writeln!(out, "{}", line)?,
            Ok(None) => {}
            // One bad archive must not stop the others
            Err(e) => error!("! {}: {:#}", file, e),
        }
    }

    out.flush()?;
    Ok(())
}
