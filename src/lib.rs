//! # zip2hash
//!
//! Extract password verification material from encrypted ZIP archives.
//!
//! Each archive yields at most one hash line for offline password recovery
//! tools. Nothing is decrypted; the salts, checksums, ciphertext samples and
//! offsets already present in the archive are copied into a `$zip2$` line
//! (WinZip AES) or a `$pkzip2$` line (traditional PKWARE encryption).
//!
//! ## Features
//!
//! - Single pass over local headers, no central directory needed
//! - Smallest AES entry selection
//! - Up to three legacy entries per line, preferring classified file types
//! - Large ciphertexts referenced by archive path and offset instead of inlined
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use zip2hash::{Config, process_archive};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     if let Some(line) = process_archive(Path::new("secret.zip"), &config)? {
//!         println!("{}", line);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod io;
pub mod logging;
pub mod zip;

use std::path::Path;

use anyhow::Result;

pub use cli::Cli;
pub use config::Config;
pub use io::{RecordReader, open_archive};
pub use zip::{ScanMode, scan_archive};

/// Open the archive at `path` and produce its hash line, if it has one.
///
/// The path is written into the line verbatim for external references, so
/// it should be the path the cracker will see.
pub fn process_archive(path: &Path, config: &Config) -> Result<Option<String>> {
    let reader = open_archive(path)?;
    scan_archive(reader, &path.to_string_lossy(), config)
}
