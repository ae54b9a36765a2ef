//! Encrypted ZIP entry extraction.
//!
//! ## Architecture
//!
//! - [`structures`]: ZIP signatures, the local file header and the AES extra field
//! - [`magic`]: classification of member names
//! - [`scanner`]: sequential record walk, one archive at a time
//! - [`aes`] / [`legacy`]: per-entry extraction for each encryption scheme
//! - [`selector`]: choice of legacy entries for one hash line
//! - [`emitter`]: `$zip2$` and `$pkzip2$` line formatting
//!
//! ## Supported Features
//!
//! - WinZip AES (AE-1 and AE-2), 128/192/256 bit
//! - Traditional PKWARE encryption with 1 or 2 byte checks
//!
//! ## Limitations
//!
//! - No ZIP64 sizes; local headers are read as written
//! - Entries whose sizes only appear in a data descriptor are not handled

pub mod aes;
pub mod emitter;
pub mod legacy;
pub mod magic;
pub mod scanner;
pub mod selector;
pub mod structures;

pub use magic::{MagicType, classify};
pub use scanner::{ArchiveScanner, ScanMode, scan_archive};
pub use structures::*;
