//! Sequential walk over the local records of one archive.
//!
//! The central directory is never consulted: records are visited in file
//! order by their signatures until the first central directory or end of
//! central directory record. An archive is scanned in one of two modes:
//!
//! - [`ScanMode::Aes`], the starting mode, keeps the smallest AES entry;
//! - [`ScanMode::Legacy`] collects traditionally encrypted entries.
//!
//! The two framings cannot be mixed in one hash line, so the first
//! encrypted entry that is not AES switches the archive to legacy mode and
//! the scan restarts from offset 0. The switch happens at most once and
//! before anything has been emitted.

use std::io::{Read, Seek};

use anyhow::Result;
use tracing::{debug, info, trace};

use super::aes::{self, BestAes};
use super::emitter;
use super::legacy::{self, ChecksumWidth};
use super::selector::CandidateSet;
use super::structures::*;
use crate::config::Config;
use crate::io::RecordReader;

/// Which kind of encrypted entry the scan is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    Aes,
    Legacy,
}

/// Outcome of the AES pass.
enum AesPass {
    Finished(Option<aes::AesCandidate>),
    SwitchToLegacy,
}

/// Scanner state for a single archive.
pub struct ArchiveScanner<'a, R> {
    reader: RecordReader<R>,
    archive_path: &'a str,
    config: &'a Config,
    mode: ScanMode,
}

impl<'a, R: Read + Seek> ArchiveScanner<'a, R> {
    pub fn new(reader: RecordReader<R>, archive_path: &'a str, config: &'a Config) -> Self {
        Self {
            reader,
            archive_path,
            config,
            mode: ScanMode::Aes,
        }
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    /// Scan the archive and produce its hash line, if it has one.
    ///
    /// An error means the archive is malformed; nothing should be emitted
    /// for it.
    pub fn run(&mut self) -> Result<Option<String>> {
        match self.aes_pass()? {
            AesPass::Finished(best) => Ok(best.as_ref().map(emitter::aes_line)),
            AesPass::SwitchToLegacy => {
                self.mode = ScanMode::Legacy;
                self.reader.rewind()?;
                let (set, width) = self.legacy_pass()?;
                Ok(emitter::legacy_line(&set, width, self.archive_path, self.config))
            }
        }
    }

    /// Advance to the next local file header.
    ///
    /// Data descriptors are skipped and unknown signatures stepped over.
    /// Returns `None` at the central directory or the end of the stream.
    fn next_entry(&mut self) -> Result<Option<LocalFileHeader>> {
        loop {
            let offset = self.reader.position();
            let Some(signature) = self.reader.read_signature()? else {
                return Ok(None);
            };

            match signature {
                LFH_SIGNATURE => return LocalFileHeader::read(&mut self.reader, offset).map(Some),
                DATA_DESCRIPTOR_SIGNATURE => self.reader.skip(DATA_DESCRIPTOR_SIZE)?,
                CDFH_SIGNATURE | EOCD_SIGNATURE => {
                    trace!(offset, "central directory reached");
                    return Ok(None);
                }
                other => trace!(offset, "skipping unknown signature {:#010x}", other),
            }
        }
    }

    fn aes_pass(&mut self) -> Result<AesPass> {
        let mut best = BestAes::default();

        while let Some(header) = self.next_entry()? {
            if header.compression_method == CompressionMethod::Aes {
                let candidate =
                    aes::read_entry(&mut self.reader, &header, self.archive_path, self.config)?;
                best.offer(candidate);
            } else if header.is_encrypted() {
                debug!(
                    "{}->{} uses traditional PKWARE encryption",
                    self.archive_path, header.file_name
                );
                return Ok(AesPass::SwitchToLegacy);
            } else {
                info!("{}->{} is not encrypted!", self.archive_path, header.file_name);
                self.reader.skip(header.compressed_size as u64)?;
            }
        }

        Ok(AesPass::Finished(best.into_inner()))
    }

    fn legacy_pass(&mut self) -> Result<(CandidateSet, ChecksumWidth)> {
        let mut set = CandidateSet::new();
        let mut width = ChecksumWidth::default();

        while let Some(header) = self.next_entry()? {
            if let Some(candidate) = legacy::read_entry(
                &mut self.reader,
                &header,
                &mut width,
                self.archive_path,
                self.config,
            )? {
                set = set.admit(candidate);
            }
        }

        Ok((set, width))
    }
}

/// Scan one archive from `reader`, see [`ArchiveScanner::run`].
pub fn scan_archive<R: Read + Seek>(
    reader: RecordReader<R>,
    archive_path: &str,
    config: &Config,
) -> Result<Option<String>> {
    ArchiveScanner::new(reader, archive_path, config).run()
}
