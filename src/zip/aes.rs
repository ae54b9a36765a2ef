//! WinZip AES entries.
//!
//! Data layout of an AES entry (compressed size covers all of it):
//!
//! ```text
//! salt (8/12/16) | verifier (2) | ciphertext | authentication code (10)
//! ```

use std::io::{Read, Seek};

use anyhow::{Context, Result, bail};
use tracing::debug;

use super::magic::{MagicType, archive_basename};
use super::structures::{
    AES_AUTH_CODE_LEN, AES_VERIFIER_LEN, AesExtraField, AesStrength, LocalFileHeader,
};
use crate::config::Config;
use crate::io::RecordReader;

/// Ciphertext of a hash record: embedded bytes or a pointer into the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ciphertext {
    Inline(Vec<u8>),
    External {
        archive_path: String,
        header_offset: u64,
        data_offset: u64,
    },
}

/// Everything needed to write one `$zip2$` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AesCandidate {
    pub strength: AesStrength,
    /// Reserved, always [`MagicType::NONE`]
    pub magic: MagicType,
    pub salt: Vec<u8>,
    pub verifier: [u8; AES_VERIFIER_LEN],
    /// Compressed size from the local header, used for ranking
    pub compressed_size: u32,
    /// Ciphertext length as written to the hash line
    pub data_len: u32,
    pub data: Ciphertext,
    pub auth_code: [u8; AES_AUTH_CODE_LEN],
    pub archive_name: String,
}

/// Ciphertext length for an AES entry.
///
/// The trailing `+ 1` is kept for compatibility with existing hash
/// consumers. Together with the usual 11-byte extra field it cancels out to
/// the 10-byte authentication code.
pub fn ciphertext_len(compressed_size: u32, salt_len: usize, extra_field_len: u32) -> Result<u32> {
    let len = compressed_size as i64 - AES_VERIFIER_LEN as i64 - salt_len as i64
        - extra_field_len as i64
        + 1;
    if len < 0 || len > u32::MAX as i64 {
        bail!(
            "AES entry too short: compressed size {} with {} bytes of salt",
            compressed_size,
            salt_len
        );
    }
    Ok(len as u32)
}

/// Read an AES entry whose local header has just been parsed.
///
/// Leaves the reader after the authentication code.
pub fn read_entry<R: Read + Seek>(
    reader: &mut RecordReader<R>,
    header: &LocalFileHeader,
    archive_path: &str,
    config: &Config,
) -> Result<AesCandidate> {
    let aes = AesExtraField::find(&header.extra_field)
        .with_context(|| format!("{}: bad AES extra field", header.file_name))?;

    debug!(
        "{}->{} is using AES encryption, extrafield_length is {}",
        archive_path,
        header.file_name,
        header.extra_field.len()
    );

    let salt_len = aes.strength.salt_len();
    let salt = reader.read_bytes(salt_len).context("truncated AES salt")?;
    let mut verifier = [0u8; AES_VERIFIER_LEN];
    verifier.copy_from_slice(
        &reader
            .read_bytes(AES_VERIFIER_LEN)
            .context("truncated AES password verifier")?,
    );

    let data_len = ciphertext_len(header.compressed_size, salt_len, header.extra_field_len())?;
    let data = if config.is_inline(data_len) {
        Ciphertext::Inline(
            reader
                .read_bytes(data_len as usize)
                .context("truncated AES ciphertext")?,
        )
    } else {
        let data_offset = reader.position();
        reader.skip_exact(data_len as u64)?;
        Ciphertext::External {
            archive_path: archive_path.to_string(),
            header_offset: header.offset,
            data_offset,
        }
    };

    let mut auth_code = [0u8; AES_AUTH_CODE_LEN];
    auth_code.copy_from_slice(
        &reader
            .read_bytes(AES_AUTH_CODE_LEN)
            .context("truncated AES authentication code")?,
    );

    Ok(AesCandidate {
        strength: aes.strength,
        magic: MagicType::NONE,
        salt,
        verifier,
        compressed_size: header.compressed_size,
        data_len,
        data,
        auth_code,
        archive_name: archive_basename(archive_path),
    })
}

/// The smallest AES entry seen so far in one archive.
#[derive(Debug, Default)]
pub struct BestAes {
    best: Option<AesCandidate>,
}

impl BestAes {
    /// Keep `candidate` if it is strictly smaller than the current one.
    ///
    /// Returns whether it was kept; a replaced candidate is dropped.
    pub fn offer(&mut self, candidate: AesCandidate) -> bool {
        match &self.best {
            Some(best) if best.compressed_size <= candidate.compressed_size => {
                debug!(
                    size = candidate.compressed_size,
                    best = best.compressed_size,
                    "AES entry not used, it is not the smallest"
                );
                false
            }
            _ => {
                self.best = Some(candidate);
                true
            }
        }
    }

    pub fn get(&self) -> Option<&AesCandidate> {
        self.best.as_ref()
    }

    pub fn into_inner(self) -> Option<AesCandidate> {
        self.best
    }
}
