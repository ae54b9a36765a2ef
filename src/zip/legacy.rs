//! Traditional PKWARE encryption.
//!
//! Each encrypted entry starts with a 12-byte encryption header whose last
//! byte (or two bytes, for some writers) must equal a checksum taken either
//! from the entry's CRC or from its modification time. That check is all a
//! cracker needs for a first pass, so only a short prefix of every
//! ciphertext is kept; the smallest entry is additionally kept whole when it
//! fits inline, for a final inflate-and-CRC verification.

use std::io::{Read, Seek};

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::magic::{MagicType, classify};
use super::structures::{LocalFileHeader, extra_field_records};
use crate::config::Config;
use crate::io::RecordReader;

/// Encryption header preceding the compressed data
pub const ENCRYPTION_HEADER_LEN: u32 = 12;
/// Prefix kept for an unclassified entry's checksum sub-record
pub const SAMPLE_LEN: u32 = ENCRYPTION_HEADER_LEN + 24;
/// Prefix kept for a classified entry, long enough for its magic check
pub const MAGIC_SAMPLE_LEN: u32 = ENCRYPTION_HEADER_LEN + 180;

/// "Version needed to extract" values of writers we can handle (store or
/// implode/deflate).
const SUPPORTED_VERSIONS: [u16; 3] = [0x14, 0x0a, 0x314];

/// Extra field ids written by Info-ZIP style archivers, whose encryption
/// header carries a 2-byte check.
const TWO_BYTE_CHECK_EXTRA_IDS: [u16; 8] = [
    0x07c8, // Info-ZIP Macintosh (old)
    0x334d, // Info-ZIP Macintosh (Mac3)
    0x4d49, // Info-ZIP OpenVMS
    0x5855, // Info-ZIP UNIX (original)
    0x6375, // Info-ZIP UTF-8 comment
    0x7075, // Info-ZIP UTF-8 name
    0x7855, // Info-ZIP UNIX (16-bit UID/GID)
    0x7875, // Info-ZIP UNIX 3rd generation
];

/// Number of valid checksum bytes in every encryption header of an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChecksumWidth {
    #[default]
    One,
    Two,
}

impl ChecksumWidth {
    pub fn bytes(&self) -> u8 {
        match self {
            ChecksumWidth::One => 1,
            ChecksumWidth::Two => 2,
        }
    }
}

/// One legacy-encrypted entry selected as hash material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyCandidate {
    pub magic: MagicType,
    pub compression: u16,
    pub crc32: u32,
    pub compressed_len: u32,
    pub decompressed_len: u32,
    /// Offset of the entry's local header
    pub header_offset: u64,
    /// Distance from the local header to the encryption header
    pub data_offset_delta: u32,
    /// High bytes of the CRC
    pub chksum: [u8; 2],
    /// Bytes of the modification time
    pub chksum2: [u8; 2],
    /// Leading ciphertext bytes, at most the whole entry
    pub sample: Vec<u8>,
}

impl LegacyCandidate {
    /// Prefix written in a checksum sub-record.
    pub fn checksum_sample(&self) -> &[u8] {
        let len = if self.magic.is_classified() {
            MAGIC_SAMPLE_LEN
        } else {
            SAMPLE_LEN
        };
        &self.sample[..(len as usize).min(self.sample.len())]
    }

    /// The complete ciphertext, if it was kept.
    pub fn full_data(&self) -> Option<&[u8]> {
        (self.sample.len() == self.compressed_len as usize).then_some(self.sample.as_slice())
    }
}

/// Number of ciphertext bytes worth keeping for an entry of `compressed_len`.
fn kept_len(compressed_len: u32, config: &Config) -> u32 {
    compressed_len.min(config.inline_threshold.max(MAGIC_SAMPLE_LEN))
}

/// Read a legacy entry whose local header has just been parsed.
///
/// Returns `None` for entries that cannot serve as hash material; those are
/// skipped without reading their data. `width` is the archive-wide checksum
/// width and may be widened by this entry's extra field.
pub fn read_entry<R: Read + Seek>(
    reader: &mut RecordReader<R>,
    header: &LocalFileHeader,
    width: &mut ChecksumWidth,
    archive_path: &str,
    config: &Config,
) -> Result<Option<LegacyCandidate>> {
    let magic = classify(&header.file_name, config);
    let wanted = config
        .only_file
        .as_ref()
        .is_none_or(|only| *only == header.file_name);

    debug!("{}: ver {:x}", header.file_name, header.version);

    if !(wanted && SUPPORTED_VERSIONS.contains(&header.version) && header.is_encrypted()) {
        info!(
            "{}->{} is not encrypted, or stored with non-handled compression type",
            archive_path, header.file_name
        );
        reader.skip(header.compressed_size as u64)?;
        return Ok(None);
    }

    let mut timestamp_check = false;
    if header.has_data_descriptor() {
        for (id, _) in extra_field_records(&header.extra_field) {
            debug!("efh {:04x}", id);
            if TWO_BYTE_CHECK_EXTRA_IDS.contains(&id) {
                *width = ChecksumWidth::Two;
                timestamp_check = true;
            }
        }
    }
    if config.force_two_byte_checksum {
        *width = ChecksumWidth::Two;
    }

    debug!(
        "{}->{} PKZIP Encr:{}{} cmplen={}, decmplen={}, crc={:X}",
        archive_path,
        header.file_name,
        if *width == ChecksumWidth::Two { " 2b chk," } else { "" },
        if timestamp_check { " TS_chk," } else { "" },
        header.compressed_size,
        header.uncompressed_size,
        header.crc32
    );

    let keep = kept_len(header.compressed_size, config);
    let sample = reader
        .read_bytes(keep as usize)
        .with_context(|| format!("{}: truncated encrypted data", header.file_name))?;
    reader
        .skip_exact((header.compressed_size - keep) as u64)
        .with_context(|| format!("{}: truncated encrypted data", header.file_name))?;

    if header.uncompressed_size <= 3 {
        debug!(
            "{}: {} byte file is too short to verify a password",
            header.file_name, header.uncompressed_size
        );
        return Ok(None);
    }

    let crc = header.crc32.to_be_bytes();
    let time = header.last_mod_time.to_be_bytes();

    Ok(Some(LegacyCandidate {
        magic,
        compression: header.compression_method.as_u16(),
        crc32: header.crc32,
        compressed_len: header.compressed_size,
        decompressed_len: header.uncompressed_size,
        header_offset: header.offset,
        data_offset_delta: header.data_offset_delta(),
        chksum: [crc[0], crc[1]],
        chksum2: time,
        sample,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(compressed_len: u32, magic: MagicType) -> LegacyCandidate {
        LegacyCandidate {
            magic,
            compression: 0,
            crc32: 0,
            compressed_len,
            decompressed_len: compressed_len,
            header_offset: 0,
            data_offset_delta: 0,
            chksum: [0; 2],
            chksum2: [0; 2],
            sample: vec![0xab; kept_len(compressed_len, &Config::default()) as usize],
        }
    }

    #[test]
    fn test_checksum_sample_lengths() {
        assert_eq!(candidate(500, MagicType::NONE).checksum_sample().len(), 36);
        assert_eq!(candidate(500, MagicType::PDF).checksum_sample().len(), 192);
        assert_eq!(candidate(20, MagicType::PDF).checksum_sample().len(), 20);
    }

    #[test]
    fn test_full_data_only_when_kept_whole() {
        assert!(candidate(150, MagicType::NONE).full_data().is_some());
        assert!(candidate(500, MagicType::NONE).full_data().is_none());
    }

    #[test]
    fn test_kept_len_follows_threshold() {
        let config = Config {
            inline_threshold: 1000,
            ..Config::default()
        };
        assert_eq!(kept_len(800, &config), 800);
        assert_eq!(kept_len(5000, &config), 1000);
        assert_eq!(kept_len(5000, &Config::default()), MAGIC_SAMPLE_LEN);
    }
}
