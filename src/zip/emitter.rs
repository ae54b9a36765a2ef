//! Hash line formatting.
//!
//! All numbers are lower-case hex without padding, binary data is hex
//! encoded and fields are separated by `*`.
//!
//! ```text
//! name:$zip2$*0*Mo*Ma*Sa*Va*Le*DF*Au*$/zip2$:::::name
//! name:$pkzip2$C*B*[1*MT*CT*LEN*CS*TC*DA*]...[DT*MT*CL*UL*CR*OF*OX*CT*DL*CS*TC*DA*]$/pkzip2$:::::path
//! ```

use std::fmt::Write;

use super::aes::{AesCandidate, Ciphertext};
use super::legacy::{ChecksumWidth, LegacyCandidate};
use super::magic::archive_basename;
use super::selector::CandidateSet;
use crate::config::Config;

/// Data type of a record carrying only a checksum-verification prefix.
const DATA_PARTIAL: u8 = 1;
/// Data type of a full record with the ciphertext inline.
const DATA_INLINE: u8 = 2;
/// Data type of a full record whose ciphertext stays in the archive.
const DATA_EXTERNAL: u8 = 3;

/// Format the `$zip2$` line for the smallest AES entry of an archive.
pub fn aes_line(candidate: &AesCandidate) -> String {
    let data = match &candidate.data {
        Ciphertext::Inline(bytes) => hex::encode(bytes),
        Ciphertext::External {
            archive_path,
            header_offset,
            data_offset,
        } => format!("ZFILE*{}*{:x}*{:x}", archive_path, header_offset, data_offset),
    };

    format!(
        "{name}:$zip2$*0*{mode:x}*{magic:x}*{salt}*{verifier}*{len:x}*{data}*{auth}*$/zip2$:::::{name}",
        name = candidate.archive_name,
        mode = candidate.strength.code(),
        magic = candidate.magic.0,
        salt = hex::encode(&candidate.salt),
        verifier = hex::encode(candidate.verifier),
        len = candidate.data_len,
        data = data,
        auth = hex::encode(candidate.auth_code),
    )
}

fn push_partial(line: &mut String, c: &LegacyCandidate) {
    let sample = c.checksum_sample();
    let _ = write!(
        line,
        "{}*{:x}*{:x}*{:x}*{}*{}*{}*",
        DATA_PARTIAL,
        c.magic.0,
        c.compression,
        sample.len(),
        hex::encode(c.chksum),
        hex::encode(c.chksum2),
        hex::encode(sample)
    );
}

fn push_full(line: &mut String, c: &LegacyCandidate, archive_path: &str, config: &Config) {
    // Inline only when the whole blob was kept, which any entry below the
    // threshold is.
    let inline = c.full_data().filter(|_| config.is_inline(c.compressed_len));

    let _ = write!(
        line,
        "{:x}*{:x}*{:x}*{:x}*{:x}*{:x}*{:x}*{:x}*",
        if inline.is_some() { DATA_INLINE } else { DATA_EXTERNAL },
        c.magic.0,
        c.compressed_len,
        c.decompressed_len,
        c.crc32,
        c.header_offset,
        c.data_offset_delta,
        c.compression
    );

    let (len, data) = match inline {
        Some(bytes) => (bytes.len(), hex::encode(bytes)),
        None => (archive_path.len(), archive_path.to_string()),
    };
    let _ = write!(
        line,
        "{:x}*{}*{}*{}*",
        len,
        hex::encode(c.chksum),
        hex::encode(c.chksum2),
        data
    );
}

/// Format the `$pkzip2$` line for the selected legacy entries.
///
/// Returns `None` when nothing was selected.
pub fn legacy_line(
    set: &CandidateSet,
    width: ChecksumWidth,
    archive_path: &str,
    config: &Config,
) -> Option<String> {
    let primary = set.primary()?;

    let mut line = String::new();
    let _ = write!(
        line,
        "{}:$pkzip2${:x}*{:x}*",
        archive_basename(archive_path),
        set.len(),
        width.bytes()
    );

    // The primary record replaces the partial record of the smallest entry
    let partial_from = if config.checksum_only { 0 } else { 1 };
    for c in set.iter().skip(partial_from) {
        push_partial(&mut line, c);
    }
    if !config.checksum_only {
        push_full(&mut line, primary, archive_path, config);
    }

    let _ = write!(line, "$/pkzip2$:::::{}", archive_path);
    Some(line)
}
