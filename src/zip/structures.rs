use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read, Seek};

use anyhow::{Context, Result, bail};

use crate::io::RecordReader;

/// Local File Header (LFH) signature, `PK\x03\x04`
pub const LFH_SIGNATURE: u32 = 0x04034b50;
/// Data descriptor signature, `PK\x07\x08`
pub const DATA_DESCRIPTOR_SIGNATURE: u32 = 0x08074b50;
/// Central Directory File Header signature, `PK\x01\x02`
pub const CDFH_SIGNATURE: u32 = 0x02014b50;
/// End of Central Directory signature, `PK\x05\x06`
pub const EOCD_SIGNATURE: u32 = 0x06054b50;

/// Fixed part of the LFH, including its signature
pub const LFH_SIZE: u32 = 30;
/// Bytes following a data descriptor signature (CRC, sizes)
pub const DATA_DESCRIPTOR_SIZE: u64 = 12;
/// Longest file name accepted before the archive is considered corrupt
pub const MAX_FILE_NAME_LEN: u16 = 250;

/// General purpose flag: entry is encrypted
pub const FLAG_ENCRYPTED: u16 = 0x0001;
/// General purpose flag: sizes follow in a data descriptor
pub const FLAG_DATA_DESCRIPTOR: u16 = 0x0008;

/// Extra field header id of the WinZip AES record
pub const AES_EXTRA_FIELD_ID: u16 = 0x9901;
/// Vendor id stored in the AES record, `AE`
pub const AES_VENDOR_ID: u16 = 0x4541;
/// Length of the HMAC-SHA1 authentication code trailing AES data
pub const AES_AUTH_CODE_LEN: usize = 10;
/// Length of the AES password verification value
pub const AES_VERIFIER_LEN: usize = 2;

/// ZIP compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Stored,
    Deflate,
    /// WinZip AES marker; the real method lives in the extra field
    Aes,
    Unknown(u16),
}

impl CompressionMethod {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflate,
            99 => CompressionMethod::Aes,
            _ => CompressionMethod::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflate => 8,
            CompressionMethod::Aes => 99,
            CompressionMethod::Unknown(v) => *v,
        }
    }
}

/// Parsed Local File Header together with its variable-length fields
#[derive(Debug, Clone)]
pub struct LocalFileHeader {
    /// Offset of the `PK\x03\x04` signature from the archive start
    pub offset: u64,
    pub version: u16,
    pub flags: u16,
    pub compression_method: CompressionMethod,
    pub last_mod_time: u16,
    pub last_mod_date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub file_name: String,
    /// Raw length of the name as stored, before any lossy decoding
    pub file_name_len: u16,
    pub extra_field: Vec<u8>,
}

impl LocalFileHeader {
    /// Read the header that follows an already consumed LFH signature.
    ///
    /// `offset` is where that signature started. On return the reader is
    /// positioned at the first byte of the entry's data.
    pub fn read<R: Read + Seek>(reader: &mut RecordReader<R>, offset: u64) -> Result<Self> {
        let fixed = reader
            .read_bytes(LFH_SIZE as usize - 4)
            .context("truncated local file header")?;
        let mut cursor = Cursor::new(&fixed);

        let version = cursor.read_u16::<LittleEndian>()?;
        let flags = cursor.read_u16::<LittleEndian>()?;
        let compression_method = cursor.read_u16::<LittleEndian>()?;
        let last_mod_time = cursor.read_u16::<LittleEndian>()?;
        let last_mod_date = cursor.read_u16::<LittleEndian>()?;
        let crc32 = cursor.read_u32::<LittleEndian>()?;
        let compressed_size = cursor.read_u32::<LittleEndian>()?;
        let uncompressed_size = cursor.read_u32::<LittleEndian>()?;
        let file_name_length = cursor.read_u16::<LittleEndian>()?;
        let extra_field_length = cursor.read_u16::<LittleEndian>()?;

        if file_name_length > MAX_FILE_NAME_LEN {
            bail!("Invalid zip file, filename length too long!");
        }

        let file_name_bytes = reader
            .read_bytes(file_name_length as usize)
            .context("truncated file name")?;
        // Use lossy conversion to handle non-UTF8 filenames gracefully
        let file_name = String::from_utf8_lossy(&file_name_bytes).to_string();

        let extra_field = reader
            .read_bytes(extra_field_length as usize)
            .context("truncated extra field")?;

        Ok(Self {
            offset,
            version,
            flags,
            compression_method: CompressionMethod::from_u16(compression_method),
            last_mod_time,
            last_mod_date,
            crc32,
            compressed_size,
            uncompressed_size,
            file_name,
            file_name_len: file_name_length,
            extra_field,
        })
    }

    pub fn is_encrypted(&self) -> bool {
        self.flags & FLAG_ENCRYPTED != 0
    }

    pub fn has_data_descriptor(&self) -> bool {
        self.flags & FLAG_DATA_DESCRIPTOR != 0
    }

    /// Distance from the signature to the first data byte.
    pub fn data_offset_delta(&self) -> u32 {
        LFH_SIZE + self.file_name_len as u32 + self.extra_field.len() as u32
    }

    /// Length of the extra field as declared in the header.
    pub fn extra_field_len(&self) -> u32 {
        self.extra_field.len() as u32
    }
}

/// Iterate the `(header id, data)` records of an extra field.
///
/// A trailing record whose declared size overruns the field ends the
/// iteration.
pub fn extra_field_records(data: &[u8]) -> impl Iterator<Item = (u16, &[u8])> {
    let mut rest = data;
    std::iter::from_fn(move || {
        if rest.len() < 4 {
            return None;
        }
        let id = u16::from_le_bytes([rest[0], rest[1]]);
        let size = u16::from_le_bytes([rest[2], rest[3]]) as usize;
        let end = (4 + size).min(rest.len());
        let body = &rest[4..end];
        rest = &rest[end..];
        Some((id, body))
    })
}

/// WinZip AES key strength
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AesStrength {
    Aes128,
    Aes192,
    Aes256,
}

impl AesStrength {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(AesStrength::Aes128),
            2 => Some(AesStrength::Aes192),
            3 => Some(AesStrength::Aes256),
            _ => None,
        }
    }

    /// Mode code written to hash lines (1, 2 or 3).
    pub fn code(&self) -> u8 {
        match self {
            AesStrength::Aes128 => 1,
            AesStrength::Aes192 => 2,
            AesStrength::Aes256 => 3,
        }
    }

    pub fn salt_len(&self) -> usize {
        4 + 4 * self.code() as usize
    }
}

/// WinZip AES extra field record (`0x9901`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AesExtraField {
    pub vendor_version: u16,
    pub strength: AesStrength,
    /// Compression applied before encryption
    pub actual_method: CompressionMethod,
}

impl AesExtraField {
    pub const DATA_SIZE: usize = 7;

    /// Find and validate the AES record in an entry's extra field.
    pub fn find(extra_field: &[u8]) -> Result<Self> {
        let (_, data) = extra_field_records(extra_field)
            .find(|(id, _)| *id == AES_EXTRA_FIELD_ID)
            .context("AES entry without AES extra field")?;

        if data.len() < Self::DATA_SIZE {
            bail!("AES extra field too short: {} bytes", data.len());
        }

        let mut cursor = Cursor::new(data);
        let vendor_version = cursor.read_u16::<LittleEndian>()?;
        let vendor_id = cursor.read_u16::<LittleEndian>()?;
        let strength = cursor.read_u8()?;
        let actual_method = cursor.read_u16::<LittleEndian>()?;

        if vendor_id != AES_VENDOR_ID {
            bail!("Invalid AES vendor id: {:#06x}", vendor_id);
        }
        if !(1..=2).contains(&vendor_version) {
            bail!("Unsupported AES vendor version: {}", vendor_version);
        }
        let strength = AesStrength::from_u8(strength)
            .with_context(|| format!("Invalid AES strength: {}", strength))?;

        Ok(Self {
            vendor_version,
            strength,
            actual_method: CompressionMethod::from_u16(actual_method),
        })
    }
}
