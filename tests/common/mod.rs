//! Synthetic archive construction for integration tests.

#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Cursor;

use zip2hash::RecordReader;

pub const ENCRYPTED: u16 = 0x0001;
pub const DATA_DESCRIPTOR: u16 = 0x0008;

/// One local file record.
#[derive(Debug, Clone)]
pub struct Entry {
    pub version: u16,
    pub flags: u16,
    pub method: u16,
    pub time: u16,
    pub date: u16,
    pub crc: u32,
    pub compressed: Option<u32>,
    pub uncompressed: u32,
    pub name: Vec<u8>,
    pub extra: Vec<u8>,
    pub data: Vec<u8>,
}

impl Entry {
    /// Unencrypted stored entry.
    pub fn plain(name: &str, data: &[u8]) -> Self {
        Entry {
            version: 0x14,
            flags: 0,
            method: 0,
            time: 0x6000,
            date: 0x5a21,
            crc: 0x1234_5678,
            compressed: None,
            uncompressed: data.len() as u32,
            name: name.as_bytes().to_vec(),
            extra: Vec::new(),
            data: data.to_vec(),
        }
    }

    /// Traditional PKWARE entry whose ciphertext is `len` copies of `fill`.
    pub fn legacy(name: &str, len: usize, fill: u8) -> Self {
        Entry {
            flags: ENCRYPTED,
            method: 8,
            uncompressed: len as u32 * 2,
            ..Entry::plain(name, &vec![fill; len])
        }
    }

    /// WinZip AES entry: salt | verifier | ciphertext | auth code.
    pub fn aes(name: &str, strength: u8, ciphertext: &[u8]) -> Self {
        let salt_len = 4 + 4 * strength as usize;
        let mut data = vec![0x5a; salt_len];
        data.extend_from_slice(&[0xab, 0xcd]);
        data.extend_from_slice(ciphertext);
        data.extend_from_slice(&[0xee; 10]);

        Entry {
            version: 0x33,
            flags: ENCRYPTED,
            method: 99,
            uncompressed: ciphertext.len() as u32,
            extra: aes_extra_field(strength),
            ..Entry::plain(name, &[])
        }
        .with_data(data)
    }

    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }

    fn encoded_len(&self) -> usize {
        30 + self.name.len() + self.extra.len() + self.data.len()
    }
}

/// AE-2 extra field record announcing deflate under AES.
pub fn aes_extra_field(strength: u8) -> Vec<u8> {
    let mut extra = Vec::new();
    extra.write_u16::<LittleEndian>(0x9901).unwrap();
    extra.write_u16::<LittleEndian>(7).unwrap();
    extra.write_u16::<LittleEndian>(2).unwrap();
    extra.write_u16::<LittleEndian>(0x4541).unwrap();
    extra.push(strength);
    extra.write_u16::<LittleEndian>(8).unwrap();
    extra
}

/// Info-ZIP UNIX extra field, marks 2-byte checksums.
pub fn unix_extra_field() -> Vec<u8> {
    let mut extra = Vec::new();
    extra.write_u16::<LittleEndian>(0x7875).unwrap();
    extra.write_u16::<LittleEndian>(3).unwrap();
    extra.extend_from_slice(&[1, 4, 0]);
    extra
}

/// Archive assembled record by record.
#[derive(Debug, Default)]
pub struct ZipBuilder {
    data: Vec<u8>,
    offsets: Vec<usize>,
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(mut self, entry: Entry) -> Self {
        self.offsets.push(self.data.len());
        let d = &mut self.data;
        d.extend_from_slice(b"PK\x03\x04");
        d.write_u16::<LittleEndian>(entry.version).unwrap();
        d.write_u16::<LittleEndian>(entry.flags).unwrap();
        d.write_u16::<LittleEndian>(entry.method).unwrap();
        d.write_u16::<LittleEndian>(entry.time).unwrap();
        d.write_u16::<LittleEndian>(entry.date).unwrap();
        d.write_u32::<LittleEndian>(entry.crc).unwrap();
        d.write_u32::<LittleEndian>(entry.compressed.unwrap_or(entry.data.len() as u32))
            .unwrap();
        d.write_u32::<LittleEndian>(entry.uncompressed).unwrap();
        d.write_u16::<LittleEndian>(entry.name.len() as u16).unwrap();
        d.write_u16::<LittleEndian>(entry.extra.len() as u16).unwrap();
        d.extend_from_slice(&entry.name);
        d.extend_from_slice(&entry.extra);
        d.extend_from_slice(&entry.data);
        debug_assert_eq!(d.len() - self.offsets.last().unwrap(), entry.encoded_len());
        self
    }

    /// Append a 16-byte data descriptor record.
    pub fn data_descriptor(mut self) -> Self {
        self.data.extend_from_slice(b"PK\x07\x08");
        self.data.extend_from_slice(&[0x11; 12]);
        self
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.data.extend_from_slice(bytes);
        self
    }

    /// Offset of the n-th entry's local header.
    pub fn offset(&self, n: usize) -> usize {
        self.offsets[n]
    }

    /// Close the archive with a central directory signature.
    pub fn finish(self) -> Vec<u8> {
        let mut data = self.data;
        data.extend_from_slice(b"PK\x01\x02");
        data.extend_from_slice(&[0u8; 42]);
        data.extend_from_slice(b"PK\x05\x06");
        data.extend_from_slice(&[0u8; 18]);
        data
    }

    /// The archive without any central directory.
    pub fn truncated(self) -> Vec<u8> {
        self.data
    }
}

pub fn reader(data: Vec<u8>) -> RecordReader<Cursor<Vec<u8>>> {
    RecordReader::new(Cursor::new(data))
}

/// Fields between the grammar's start and end tags.
pub fn fields<'a>(line: &'a str, start: &str, end: &str) -> Vec<&'a str> {
    let from = line.find(start).unwrap() + start.len();
    let to = line.find(end).unwrap();
    line[from..to].split('*').collect()
}
