//! Coarse content classification of archive members by file name.
//!
//! The cracker can reject most wrong passwords for a classified member by
//! checking the decrypted prefix against the type's magic bytes, which is far
//! cheaper than inflating and checking the CRC. The classification is only a
//! hint; nothing here looks at file contents.

use std::path::Path;

use crate::config::Config;

/// Magic type code carried in legacy hash lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MagicType(pub u8);

impl MagicType {
    pub const NONE: MagicType = MagicType(0);
    pub const OFFICE: MagicType = MagicType(1);
    pub const EXECUTABLE: MagicType = MagicType(2);
    pub const ZIP: MagicType = MagicType(3);
    pub const BITMAP: MagicType = MagicType(4);
    pub const GIF: MagicType = MagicType(5);
    pub const PDF: MagicType = MagicType(6);
    pub const GZIP: MagicType = MagicType(7);
    pub const BZIP2: MagicType = MagicType(8);
    pub const FLV: MagicType = MagicType(9);
    pub const SWF: MagicType = MagicType(10);
    pub const MP3: MagicType = MagicType(11);
    /// Known plain ASCII text
    pub const TEXT: MagicType = MagicType(255);

    pub fn is_classified(&self) -> bool {
        self.0 != 0
    }
}

const EXTENSIONS: &[(&str, MagicType)] = &[
    ("DOC", MagicType::OFFICE),
    ("XLS", MagicType::OFFICE),
    ("DOT", MagicType::OFFICE),
    ("XLT", MagicType::OFFICE),
    ("EXE", MagicType::EXECUTABLE),
    ("DLL", MagicType::EXECUTABLE),
    ("ZIP", MagicType::ZIP),
    ("BMP", MagicType::BITMAP),
    ("DIB", MagicType::BITMAP),
    ("GIF", MagicType::GIF),
    ("PDF", MagicType::PDF),
    ("GZ", MagicType::GZIP),
    ("TGZ", MagicType::GZIP),
    ("BZ2", MagicType::BZIP2),
    ("TZ2", MagicType::BZIP2),
    ("FLV", MagicType::FLV),
    ("SWF", MagicType::SWF),
    ("MP3", MagicType::MP3),
];

/// Classify an archive member name.
pub fn classify(file_name: &str, config: &Config) -> MagicType {
    if !config.use_magic {
        return MagicType::NONE;
    }

    if let Some(ascii) = &config.ascii_file
        && ascii.eq_ignore_ascii_case(file_name)
    {
        return MagicType::TEXT;
    }

    // Only the text after the last dot counts, even inside a directory name
    let Some((_, extension)) = file_name.rsplit_once('.') else {
        return MagicType::NONE;
    };

    EXTENSIONS
        .iter()
        .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
        .map(|(_, magic)| *magic)
        .unwrap_or(MagicType::NONE)
}

/// Base name of an archive path, as written in front of every hash line.
pub fn archive_basename(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}
