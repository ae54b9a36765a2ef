//! Extraction settings shared by every archive in a run.

/// Default number of ciphertext bytes that may be embedded in a hash line.
///
/// Blobs of this size or larger are written as a reference back into the
/// archive instead.
pub const DEFAULT_INLINE_THRESHOLD: u32 = 64;

/// Line buffer capacity of the consuming cracker.
const LINE_BUFFER_SIZE: u32 = 0x30000;

/// Plaintext buffer capacity of the consuming cracker.
const PLAINTEXT_BUFFER_SIZE: u32 = 0x80;

/// Largest inline threshold whose hex expansion still fits in one line.
pub const MAX_INLINE_THRESHOLD: u32 = LINE_BUFFER_SIZE / 2 - 2 * PLAINTEXT_BUFFER_SIZE;

/// Immutable run configuration, passed by reference into the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Ciphertext shorter than this many bytes is hex-embedded.
    pub inline_threshold: u32,
    /// Archive member known to contain plain ASCII text.
    pub ascii_file: Option<String>,
    /// Only this archive member is considered for legacy hashes.
    pub only_file: Option<String>,
    /// Emit checksum sub-records only, without the full verification record.
    pub checksum_only: bool,
    /// Classify members by extension.
    pub use_magic: bool,
    /// Always assume 2-byte legacy checksums.
    pub force_two_byte_checksum: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inline_threshold: DEFAULT_INLINE_THRESHOLD,
            ascii_file: None,
            only_file: None,
            checksum_only: false,
            use_magic: true,
            force_two_byte_checksum: false,
        }
    }
}

impl Config {
    /// Whether a ciphertext of `len` bytes is embedded in the line.
    pub fn is_inline(&self, len: u32) -> bool {
        len < self.inline_threshold
    }
}
