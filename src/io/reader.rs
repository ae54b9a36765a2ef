use std::io::{ErrorKind, Read, Seek, SeekFrom};

use anyhow::{Context, Result, bail};

/// Forward-only record reader with absolute offset tracking.
///
/// Every ZIP record is addressed by its offset from the start of the
/// archive, so the reader keeps its own position instead of asking the
/// underlying stream (which, for buffered readers, would force a flush).
pub struct RecordReader<R> {
    inner: R,
    position: u64,
}

impl<R: Read + Seek> RecordReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, position: 0 }
    }

    /// Absolute offset of the next byte to be read.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Read the next 4-byte record signature.
    ///
    /// Returns `None` when the stream ends before a full signature is
    /// available, which terminates a scan normally.
    pub fn read_signature(&mut self) -> Result<Option<u32>> {
        let mut buf = [0u8; 4];
        let mut filled = 0;

        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e).context("failed to read record signature"),
            }
        }
        self.position += filled as u64;

        if filled < buf.len() {
            return Ok(None);
        }
        Ok(Some(u32::from_le_bytes(buf)))
    }

    /// Read exactly `len` bytes, failing on a short read.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.inner
            .read_exact(&mut buf)
            .with_context(|| format!("unexpected end of archive reading {} bytes", len))?;
        self.position += len as u64;
        Ok(buf)
    }

    /// Seek forward over `len` bytes without reading them.
    ///
    /// Skipping past the end is not an error; the next signature read
    /// reports end of stream instead.
    pub fn skip(&mut self, len: u64) -> Result<()> {
        if len == 0 {
            return Ok(());
        }
        let offset = i64::try_from(len).context("skip distance out of range")?;
        self.inner
            .seek(SeekFrom::Current(offset))
            .context("failed to seek in archive")?;
        self.position += len;
        Ok(())
    }

    /// Seek forward over `len` bytes that must all be present.
    ///
    /// Used for record payloads, where running off the end of the stream
    /// means the archive is truncated.
    pub fn skip_exact(&mut self, len: u64) -> Result<()> {
        let target = self
            .position
            .checked_add(len)
            .context("skip distance out of range")?;
        let end = self
            .inner
            .seek(SeekFrom::End(0))
            .context("failed to seek in archive")?;
        if target > end {
            bail!(
                "unexpected end of archive skipping {} bytes at offset {}",
                len,
                self.position
            );
        }
        self.inner
            .seek(SeekFrom::Start(target))
            .context("failed to seek in archive")?;
        self.position = target;
        Ok(())
    }

    /// Return to the start of the archive for a second scan pass.
    pub fn rewind(&mut self) -> Result<()> {
        self.inner
            .seek(SeekFrom::Start(0))
            .context("failed to rewind archive")?;
        self.position = 0;
        Ok(())
    }
}
