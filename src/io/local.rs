use super::RecordReader;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Open a local archive for sequential scanning.
pub fn open_archive(path: &Path) -> Result<RecordReader<BufReader<File>>> {
    let file = File::open(path).with_context(|| format!("{}", path.display()))?;
    Ok(RecordReader::new(BufReader::new(file)))
}
