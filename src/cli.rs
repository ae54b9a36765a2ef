use anyhow::{Result, bail};
use clap::Parser;

use crate::config::{Config, DEFAULT_INLINE_THRESHOLD, MAX_INLINE_THRESHOLD};

#[derive(Parser, Debug)]
#[command(name = "zip2hash")]
#[command(version)]
#[command(about = "Extract password verification hashes from encrypted ZIP files")]
#[command(long_about = None)]
#[command(after_help = "Examples:\n  \
  zip2hash secret.zip > secret.hash           write one hash line per archive\n  \
  zip2hash -a readme.txt old.zip              treat readme.txt as a known ASCII file\n  \
  zip2hash -c -2 a.zip b.zip                  checksum-only hashes with 2 byte checksums")]
pub struct Cli {
    /// ZIP files to process
    #[arg(value_name = "ZIP FILES", required = true)]
    pub files: Vec<String>,

    /// Threshold for inlining data, in bytes (decimal, 0x hex or 0 octal)
    #[arg(
        short = 'i',
        value_name = "BYTES",
        default_value_t = DEFAULT_INLINE_THRESHOLD,
        value_parser = parse_threshold
    )]
    pub inline_threshold: u32,

    /// This is a 'known' ASCII file (old PKZIP only)
    #[arg(short = 'a', value_name = "FILE")]
    pub ascii_file: Option<String>,

    /// Only use this file from the .zip file (old PKZIP only)
    #[arg(short = 'o', value_name = "FILE")]
    pub only_file: Option<String>,

    /// Create 'checksum only' hashes (old PKZIP only)
    #[arg(short = 'c')]
    pub checksum_only: bool,

    /// Do not look for any magic file types (old PKZIP only)
    #[arg(short = 'n')]
    pub no_magic: bool,

    /// Force 2 byte checksum computation (old PKZIP only)
    #[arg(short = '2')]
    pub force_two_byte: bool,

    /// Verbose diagnostics (-vv => trace)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode, only errors are reported
    #[arg(short = 'q')]
    pub quiet: bool,
}

impl Cli {
    /// Build the run configuration, rejecting out-of-range values.
    pub fn config(&self) -> Result<Config> {
        if self.inline_threshold > MAX_INLINE_THRESHOLD {
            bail!(
                "threshold {} can't be larger than {}",
                self.inline_threshold,
                MAX_INLINE_THRESHOLD
            );
        }

        Ok(Config {
            inline_threshold: self.inline_threshold,
            ascii_file: self.ascii_file.clone(),
            only_file: self.only_file.clone(),
            checksum_only: self.checksum_only,
            use_magic: !self.no_magic,
            force_two_byte_checksum: self.force_two_byte,
        })
    }

    /// Default log directive derived from `-v`/`-q`.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Parse a byte count in C literal notation: `0x` hex, leading `0` octal,
/// decimal otherwise.
fn parse_threshold(s: &str) -> Result<u32, String> {
    let (digits, radix) = if let Some(hex) = s.strip_prefix("0x").or(s.strip_prefix("0X")) {
        (hex, 16)
    } else if s.len() > 1
        && let Some(oct) = s.strip_prefix('0')
    {
        (oct, 8)
    } else {
        (s, 10)
    };
    u32::from_str_radix(digits, radix).map_err(|e| format!("invalid threshold '{}': {}", s, e))
}
