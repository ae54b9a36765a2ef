//! Diagnostic output via `tracing`.
//!
//! Hash lines are the program's only stdout output; everything logged here
//! goes to stderr. `RUST_LOG` takes precedence over the level chosen on the
//! command line:
//!
//! ```bash
//! RUST_LOG=zip2hash=trace zip2hash secret.zip
//! ```

use std::io::IsTerminal;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the global subscriber with `default_level` as fallback filter.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .with_target(false)
            .without_time()
            .compact(),
    );

    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice() {
        init("debug");
        init("info");
        tracing::debug!(archive = "a.zip", "Structured log");
    }
}
