//! Input source and output sink.

use std::fs;
use std::io::{self, Read, Write};

use anyhow::{Context, Result};

/// Read the whole input file, or standard input when `path` is empty.
pub fn read_input(path: &str) -> Result<Vec<u8>> {
    if path.is_empty() {
        let mut buf = Vec::new();
        io::stdin()
            .lock()
            .read_to_end(&mut buf)
            .context("failed to read standard input")?;
        return Ok(buf);
    }
    fs::read(path).with_context(|| format!("failed to read input file {path}"))
}

/// Write `data` to the output file, or to standard output (followed by a
/// newline) when `path` is empty.
pub fn write_output(path: &str, data: &[u8]) -> Result<()> {
    if path.is_empty() {
        let mut out = io::stdout().lock();
        out.write_all(data)?;
        out.write_all(b"\n")?;
        out.flush().context("failed to write standard output")?;
        return Ok(());
    }
    fs::write(path, data).with_context(|| format!("failed to write output file {path}"))
}
