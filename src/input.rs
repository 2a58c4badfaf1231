use anyhow::{Context, Result, bail};
use std::fs;
use std::io::{self, Read};

const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB

/// Reads a one-shot question from a file or stdin.
pub struct InputReader;

impl InputReader {
    pub fn read(file_path: Option<&str>) -> Result<String> {
        file_path.map_or_else(|| Self::read_from(io::stdin().lock()), Self::read_file)
    }

    fn read_file(path: &str) -> Result<String> {
        let metadata =
            fs::metadata(path).with_context(|| format!("Failed to access file: {path}"))?;

        check_size(metadata.len() as usize)?;

        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))
    }

    fn read_from(reader: impl Read) -> Result<String> {
        let mut buffer = Vec::new();
        // Read one byte past the limit so oversized input is detected without reading it all
        reader
            .take(MAX_INPUT_SIZE as u64 + 1)
            .read_to_end(&mut buffer)
            .context("Failed to read from stdin")?;

        check_size(buffer.len())?;

        String::from_utf8(buffer).context("Input is not valid UTF-8")
    }
}

fn check_size(size: usize) -> Result<()> {
    if size > MAX_INPUT_SIZE {
        bail!(
            "Input size ({:.1} MB) exceeds maximum allowed size (1 MB).",
            size as f64 / 1024.0 / 1024.0
        );
    }
    Ok(())
}
