//! File I/O utilities for reading histories and results, and ensuring directories.
//!
//! Paths ending in `.zst` are decompressed with Zstandard before decoding.
//! A leading UTF-8 BOM is stripped from every text read here.

use std::io::ErrorKind;
use std::path::Path;

use gtolens_engine::errors::SourceError;
use gtolens_engine::store::{TextSource, split_lines};

/// Upper bound handed to the bulk decompressor.
const MAX_DECOMPRESSED: usize = 64 * 1024 * 1024;

fn read_text(path: &Path) -> std::io::Result<String> {
    let mut content = if path.extension().is_some_and(|e| e == "zst") {
        let comp = std::fs::read(path)?;
        let dec = zstd::bulk::decompress(&comp, MAX_DECOMPRESSED)?;
        String::from_utf8(dec).map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e))?
    } else {
        std::fs::read_to_string(path)?
    };
    strip_utf8_bom(&mut content);
    Ok(content)
}

/// Read text file with automatic .zst decompression detection.
///
/// # Example
///
/// ```rust,no_run
/// # use gtolens_cli::io_utils::read_text_auto;
/// let content = read_text_auto("results.jsonl").unwrap();
/// let compressed = read_text_auto("results.jsonl.zst").unwrap();
/// ```
pub fn read_text_auto(path: &str) -> Result<String, String> {
    read_text(Path::new(path)).map_err(|e| e.to_string())
}

/// Hand-history source that understands `.zst` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoSource;

impl TextSource for AutoSource {
    fn read_lines(&self, path: &Path) -> Result<Vec<String>, SourceError> {
        let text = read_text(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SourceError::NotFound(path.display().to_string()),
            _ => SourceError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            },
        })?;
        Ok(split_lines(&text))
    }
}

/// Ensure parent directory exists for given path, creating if needed.
pub fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create directory {}: {}", parent.display(), e))?;
    }
    Ok(())
}

fn strip_utf8_bom(s: &mut String) {
    const UTF8_BOM: &str = "\u{feff}";
    if s.starts_with(UTF8_BOM) {
        s.drain(..UTF8_BOM.len());
    }
}
