//! Chat export loading and 12-hour → 24-hour conversion.
//!
//! Reading the file is the only fatal step of the pipeline. Conversion never
//! fails on content: lines that do not look like 12-hour messages are kept
//! verbatim.

use std::path::{Path, PathBuf};

use chat_core::error::{ChatError, Result};
use chat_core::time_utils::normalize_line;
use tracing::{debug, info, warn};

// ── Public types ──────────────────────────────────────────────────────────────

/// Export text ready for the parser.
#[derive(Debug, Clone)]
pub struct LoadedExport {
    /// File the export was read from.
    pub source: PathBuf,
    /// Normalized text.
    pub text: String,
    /// Where the converted copy was written, if requested and successful.
    pub converted_path: Option<PathBuf>,
    /// Number of lines rewritten from 12-hour to 24-hour form.
    pub lines_converted: usize,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Read the whole export as UTF-8.
pub fn read_export(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| ChatError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Normalize every line of `text`, preserving line terminators.
///
/// Returns the converted text and the number of lines that changed.
pub fn normalize_export(text: &str) -> (String, usize) {
    let mut out = String::with_capacity(text.len() + text.len() / 16);
    let mut changed = 0usize;

    for line in text.split_inclusive('\n') {
        let converted = normalize_line(line);
        if converted != line {
            changed += 1;
        }
        out.push_str(&converted);
    }

    (out, changed)
}

/// Convert `input` and write the normalized text to `output`.
///
/// Parent directories of `output` are created as needed.
pub fn convert_file_format(input: &Path, output: &Path) -> Result<PathBuf> {
    let text = read_export(input)?;
    let (converted, changed) = normalize_export(&text);
    write_converted(output, &converted)?;
    debug!(
        "Converted {} lines of {} into {}",
        changed,
        input.display(),
        output.display()
    );
    Ok(output.to_path_buf())
}

/// Read and normalize an export.
///
/// When `converted_out` is given the normalized copy is also written there.
/// A failed write is only logged; the normalized text is still returned.
pub fn load_export(path: &Path, converted_out: Option<&Path>) -> Result<LoadedExport> {
    let original = read_export(path)?;
    let (converted, lines_converted) = normalize_export(&original);

    let Some(out_path) = converted_out else {
        debug!(
            "Loaded {} ({} lines converted)",
            path.display(),
            lines_converted
        );
        return Ok(LoadedExport {
            source: path.to_path_buf(),
            text: converted,
            converted_path: None,
            lines_converted,
        });
    };

    match write_converted(out_path, &converted) {
        Ok(()) => {
            info!(
                "File converted successfully. Using: {}",
                out_path.display()
            );
            Ok(LoadedExport {
                source: path.to_path_buf(),
                text: converted,
                converted_path: Some(out_path.to_path_buf()),
                lines_converted,
            })
        }
        Err(e) => {
            warn!("Could not save the converted copy, continuing in memory: {}", e);
            Ok(LoadedExport {
                source: path.to_path_buf(),
                text: converted,
                converted_path: None,
                lines_converted,
            })
        }
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn write_converted(path: &Path, text: &str) -> Result<()> {
    let wrap = |source: std::io::Error| ChatError::FileWrite {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(wrap)?;
    }
    std::fs::write(path, text).map_err(wrap)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
