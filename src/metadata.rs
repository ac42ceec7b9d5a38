use exiftool::ExifTool;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{FixError, Result};
use crate::filename::backup_path;

/// Writes date metadata into image files.
///
/// The processor only needs this narrow contract, so tests can swap in a
/// fake instead of running exiftool.
pub trait MetadataWriter {
    /// Set every date tag of `path` (DateTimeOriginal, CreateDate, ModifyDate) to `timestamp`
    fn write_all_dates(&mut self, path: &Path, timestamp: &str) -> Result<()>;

    /// Where the writer leaves its pre-modification copy of `path`, if it makes one
    fn backup_path(&self, path: &Path) -> PathBuf {
        backup_path(path)
    }
}

/// MetadataWriter backed by a single long-running exiftool process
pub struct ExifToolWriter {
    exiftool: ExifTool,
}

impl ExifToolWriter {
    pub fn new() -> Result<Self> {
        let exiftool = ExifTool::new().map_err(|e| FixError::ExifToolStart(e.to_string()))?;
        Ok(ExifToolWriter { exiftool })
    }
}

impl MetadataWriter for ExifToolWriter {
    fn write_all_dates(&mut self, path: &Path, timestamp: &str) -> Result<()> {
        let write_err = |reason: String| FixError::MetadataWrite {
            path: path.to_path_buf(),
            reason,
        };

        let path_str = path
            .to_str()
            .ok_or_else(|| write_err("path contains invalid UTF-8".to_string()))?;
        let assignment = format!("-AllDates={}", timestamp);
        let args = [assignment.as_str(), path_str];

        debug!("exiftool {}", args.join(" "));

        let lines = self
            .exiftool
            .execute_lines(&args)
            .map_err(|e| write_err(e.to_string()))?;

        if updated_count(&lines) > 0 {
            Ok(())
        } else {
            Err(write_err(format!(
                "exiftool updated no files ({})",
                lines.join("; ").trim()
            )))
        }
    }
}

/// Parse the "N image files updated" summary exiftool prints after a write
fn updated_count(lines: &[String]) -> u32 {
    lines
        .iter()
        .filter_map(|line| {
            let line = line.trim();
            let count = line.strip_suffix("image files updated")?;
            count.trim().parse::<u32>().ok()
        })
        .sum()
}
