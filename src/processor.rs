use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::args::RollContext;
use crate::error::{FixError, Result};
use crate::filename::{output_name, synthetic_timestamp};
use crate::metadata::MetadataWriter;
use crate::scan::{list_source_files, sort_by_index, SourceFile};

/// Exit code when every file was fixed
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code when the run aborted or any file could not be fixed
pub const EXIT_FAILURE: i32 = 1;

/// Outcome for one scan
#[derive(Debug)]
pub struct OperationResult {
    pub sequence: u32,
    pub source: PathBuf,
    pub output: PathBuf,
    pub timestamp: String,
    pub outcome: std::result::Result<(), FixError>,
}

impl OperationResult {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Everything a finished run produced, in processing order
#[derive(Debug)]
pub struct RunReport {
    pub output_dir: PathBuf,
    pub results: Vec<OperationResult>,
}

impl RunReport {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }

    pub fn exit_code(&self) -> i32 {
        if self.all_succeeded() {
            EXIT_SUCCESS
        } else {
            EXIT_FAILURE
        }
    }

    /// One entry per failed file: frame, paths, the timestamp it should have had and the reason
    pub fn failure_lines(&self) -> Vec<String> {
        self.results
            .iter()
            .filter_map(|result| {
                let reason = result.outcome.as_ref().err()?;
                Some(format!(
                    "#{:04} {} -> {} (wanted {})\n   reason: {}",
                    result.sequence,
                    result.source.display(),
                    result.output.display(),
                    result.timestamp,
                    reason
                ))
            })
            .collect()
    }

    pub fn print_summary(&self) {
        println!("---");
        if self.all_succeeded() {
            println!("Success: all files fixed");
        } else {
            println!("Error: not all files were fixed");
        }

        println!();
        println!("=== ROLL COMPLETE ===");
        println!("Output directory: {}", self.output_dir.display());
        println!("Total files: {}", self.total());
        println!("Fixed: {}", self.succeeded());
        println!("Failed: {}", self.failed());

        if !self.all_succeeded() {
            println!();
            println!("=== FAILED FILES ===");
            for line in self.failure_lines() {
                println!("{}", line);
            }
            println!();
            println!("Backups left by exiftool were kept next to the failed files.");
        }
    }
}

/// Copies and re-stamps the scans of one roll, one file at a time
pub struct Processor<W: MetadataWriter> {
    ctx: RollContext,
    writer: W,
}

impl<W: MetadataWriter> Processor<W> {
    pub fn new(ctx: RollContext, writer: W) -> Self {
        Processor { ctx, writer }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Run the whole roll. I/O errors abort; metadata failures are recorded per file.
    pub fn run(&mut self) -> Result<RunReport> {
        println!("Starting fix photos");
        println!("---");

        // List before the reset so a missing input dir fails without creating anything
        let mut files = list_source_files(&self.ctx.input_dir)?;
        sort_by_index(&mut files, self.ctx.reverse);

        let output_dir = self.ctx.output_dir();
        reset_output_dir(&output_dir)?;
        println!("Output directory cleaned");

        println!("---");
        println!("Input:");
        println!("- directory: {}", self.ctx.input_dir.display());
        println!("- rollNumber: {}", self.ctx.roll_number);
        println!("- date: {}", self.ctx.roll_date.format("%d/%m/%Y"));
        println!("- order: {}", if self.ctx.reverse { "reversed" } else { "ascending" });
        println!("- files: {}", files.len());
        println!("---");

        println!("Starting file fixing");

        let mut results = Vec::with_capacity(files.len());
        for (file, sequence) in files.iter().zip(1u32..) {
            results.push(self.fix_file(file, sequence, &output_dir)?);
        }

        Ok(RunReport {
            output_dir,
            results,
        })
    }

    fn fix_file(&mut self, file: &SourceFile, sequence: u32, output_dir: &Path) -> Result<OperationResult> {
        let output = output_dir.join(output_name(self.ctx.roll_number, sequence));
        let timestamp = synthetic_timestamp(self.ctx.roll_date, sequence);

        copy_file(&file.path, &output)?;

        println!("Fixing: {}", file.path.display());
        debug!(
            "frame {} (index {:?}) -> {} @ {}",
            sequence,
            file.index,
            output.display(),
            timestamp
        );

        let outcome = self.writer.write_all_dates(&output, &timestamp);
        match &outcome {
            Ok(()) => {
                println!("Success: {} -> {}", file.path.display(), output.display());
                self.remove_backup(&output);
            }
            Err(e) => {
                println!("Error: {} -> {}: {}", file.path.display(), output.display(), e);
            }
        }

        Ok(OperationResult {
            sequence,
            source: file.path.clone(),
            output,
            timestamp,
            outcome,
        })
    }

    fn remove_backup(&self, output: &Path) {
        let backup = self.writer.backup_path(output);
        match fs::remove_file(&backup) {
            Ok(()) => debug!("Removed backup {}", backup.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove backup {}: {}", backup.display(), e),
        }
    }
}

/// Delete any previous output for the roll and start from an empty directory
pub fn reset_output_dir(output_dir: &Path) -> Result<()> {
    match fs::remove_dir_all(output_dir) {
        Ok(()) => debug!("Removed previous output {}", output_dir.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(FixError::io(output_dir, e)),
    }
    fs::create_dir_all(output_dir).map_err(|e| FixError::io(output_dir, e))
}

fn copy_file(source: &Path, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| FixError::io(parent, e))?;
    }
    fs::copy(source, target).map_err(|e| FixError::io(source, e))?;
    Ok(())
}
