use fix_photos::error::{FixError, Result};
use fix_photos::filename::backup_path;
use fix_photos::metadata::MetadataWriter;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Stands in for exiftool: keeps a `_original` backup of every file it
/// touches and appends the timestamp to the file body on success.
#[derive(Default)]
pub struct FakeWriter {
    pub calls: Vec<(PathBuf, String)>,
    pub fail_on: HashSet<String>,
}

impl FakeWriter {
    pub fn failing_on(names: &[&str]) -> Self {
        FakeWriter {
            calls: Vec::new(),
            fail_on: names.iter().map(|n| n.to_string()).collect(),
        }
    }
}

impl MetadataWriter for FakeWriter {
    fn write_all_dates(&mut self, path: &Path, timestamp: &str) -> Result<()> {
        self.calls.push((path.to_path_buf(), timestamp.to_string()));

        let original = fs::read(path).map_err(|e| FixError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        fs::write(backup_path(path), &original).map_err(|e| FixError::Io {
            path: backup_path(path),
            source: e,
        })?;

        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if self.fail_on.contains(name) {
            return Err(FixError::MetadataWrite {
                path: path.to_path_buf(),
                reason: "simulated exiftool failure".to_string(),
            });
        }

        let mut stamped = original;
        stamped.extend_from_slice(format!("|{}", timestamp).as_bytes());
        fs::write(path, stamped).map_err(|e| FixError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

pub fn write_scans(dir: &Path, names: &[&str]) {
    for name in names {
        fs::write(dir.join(name), name.as_bytes()).unwrap();
    }
}

pub fn dir_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
