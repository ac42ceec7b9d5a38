use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{FixError, Result};

/// One scan found in the input directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Frame index taken from the filename, None if it has no numeric token
    pub index: Option<u64>,
}

impl SourceFile {
    pub fn new(path: PathBuf) -> Self {
        let index = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(index_from_name);
        SourceFile { path, index }
    }

    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
    }
}

/// List the non-hidden files directly inside `dir`, in filesystem order
pub fn list_source_files(dir: &Path) -> Result<Vec<SourceFile>> {
    let metadata = std::fs::metadata(dir).map_err(|e| FixError::io(dir, e))?;
    if !metadata.is_dir() {
        return Err(FixError::io(
            dir,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
        ));
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(dir).to_path_buf();
            let source = err
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "walk failed"));
            FixError::Io { path, source }
        })?;

        let Some(name) = entry.file_name().to_str() else {
            warn!("Skipping non UTF-8 filename: {}", entry.path().display());
            continue;
        };

        if name.starts_with('.') {
            continue;
        }

        // Symlinked scans count as files. Skips the roll output directory too.
        if !entry.path().is_file() {
            debug!("Skipping non-file entry: {}", entry.path().display());
            continue;
        }

        files.push(SourceFile::new(entry.into_path()));
    }

    Ok(files)
}

/// Frame index of a scan filename.
///
/// The name is split on `_`, empty pieces are dropped and the leading digits
/// of the last piece are the index: `_7A_0325.jpg` gives 325, `10A_0322.jpg`
/// gives 322. Returns None when the last piece does not start with a digit.
pub fn index_from_name(name: &str) -> Option<u64> {
    let last = name.split('_').filter(|s| !s.is_empty()).last()?;
    let end = last
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(last.len());
    let digits = &last[..end];
    if digits.is_empty() {
        return None;
    }
    // Absurdly long digit runs saturate instead of dropping to the unindexed group
    Some(digits.parse().unwrap_or(u64::MAX))
}

/// Unindexed files sort after every indexed one
fn compare_index(a: Option<u64>, b: Option<u64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort by frame index; `reverse` flips the whole sorted list
pub fn sort_by_index(files: &mut [SourceFile], reverse: bool) {
    files.sort_by(|a, b| compare_index(a.index, b.index));
    if reverse {
        files.reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(files: &[SourceFile]) -> Vec<&str> {
        files.iter().map(|f| f.file_name()).collect()
    }

    fn source(name: &str) -> SourceFile {
        SourceFile::new(PathBuf::from("/scans").join(name))
    }

    #[test]
    fn test_index_from_name_uses_last_segment() {
        assert_eq!(index_from_name("_8_0324.jpg"), Some(324));
        assert_eq!(index_from_name("_7A_0325.jpg"), Some(325));
        assert_eq!(index_from_name("10A_0322.jpg"), Some(322));
        assert_eq!(index_from_name("__9A_0323.jpg"), Some(323));
        assert_eq!(index_from_name("11_0321.jpg"), Some(321));
    }

    #[test]
    fn test_index_from_name_without_separator() {
        assert_eq!(index_from_name("0042.tif"), Some(42));
        assert_eq!(index_from_name("scan.jpg"), None);
    }

    #[test]
    fn test_index_from_name_unparseable_last_segment() {
        assert_eq!(index_from_name("_12_final.jpg"), None);
        assert_eq!(index_from_name("____"), None);
        assert_eq!(index_from_name(""), None);
    }

    #[test]
    fn test_sort_by_index_ascending() {
        let mut files = vec![
            source("_8_0324.jpg"),
            source("_7A_0325.jpg"),
            source("10A_0322.jpg"),
        ];
        sort_by_index(&mut files, false);
        assert_eq!(names(&files), ["10A_0322.jpg", "_8_0324.jpg", "_7A_0325.jpg"]);
    }

    #[test]
    fn test_sort_by_index_reverse_flips_list() {
        let mut files = vec![
            source("_8_0324.jpg"),
            source("_7A_0325.jpg"),
            source("10A_0322.jpg"),
        ];
        sort_by_index(&mut files, true);
        assert_eq!(names(&files), ["_7A_0325.jpg", "_8_0324.jpg", "10A_0322.jpg"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_indices() {
        let mut files = vec![source("b_0002.jpg"), source("a_0001.jpg"), source("c_0002.jpg")];
        sort_by_index(&mut files, false);
        assert_eq!(names(&files), ["a_0001.jpg", "b_0002.jpg", "c_0002.jpg"]);
    }

    #[test]
    fn test_unindexed_files_sort_last() {
        let mut files = vec![
            source("cover.jpg"),
            source("_2_0002.jpg"),
            source("notes_x.jpg"),
            source("_1_0001.jpg"),
        ];
        sort_by_index(&mut files, false);
        assert_eq!(
            names(&files),
            ["_1_0001.jpg", "_2_0002.jpg", "cover.jpg", "notes_x.jpg"]
        );

        sort_by_index(&mut files, true);
        assert_eq!(
            names(&files),
            ["notes_x.jpg", "cover.jpg", "_2_0002.jpg", "_1_0001.jpg"]
        );
    }

    #[test]
    fn test_list_source_files_skips_hidden_and_dirs() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("_1_0001.jpg"), b"a").unwrap();
        fs::write(dir.path().join("_2_0002.jpg"), b"b").unwrap();
        fs::write(dir.path().join(".DS_Store"), b"x").unwrap();
        fs::write(dir.path().join("._1_0001.jpg"), b"x").unwrap();
        fs::create_dir(dir.path().join("5")).unwrap();
        fs::write(dir.path().join("5").join("IMG_005_0001.jpg"), b"old").unwrap();

        let mut files = list_source_files(dir.path()).unwrap();
        files.sort_by(|a, b| a.path.cmp(&b.path));

        assert_eq!(names(&files), ["_1_0001.jpg", "_2_0002.jpg"]);
        assert_eq!(files[0].index, Some(1));
        assert_eq!(files[1].index, Some(2));
    }

    #[test]
    fn test_list_source_files_missing_dir() {
        let dir = TempDir::new().unwrap();
        let err = list_source_files(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, FixError::Io { .. }));
    }

    #[test]
    fn test_list_source_files_rejects_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("scan.jpg");
        fs::write(&file, b"a").unwrap();
        assert!(matches!(list_source_files(&file), Err(FixError::Io { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_list_source_files_follows_symlinked_scans() {
        use std::os::unix::fs as unix_fs;

        let dir = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let target = elsewhere.path().join("scan-1.jpg");
        fs::write(&target, b"a").unwrap();
        unix_fs::symlink(&target, dir.path().join("_1_0001.jpg")).unwrap();
        fs::write(dir.path().join("_2_0002.jpg"), b"b").unwrap();

        // A symlinked folder is still not a scan
        unix_fs::symlink(elsewhere.path(), dir.path().join("linked_dir")).unwrap();

        let mut files = list_source_files(dir.path()).unwrap();
        sort_by_index(&mut files, false);

        assert_eq!(names(&files), ["_1_0001.jpg", "_2_0002.jpg"]);
        assert_eq!(files[0].index, Some(1));
    }
}
