use chrono::{Duration, NaiveDate};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Extension given to every output file, whatever the scan format was
pub const OUTPUT_EXTENSION: &str = "jpg";

/// Suffix exiftool appends to the untouched copy it keeps next to a rewritten file
pub const BACKUP_SUFFIX: &str = "_original";

/// Generate the output filename for a frame: IMG_RRR_SSSS.jpg
pub fn output_name(roll_number: u32, sequence: u32) -> String {
    format!(
        "IMG_{:03}_{:04}.{}",
        roll_number, sequence, OUTPUT_EXTENSION
    )
}

/// Roll date at midnight plus `sequence` seconds, in exif date format (YYYY:MM:DD HH:MM:SS)
pub fn synthetic_timestamp(roll_date: NaiveDate, sequence: u32) -> String {
    let midnight = roll_date.and_time(chrono::NaiveTime::MIN);
    let stamped = midnight + Duration::seconds(i64::from(sequence));
    stamped.format("%Y:%m:%d %H:%M:%S").to_string()
}

/// Path of the backup exiftool leaves behind after rewriting `path`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}
