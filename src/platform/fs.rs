// PerfTrend - platform/fs.rs
//
// Filesystem helpers used by the app layer: reading run logs and creating
// the per-run output directory.

use crate::util::constants;
use chrono::NaiveDateTime;
use std::io;
use std::path::{Path, PathBuf};

/// Read the full content of a file as a string.
///
/// For files with invalid UTF-8, uses lossy conversion; markers and numbers
/// are ASCII so extraction is unaffected by the replaced bytes.
pub fn read_file_lossy(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            tracing::debug!(path = %path.display(), "Invalid UTF-8; decoding lossily");
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}

/// Name of the per-run output directory for a run started at `now`.
pub fn run_directory_name(now: &NaiveDateTime) -> String {
    now.format(constants::FILENAME_TIMESTAMP_FORMAT).to_string()
}

/// Create `<parent>/<YYYY-MM-DD_HH-MM-SS>` (and any missing parents).
///
/// An existing directory of the same name is reused.
pub fn create_run_directory(parent: &Path, now: &NaiveDateTime) -> io::Result<PathBuf> {
    let dir = parent.join(run_directory_name(now));
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 1)
            .unwrap()
    }

    #[test]
    fn test_run_directory_name_format() {
        assert_eq!(run_directory_name(&sample_time()), "2025-03-09_07-05-01");
    }

    #[test]
    fn test_create_run_directory_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let parent = dir.path().join("out").join("runs");
        let created = create_run_directory(&parent, &sample_time()).unwrap();
        assert!(created.is_dir());
        assert_eq!(created, parent.join("2025-03-09_07-05-01"));

        // Second call with the same time reuses the directory.
        let again = create_run_directory(&parent, &sample_time()).unwrap();
        assert_eq!(again, created);
    }

    #[test]
    fn test_read_file_lossy_replaces_invalid_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.txt");
        std::fs::write(&path, b"Execution time: 1.5\xff s\n").unwrap();
        let content = read_file_lossy(&path).unwrap();
        assert!(content.starts_with("Execution time: 1.5"));
        assert!(content.contains('\u{FFFD}'));
    }
}
