// PerfTrend - core/timestamp.rs
//
// The single parsing rule for run timestamps embedded in file names
// (e.g. `inst_a_2024-01-31_14-05-09.txt`). Locating and parsing the
// timestamp both happen here so a format change touches one place.

use crate::util::constants;
use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::OnceLock;

fn filename_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // The pattern is a constant covered by the unit tests below.
    PATTERN.get_or_init(|| {
        Regex::new(constants::FILENAME_TIMESTAMP_PATTERN)
            .expect("timestamp: invalid built-in pattern")
    })
}

/// Return the first timestamp-shaped substring of `stem`, or the
/// `Unknown` placeholder when there is none.
///
/// The text is only located, not validated: `2024-13-40_00-00-00` is
/// returned as-is and later coerced to a missing value by [`parse`].
pub fn extract_from_stem(stem: &str) -> String {
    filename_pattern()
        .find(stem)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| constants::UNKNOWN_TIMESTAMP.to_string())
}

/// Parse a raw file name timestamp with the fixed format.
///
/// Returns `None` for the placeholder and for anything that is not a valid
/// calendar date and time.
pub fn parse(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, constants::FILENAME_TIMESTAMP_FORMAT).ok()
}

/// Format a timestamp the way the results table shows it.
pub fn format_for_csv(ts: &NaiveDateTime) -> String {
    ts.format(constants::CSV_TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn test_extracts_timestamp_from_stem() {
        assert_eq!(
            extract_from_stem("instA_2024-01-01_00-00-00"),
            "2024-01-01_00-00-00"
        );
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(
            extract_from_stem("2023-05-06_07-08-09_rerun_2024-01-01_00-00-00"),
            "2023-05-06_07-08-09"
        );
    }

    #[test]
    fn test_missing_timestamp_yields_placeholder() {
        assert_eq!(extract_from_stem("baseline_run"), "Unknown");
        assert_eq!(parse("Unknown"), None);
    }

    #[test]
    fn test_parse_valid_timestamp() {
        let ts = parse("2024-02-01_13-45-30").expect("valid timestamp");
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(ts.hour(), 13);
        assert_eq!(ts.minute(), 45);
        assert_eq!(ts.second(), 30);
    }

    #[test]
    fn test_pattern_match_with_invalid_date_is_coerced_to_none() {
        let raw = extract_from_stem("run_2024-13-40_00-00-00");
        assert_eq!(raw, "2024-13-40_00-00-00");
        assert_eq!(parse(&raw), None);
    }

    #[test]
    fn test_csv_format() {
        let ts = parse("2024-01-01_09-05-00").unwrap();
        assert_eq!(format_for_csv(&ts), "2024-01-01 09:05:00");
    }
}
