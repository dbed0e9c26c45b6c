// PerfTrend - core/extract.rs
//
// Line-oriented extraction of run records from a single run log.
// Core layer: accepts file content as a string, never touches the
// filesystem directly.
//
// A run log repeats a four-line cycle, in any order as long as the
// execution time line comes last:
//
//   ./instances/inst_042
//   Is solution feasible: true
//   Objective function value: 1234.5
//   Execution time: 12.3 s
//
// The execution time line completes the cycle. Lines that carry none of the
// markers are ignored.

use crate::core::model::{RunRecord, SourceFile};
use crate::util::constants;
use crate::util::error::ExtractError;
use std::borrow::Cow;

// =============================================================================
// Line classification
// =============================================================================

/// The shape of one (trimmed) run-log line, with its value text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `./some/path/inst_01` carries the instance name `inst_01`.
    Instance(&'a str),
    /// `Is solution feasible: <flag>`
    Feasibility(&'a str),
    /// `Objective function value: <number>`
    Objective(&'a str),
    /// `Execution time: <number> [unit]`
    ExecutionTime(&'a str),
    Other,
}

/// Classify a line.
///
/// The first matching shape wins, in the order instance prefix, feasibility,
/// objective, execution time. Markers are matched anywhere in the line; only
/// the instance prefix is anchored.
pub fn classify(line: &str) -> LineKind<'_> {
    let line = line.trim();

    if line.starts_with(constants::INSTANCE_PREFIX) {
        // rsplit always yields at least one segment.
        let name = line.rsplit('/').next().unwrap_or(line);
        LineKind::Instance(name)
    } else if line.contains(constants::FEASIBILITY_MARKER) {
        LineKind::Feasibility(value_text(line))
    } else if line.contains(constants::OBJECTIVE_MARKER) {
        LineKind::Objective(value_text(line))
    } else if line.contains(constants::EXECUTION_TIME_MARKER) {
        LineKind::ExecutionTime(value_text(line))
    } else {
        LineKind::Other
    }
}

/// Text between the first and the second colon, trimmed.
fn value_text(line: &str) -> &str {
    line.split(':').nth(1).unwrap_or("").trim()
}

// =============================================================================
// Accumulator
// =============================================================================

/// What feeding one line into the accumulator produced.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedOutcome {
    /// The line was recorded (or ignored); the cycle is still open.
    Pending,
    /// An execution time line completed a cycle.
    Emitted(RunRecord),
    /// An execution time line arrived before any instance line. Nothing is
    /// emitted and the accumulated fields are kept for the next cycle.
    Dropped,
}

/// In-progress state of the current cycle within one file.
///
/// Every field returns to its default after a record is emitted, so values
/// never leak from one cycle into the next.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordAccumulator {
    instance: Option<String>,
    feasible: String,
    objective: f64,
    execution_time: f64,
}

impl Default for RecordAccumulator {
    fn default() -> Self {
        Self {
            instance: None,
            feasible: constants::DEFAULT_FEASIBILITY.to_string(),
            objective: 0.0,
            execution_time: 0.0,
        }
    }
}

impl RecordAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore all four fields to their defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Instance name seen so far in the open cycle.
    pub fn instance(&self) -> Option<&str> {
        self.instance.as_deref()
    }

    /// Feed one line. `line_number` is 1-based and only used for error
    /// context.
    ///
    /// # Errors
    /// A numeric field that does not parse as `f64` is fatal.
    pub fn feed(
        &mut self,
        line: &str,
        line_number: u64,
        source: &SourceFile,
    ) -> Result<FeedOutcome, ExtractError> {
        match classify(line) {
            LineKind::Instance(name) => {
                self.instance = Some(name.to_string());
            }
            LineKind::Feasibility(flag) => {
                self.feasible = flag.to_string();
            }
            LineKind::Objective(text) => {
                self.objective = parse_number(text, "Objective function value", line_number, source)?;
            }
            LineKind::ExecutionTime(text) => {
                let token = text
                    .split_whitespace()
                    .next()
                    .ok_or_else(|| ExtractError::MissingValue {
                        file: source.path.clone(),
                        line_number,
                        field: "Execution time",
                    })?;
                self.execution_time = parse_number(token, "Execution time", line_number, source)?;

                return Ok(self.complete(line_number, source));
            }
            LineKind::Other => {}
        }
        Ok(FeedOutcome::Pending)
    }

    /// Close the cycle on an execution time line.
    fn complete(&mut self, line_number: u64, source: &SourceFile) -> FeedOutcome {
        let instance = match self.instance.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                tracing::warn!(
                    file = %source.path.display(),
                    line = line_number,
                    "Execution time line without a preceding instance line; no record emitted"
                );
                return FeedOutcome::Dropped;
            }
        };

        let record = RunRecord {
            instance,
            file: source.stem.clone(),
            raw_timestamp: source.raw_timestamp.clone(),
            feasible: std::mem::take(&mut self.feasible),
            objective: self.objective,
            execution_time: self.execution_time,
        };
        self.reset();
        FeedOutcome::Emitted(record)
    }
}

fn parse_number(
    text: &str,
    field: &'static str,
    line_number: u64,
    source: &SourceFile,
) -> Result<f64, ExtractError> {
    strip_digit_separators(text)
        .parse::<f64>()
        .map_err(|e| ExtractError::InvalidNumber {
            file: source.path.clone(),
            line_number,
            field,
            text: text.to_string(),
            source: e,
        })
}

/// `text` with every `_` that sits between two ASCII digits removed, so
/// `1_000` reads as `1000`. Any other underscore is kept and fails to parse.
fn strip_digit_separators(text: &str) -> Cow<'_, str> {
    if !text.contains('_') {
        return Cow::Borrowed(text);
    }
    let chars: Vec<char> = text.chars().collect();
    let kept: String = chars
        .iter()
        .enumerate()
        .filter(|&(i, &c)| {
            let between_digits = i > 0
                && chars[i - 1].is_ascii_digit()
                && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
            !(c == '_' && between_digits)
        })
        .map(|(_, &c)| c)
        .collect();
    Cow::Owned(kept)
}

/// Lines of `content`. A line ends at `\n`, `\r\n` or a lone `\r`.
fn split_lines(content: &str) -> impl Iterator<Item = &str> {
    let mut rest = content;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let line = match rest.find(|c: char| c == '\n' || c == '\r') {
            Some(pos) => {
                let line = &rest[..pos];
                let width = if rest[pos..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[pos + width..];
                line
            }
            None => std::mem::take(&mut rest),
        };
        Some(line)
    })
}

// =============================================================================
// File-level extraction
// =============================================================================

/// Records extracted from one run log.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Records in the order their cycles completed.
    pub records: Vec<RunRecord>,
    /// Execution time lines that arrived with no instance name set.
    pub dropped_cycles: usize,
    /// Total lines read.
    pub lines_processed: u64,
}

/// Run the accumulator over every line of `content`.
///
/// A fresh accumulator is used per file, so a cycle never spans files.
pub fn extract_records(content: &str, source: &SourceFile) -> Result<Extraction, ExtractError> {
    let mut acc = RecordAccumulator::new();
    let mut extraction = Extraction::default();

    for (idx, line) in split_lines(content).enumerate() {
        let line_number = (idx as u64) + 1;
        extraction.lines_processed += 1;

        match acc.feed(line, line_number, source)? {
            FeedOutcome::Pending => {}
            FeedOutcome::Emitted(record) => extraction.records.push(record),
            FeedOutcome::Dropped => extraction.dropped_cycles += 1,
        }
    }

    if acc.instance().is_some() {
        tracing::debug!(
            file = %source.path.display(),
            "File ends with an incomplete cycle"
        );
    }

    tracing::debug!(
        file = %source.path.display(),
        records = extraction.records.len(),
        dropped = extraction.dropped_cycles,
        lines = extraction.lines_processed,
        "Extraction complete"
    );

    Ok(extraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn source(stem: &str) -> SourceFile {
        SourceFile {
            path: PathBuf::from(format!("{stem}.txt")),
            stem: stem.to_string(),
            raw_timestamp: crate::core::timestamp::extract_from_stem(stem),
        }
    }

    #[test]
    fn test_classify_line_shapes() {
        assert_eq!(
            classify("./instances/set_a/inst_01"),
            LineKind::Instance("inst_01")
        );
        assert_eq!(
            classify("  Is solution feasible: true  "),
            LineKind::Feasibility("true")
        );
        assert_eq!(
            classify("Objective function value: 12.5"),
            LineKind::Objective("12.5")
        );
        assert_eq!(
            classify("[info] Execution time: 3.2 s"),
            LineKind::ExecutionTime("3.2 s")
        );
        assert_eq!(classify("Reading input..."), LineKind::Other);
    }

    #[test]
    fn test_classify_takes_text_between_first_two_colons() {
        assert_eq!(
            classify("Execution time: 3.2 s: wall"),
            LineKind::ExecutionTime("3.2 s")
        );
    }

    #[test]
    fn test_classify_instance_prefix_wins_over_markers() {
        assert_eq!(
            classify("./Execution time: 5/inst"),
            LineKind::Instance("inst")
        );
    }

    #[test]
    fn test_single_cycle_yields_one_record() {
        let content = "./instances/inst_01\n\
                       Is solution feasible: true\n\
                       Objective function value: 42.5\n\
                       Execution time: 1.75 s\n";
        let result = extract_records(content, &source("inst_01_2024-01-01_00-00-00")).unwrap();

        assert_eq!(result.records.len(), 1);
        let rec = &result.records[0];
        assert_eq!(rec.instance, "inst_01");
        assert_eq!(rec.file, "inst_01_2024-01-01_00-00-00");
        assert_eq!(rec.raw_timestamp, "2024-01-01_00-00-00");
        assert_eq!(rec.feasible, "true");
        assert_eq!(rec.objective, 42.5);
        assert_eq!(rec.execution_time, 1.75);
        assert_eq!(result.dropped_cycles, 0);
        assert_eq!(result.lines_processed, 4);
    }

    #[test]
    fn test_field_order_is_free_before_execution_time() {
        let content = "Objective function value: 7\n\
                       Is solution feasible: false\n\
                       ./inst_b\n\
                       Execution time: 0.5\n";
        let result = extract_records(content, &source("run")).unwrap();
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].instance, "inst_b");
        assert_eq!(result.records[0].objective, 7.0);
        assert_eq!(result.records[0].feasible, "false");
    }

    #[test]
    fn test_two_cycles_reset_between_records() {
        let content = "./inst_a\n\
                       Is solution feasible: true\n\
                       Objective function value: 100\n\
                       Execution time: 2.0 s\n\
                       ./inst_b\n\
                       Execution time: 3.0 s\n";
        let result = extract_records(content, &source("run")).unwrap();

        assert_eq!(result.records.len(), 2);
        let second = &result.records[1];
        assert_eq!(second.instance, "inst_b");
        assert_eq!(second.feasible, "False", "feasibility must not leak");
        assert_eq!(second.objective, 0.0, "objective must not leak");
        assert_eq!(second.execution_time, 3.0);
    }

    #[test]
    fn test_execution_time_without_instance_is_dropped() {
        let content = "Objective function value: 9\n\
                       Execution time: 1.0\n\
                       ./inst_c\n\
                       Execution time: 2.0\n";
        let result = extract_records(content, &source("run")).unwrap();

        assert_eq!(result.dropped_cycles, 1);
        assert_eq!(result.records.len(), 1);
        // The dropped cycle's objective is still pending when inst_c completes.
        assert_eq!(result.records[0].objective, 9.0);
        assert_eq!(result.records[0].execution_time, 2.0);
    }

    #[test]
    fn test_empty_instance_name_does_not_emit() {
        let content = "./instances/\nExecution time: 1.0\n";
        let result = extract_records(content, &source("run")).unwrap();
        assert!(result.records.is_empty());
        assert_eq!(result.dropped_cycles, 1);
    }

    #[test]
    fn test_malformed_objective_is_fatal() {
        let content = "./inst\nObjective function value: n/a\n";
        let err = extract_records(content, &source("run")).unwrap_err();
        match err {
            ExtractError::InvalidNumber {
                line_number, text, ..
            } => {
                assert_eq!(line_number, 2);
                assert_eq!(text, "n/a");
            }
            other => panic!("expected InvalidNumber, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_execution_time_is_fatal() {
        let content = "./inst\nExecution time:\n";
        let err = extract_records(content, &source("run")).unwrap_err();
        assert!(matches!(err, ExtractError::MissingValue { line_number: 2, .. }));
    }

    #[test]
    fn test_accumulator_reset_restores_defaults() {
        let src = source("run");
        let mut acc = RecordAccumulator::new();
        acc.feed("./inst", 1, &src).unwrap();
        acc.feed("Objective function value: 3", 2, &src).unwrap();
        assert_eq!(acc.instance(), Some("inst"));
        acc.reset();
        assert_eq!(acc, RecordAccumulator::default());
    }

    #[test]
    fn test_lone_carriage_returns_split_lines() {
        let content = "./a\rIs solution feasible: True\rObjective function value: 5\rExecution time: 1\r";
        let result = extract_records(content, &source("run")).unwrap();
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].instance, "a");
        assert_eq!(result.records[0].objective, 5.0);
        assert_eq!(result.lines_processed, 4);
    }

    #[test]
    fn test_crlf_counts_as_one_line_break() {
        let content = "./a\r\n\r\nObjective function value: 5\r\nExecution time: 1\r\n";
        let result = extract_records(content, &source("run")).unwrap();
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.lines_processed, 4);

        let lines: Vec<&str> = split_lines("x\r\ny\rz\n\nlast").collect();
        assert_eq!(lines, vec!["x", "y", "z", "", "last"]);
    }

    #[test]
    fn test_digit_separators_are_accepted() {
        let content = "./inst\nObjective function value: 1_000\nExecution time: 2_500.5 s\n";
        let result = extract_records(content, &source("run")).unwrap();
        assert_eq!(result.records[0].objective, 1000.0);
        assert_eq!(result.records[0].execution_time, 2500.5);
    }

    #[test]
    fn test_misplaced_underscores_are_still_invalid() {
        for text in ["1__0", "_1", "1_", "1_.5"] {
            let content = format!("./inst\nObjective function value: {text}\n");
            let err = extract_records(&content, &source("run")).unwrap_err();
            match err {
                ExtractError::InvalidNumber { text: reported, .. } => assert_eq!(reported, text),
                other => panic!("expected InvalidNumber for {text}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_content_without_markers_yields_nothing() {
        let result = extract_records("solver started\nno results\n", &source("run")).unwrap();
        assert!(result.records.is_empty());
        assert_eq!(result.dropped_cycles, 0);
    }
}
