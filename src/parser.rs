//! Benchmark log parsing
//!
//! Extracts `(threads, time, avg attempts)` records from CAS contention
//! benchmark output. Each line is matched independently against a fixed
//! pattern; lines that do not match are ignored.
//!
//! # Recognized line format
//!
//! ```text
//! Threads: 4, Time: 0.0123 s, Avg attempts per op: 1.50
//! ```

use regex::{Captures, Regex};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Pattern for one benchmark result line. Numeric groups accept
/// scientific notation (`1.2e-05`).
pub const RECORD_PATTERN: &str = r"Threads:\s+([0-9]+),\s+Time:\s+([0-9.eE+\-]+)\s+s,\s+Avg attempts per op:\s+([0-9.eE+\-]+)";

/// One parsed benchmark result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchmarkRecord {
    /// Number of contending threads
    pub threads: u64,
    /// Elapsed time in seconds
    pub time_secs: f64,
    /// Average CAS attempts per successful operation
    pub avg_attempts: f64,
}

/// Which numeric field of a record failed to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Threads,
    Time,
    Attempts,
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordField::Threads => "thread count",
            RecordField::Time => "time",
            RecordField::Attempts => "avg attempts",
        };
        f.write_str(name)
    }
}

/// A line matched the record pattern but one of its numbers is malformed
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid {field} value '{raw}'")]
pub struct FieldError {
    pub field: RecordField,
    pub raw: String,
}

/// Errors raised while parsing a benchmark log
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("{origin}:{line}: malformed benchmark record")]
    InvalidRecord {
        origin: String,
        line: usize,
        #[source]
        cause: FieldError,
    },

    #[error("Failed to read benchmark log {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        cause: std::io::Error,
    },

    #[error("Invalid record pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Records parsed from one log, stored as three parallel sequences
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedLog {
    pub threads: Vec<u64>,
    pub times: Vec<f64>,
    pub attempts: Vec<f64>,
}

impl ParsedLog {
    /// Append a record to all three sequences
    pub fn push(&mut self, record: BenchmarkRecord) {
        self.threads.push(record.threads);
        self.times.push(record.time_secs);
        self.attempts.push(record.avg_attempts);
    }

    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    /// Iterate records in file order
    pub fn records(&self) -> impl Iterator<Item = BenchmarkRecord> + '_ {
        self.threads
            .iter()
            .zip(&self.times)
            .zip(&self.attempts)
            .map(|((&threads, &time_secs), &avg_attempts)| BenchmarkRecord {
                threads,
                time_secs,
                avg_attempts,
            })
    }
}

/// Compiled matcher for benchmark result lines
#[derive(Debug, Clone)]
pub struct LogParser {
    pattern: Regex,
}

impl LogParser {
    pub fn new() -> Result<Self, ParseError> {
        Ok(Self {
            pattern: Regex::new(RECORD_PATTERN)?,
        })
    }

    /// Parse a single line
    ///
    /// Returns `Ok(None)` for lines that do not carry a record.
    pub fn parse_line(&self, line: &str) -> Result<Option<BenchmarkRecord>, FieldError> {
        let Some(caps) = self.pattern.captures(line) else {
            return Ok(None);
        };

        Ok(Some(BenchmarkRecord {
            threads: capture(&caps, 1, RecordField::Threads)?,
            time_secs: capture(&caps, 2, RecordField::Time)?,
            avg_attempts: capture(&caps, 3, RecordField::Attempts)?,
        }))
    }

    /// Parse log content already held in memory
    ///
    /// `origin` names the content in error messages (usually the file path).
    pub fn parse_str(&self, origin: &str, content: &str) -> Result<ParsedLog, ParseError> {
        let mut log = ParsedLog::default();

        for (idx, line) in split_lines(content).enumerate() {
            let record = self
                .parse_line(line)
                .map_err(|cause| ParseError::InvalidRecord {
                    origin: origin.to_string(),
                    line: idx + 1,
                    cause,
                })?;
            if let Some(record) = record {
                log.push(record);
            }
        }

        Ok(log)
    }

    /// Read and parse a benchmark log file
    pub fn parse_file(&self, path: &Path) -> Result<ParsedLog, ParseError> {
        let bytes = fs::read(path).map_err(|cause| ParseError::Io {
            path: path.to_path_buf(),
            cause,
        })?;
        // Benchmark output occasionally carries stray non-UTF-8 bytes from
        // interleaved stderr; those lines can never match anyway.
        let content = String::from_utf8_lossy(&bytes);
        let log = self.parse_str(&path.display().to_string(), &content)?;

        tracing::debug!("Parsed {} records from {}", log.len(), path.display());
        Ok(log)
    }
}

/// Split on `\n`, `\r\n` and bare `\r`
///
/// Progress-style benchmark output rewrites the current line with `\r`,
/// so each carriage return also ends a record.
fn split_lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .split('\n')
        .flat_map(|line| line.strip_suffix('\r').unwrap_or(line).split('\r'))
}

fn capture<T: std::str::FromStr>(
    caps: &Captures<'_>,
    group: usize,
    field: RecordField,
) -> Result<T, FieldError> {
    let raw = caps.get(group).map_or("", |m| m.as_str());
    raw.parse().map_err(|_| FieldError {
        field,
        raw: raw.to_string(),
    })
}

/// Parse one benchmark log file with a freshly compiled matcher
pub fn parse_output_file(path: &Path) -> Result<ParsedLog, ParseError> {
    LogParser::new()?.parse_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parser() -> LogParser {
        LogParser::new().unwrap()
    }

    #[test]
    fn test_parse_line_basic_record() {
        let record = parser()
            .parse_line("Threads: 4, Time: 0.0123 s, Avg attempts per op: 1.50")
            .unwrap()
            .unwrap();
        assert_eq!(record.threads, 4);
        assert_eq!(record.time_secs, 0.0123);
        assert_eq!(record.avg_attempts, 1.50);
    }

    #[test]
    fn test_parse_line_scientific_notation() {
        let record = parser()
            .parse_line("Threads: 128, Time: 1.5e-03 s, Avg attempts per op: 2E+1")
            .unwrap()
            .unwrap();
        assert_eq!(record.threads, 128);
        assert_eq!(record.time_secs, 1.5e-3);
        assert_eq!(record.avg_attempts, 20.0);
    }

    #[test]
    fn test_parse_line_match_inside_longer_line() {
        let record = parser()
            .parse_line("[run 3] Threads: 2, Time: 0.5 s, Avg attempts per op: 1.1 (relaxed)")
            .unwrap();
        assert_eq!(
            record,
            Some(BenchmarkRecord {
                threads: 2,
                time_secs: 0.5,
                avg_attempts: 1.1,
            })
        );
    }

    #[test]
    fn test_parse_line_extra_whitespace() {
        let record = parser()
            .parse_line("Threads:   8,   Time:\t0.25  s,  Avg attempts per op:   3")
            .unwrap()
            .unwrap();
        assert_eq!(record.threads, 8);
        assert_eq!(record.avg_attempts, 3.0);
    }

    #[test]
    fn test_parse_line_non_matching() {
        let p = parser();
        assert_eq!(p.parse_line("").unwrap(), None);
        assert_eq!(p.parse_line("Final counter: 400000").unwrap(), None);
        // Missing the required whitespace after the colon
        assert_eq!(
            p.parse_line("Threads:4, Time: 0.1 s, Avg attempts per op: 1.0")
                .unwrap(),
            None
        );
        // Missing the unit
        assert_eq!(
            p.parse_line("Threads: 4, Time: 0.1, Avg attempts per op: 1.0")
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_parse_line_malformed_time() {
        let err = parser()
            .parse_line("Threads: 4, Time: 1.2.3 s, Avg attempts per op: 1.0")
            .unwrap_err();
        assert_eq!(err.field, RecordField::Time);
        assert_eq!(err.raw, "1.2.3");
        assert_eq!(err.to_string(), "invalid time value '1.2.3'");
    }

    #[test]
    fn test_parse_line_malformed_attempts() {
        let err = parser()
            .parse_line("Threads: 4, Time: 0.1 s, Avg attempts per op: --5")
            .unwrap_err();
        assert_eq!(err.field, RecordField::Attempts);
    }

    #[test]
    fn test_parse_line_thread_count_overflow() {
        let err = parser()
            .parse_line("Threads: 99999999999999999999999, Time: 0.1 s, Avg attempts per op: 1")
            .unwrap_err();
        assert_eq!(err.field, RecordField::Threads);
    }

    #[test]
    fn test_parse_str_counts_only_matching_lines() {
        let content = "\
CAS benchmark (relaxed)
Threads: 1, Time: 0.001 s, Avg attempts per op: 1.00
Final counter: 100000
Threads: 2, Time: 0.004 s, Avg attempts per op: 1.75

Threads: 4, Time: 0.02 s, Avg attempts per op: 3.20
done
";
        let log = parser().parse_str("mem", content).unwrap();
        assert_eq!(log.len(), 3);
        assert_eq!(log.threads, vec![1, 2, 4]);
        assert_eq!(log.times, vec![0.001, 0.004, 0.02]);
        assert_eq!(log.attempts, vec![1.0, 1.75, 3.2]);
    }

    #[test]
    fn test_parse_str_preserves_file_order() {
        let content = "\
Threads: 16, Time: 0.3 s, Avg attempts per op: 9.0
Threads: 2, Time: 0.01 s, Avg attempts per op: 1.2
Threads: 8, Time: 0.1 s, Avg attempts per op: 4.0
";
        let log = parser().parse_str("mem", content).unwrap();
        assert_eq!(log.threads, vec![16, 2, 8]);
    }

    #[test]
    fn test_parse_str_reports_line_number() {
        let content = "header\nThreads: 1, Time: 0.1 s, Avg attempts per op: 1\nThreads: 2, Time: 1e s, Avg attempts per op: 1\n";
        let err = parser().parse_str("run.log", content).unwrap_err();
        match &err {
            ParseError::InvalidRecord {
                origin,
                line,
                cause,
            } => {
                assert_eq!(origin, "run.log");
                assert_eq!(*line, 3);
                assert_eq!(cause.field, RecordField::Time);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.to_string(), "run.log:3: malformed benchmark record");
    }

    #[test]
    fn test_parse_str_carriage_return_separates_records() {
        let content = "Threads: 1, Time: 0.1 s, Avg attempts per op: 1.0\rThreads: 2, Time: 0.2 s, Avg attempts per op: 1.5\r\n";
        let log = parser().parse_str("mem", content).unwrap();
        assert_eq!(log.threads, vec![1, 2]);
    }

    #[test]
    fn test_parse_str_crlf_line_numbers() {
        let content = "header\r\nprogress 50%\rThreads: 2, Time: 1.1.1 s, Avg attempts per op: 1\r\n";
        let err = parser().parse_str("win.log", content).unwrap_err();
        assert_eq!(err.to_string(), "win.log:3: malformed benchmark record");
    }

    #[test]
    fn test_unicode_digits_do_not_match() {
        // Thread counts are ASCII only; full-width digits are not a record
        let line = "Threads: \u{ff14}, Time: 0.1 s, Avg attempts per op: 1.0";
        assert_eq!(parser().parse_line(line).unwrap(), None);
    }

    #[test]
    fn test_parse_str_empty_content() {
        let log = parser().parse_str("empty", "").unwrap();
        assert!(log.is_empty());
    }

    #[test]
    fn test_records_iterates_in_order() {
        let log = parser()
            .parse_str(
                "mem",
                "Threads: 1, Time: 0.5 s, Avg attempts per op: 1\nThreads: 3, Time: 0.7 s, Avg attempts per op: 2\n",
            )
            .unwrap();
        let records: Vec<_> = log.records().collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].threads, 3);
        assert_eq!(records[1].time_secs, 0.7);
    }

    #[test]
    fn test_parse_output_file_reads_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "warmup").unwrap();
        writeln!(file, "Threads: 32, Time: 0.75 s, Avg attempts per op: 12.5").unwrap();
        let log = parse_output_file(file.path()).unwrap();
        assert_eq!(log.threads, vec![32]);
        assert_eq!(log.attempts, vec![12.5]);
    }

    #[test]
    fn test_parse_output_file_missing() {
        let err = parse_output_file(Path::new("/nonexistent/cas.log")).unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
    }

    #[test]
    fn test_parse_output_file_tolerates_invalid_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\xff\xfe garbage\n").unwrap();
        file.write_all(b"Threads: 2, Time: 0.1 s, Avg attempts per op: 1.5\n")
            .unwrap();
        let log = parse_output_file(file.path()).unwrap();
        assert_eq!(log.len(), 1);
    }
}
