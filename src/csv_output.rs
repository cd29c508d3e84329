//! CSV export of the merged table
//!
//! Layout: a `Threads` column followed by every `{label}_Time` /
//! `{label}_Attempts` column in lexicographic order, one row per thread
//! count. Cells a file did not report are left empty.

use crate::table::MergedTable;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Header row for the merged table
pub fn header(table: &MergedTable) -> Vec<String> {
    std::iter::once("Threads".to_string())
        .chain(table.columns())
        .collect()
}

/// Format a value in shortest round-trip form
///
/// Decimal exponents in `-4..16` print positionally with a `.0` kept on
/// integral values (`2.0`, `0.0001`); anything outside that window prints
/// in scientific form with a signed two-digit exponent (`1.23e-05`, `1e+16`).
pub fn format_value(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let sci = format!("{value:e}");
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if (-4..16).contains(&exponent) {
        let text = value.to_string();
        if text.contains('.') {
            text
        } else {
            format!("{text}.0")
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    }
}

/// Write the merged table as CSV to any writer
pub fn write_csv<W: Write>(table: &MergedTable, writer: W) -> Result<()> {
    let columns = table.columns();
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record(header(table))
        .context("Failed to write CSV header")?;

    for threads in table.thread_counts() {
        let mut record = Vec::with_capacity(columns.len() + 1);
        record.push(threads.to_string());
        record.extend(
            table
                .row(threads, &columns)
                .into_iter()
                .map(|cell| cell.map(format_value).unwrap_or_default()),
        );
        csv.write_record(&record)
            .with_context(|| format!("Failed to write CSV row for {threads} threads"))?;
    }

    csv.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Render the merged table as a CSV string
pub fn to_csv_string(table: &MergedTable) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf)?;
    String::from_utf8(buf).context("CSV output is not valid UTF-8")
}

/// Write the merged table to `path`, replacing any existing file
pub fn write_csv_file(table: &MergedTable, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    write_csv(table, std::io::BufWriter::new(file))
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{BenchmarkRecord, ParsedLog};
    use crate::table::LabeledSeries;

    fn series(label: &str, records: &[(u64, f64, f64)]) -> LabeledSeries {
        let mut log = ParsedLog::default();
        for &(threads, time_secs, avg_attempts) in records {
            log.push(BenchmarkRecord {
                threads,
                time_secs,
                avg_attempts,
            });
        }
        LabeledSeries::new(label, log)
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(1.5), "1.5");
        assert_eq!(format_value(0.0123), "0.0123");
        assert_eq!(format_value(2.0), "2.0");
        assert_eq!(format_value(100000.0), "100000.0");
        assert_eq!(format_value(0.0), "0.0");
    }

    #[test]
    fn test_format_value_scientific_window() {
        assert_eq!(format_value(0.0001), "0.0001");
        assert_eq!(format_value(1e-05), "1e-05");
        assert_eq!(format_value(1.23e-05), "1.23e-05");
        assert_eq!(format_value(-2.5e-07), "-2.5e-07");
        assert_eq!(format_value(1e15), "1000000000000000.0");
        assert_eq!(format_value(1e16), "1e+16");
        assert_eq!(format_value(1e300), "1e+300");
    }

    #[test]
    fn test_scientific_values_in_rows() {
        let table = MergedTable::from_series(&[series("tiny", &[(4, 1.23e-05, 1e16)])]);
        let csv = to_csv_string(&table).unwrap();
        assert_eq!(csv, "Threads,tiny_Attempts,tiny_Time\n4,1e+16,1.23e-05\n");
    }

    #[test]
    fn test_empty_table_header_only() {
        let csv = to_csv_string(&MergedTable::new()).unwrap();
        assert_eq!(csv, "Threads\n");
    }

    #[test]
    fn test_single_series_rows() {
        let table = MergedTable::from_series(&[series(
            "relaxed",
            &[(1, 0.001, 1.0), (2, 0.0042, 1.75)],
        )]);

        let csv = to_csv_string(&table).unwrap();
        assert_eq!(
            csv,
            "Threads,relaxed_Attempts,relaxed_Time\n1,1.0,0.001\n2,1.75,0.0042\n"
        );
    }

    #[test]
    fn test_missing_cells_are_empty() {
        let table = MergedTable::from_series(&[
            series("a", &[(1, 0.1, 1.0)]),
            series("b", &[(2, 0.2, 2.5)]),
        ]);

        let csv = to_csv_string(&table).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Threads,a_Attempts,a_Time,b_Attempts,b_Time");
        assert_eq!(lines[1], "1,1.0,0.1,,");
        assert_eq!(lines[2], "2,,,2.5,0.2");
    }

    #[test]
    fn test_label_with_comma_is_quoted() {
        let table = MergedTable::from_series(&[series("a,b", &[(1, 0.1, 1.0)])]);
        let csv = to_csv_string(&table).unwrap();
        assert!(csv.starts_with("Threads,\"a,b_Attempts\",\"a,b_Time\"\n"));
    }

    #[test]
    fn test_write_csv_file_overwrites() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("all_result.csv");
        std::fs::write(&path, "stale contents that are longer than the output\n").unwrap();

        let table = MergedTable::from_series(&[series("a", &[(4, 0.5, 2.0)])]);
        write_csv_file(&table, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "Threads,a_Attempts,a_Time\n4,2.0,0.5\n");
    }
}
