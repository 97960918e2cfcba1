//! Import of ride history files
//!
//! Lines are decoded one at a time. A malformed line is skipped and counted;
//! it never aborts the rest of the import. Records are staged and only added
//! to the history once the whole file has been read, so an I/O failure part
//! way through leaves the history untouched.
//!
//! Lines may end in `\n` or `\r\n`. A line that is not valid UTF-8 is
//! skipped like any other malformed line.

use crate::codec::format::{decode_record, is_ignorable, CodecOptions, FieldIssue, MalformedRecord};
use crate::ride::error::{RecoveryStrategy, RideError, RideResult};
use crate::ride::history::HistoryLog;
use crate::types::VisitorRecord;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::str;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// A problem found on one imported line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineIssue {
    /// The line was dropped
    Skipped(MalformedRecord),
    /// The line was kept after a field was repaired
    Repaired {
        /// Line number in the file, starting at 1
        line: usize,
        /// What was repaired
        issue: FieldIssue,
    },
}

impl LineIssue {
    /// Line the issue was found on
    pub fn line(&self) -> usize {
        match self {
            LineIssue::Skipped(malformed) => malformed.line(),
            LineIssue::Repaired { line, .. } => *line,
        }
    }

    /// How the issue was recovered
    pub fn recovery(&self) -> RecoveryStrategy {
        match self {
            LineIssue::Skipped(malformed) => malformed.recovery(),
            LineIssue::Repaired { issue, .. } => issue.recovery(),
        }
    }
}

impl fmt::Display for LineIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineIssue::Skipped(malformed) => write!(f, "skipped {}", malformed),
            LineIssue::Repaired { line, issue } => write!(f, "line {}: {}", line, issue),
        }
    }
}

/// Tally of an import run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Records accepted
    pub imported: usize,
    /// Data lines dropped as malformed
    pub skipped: usize,
    /// Every line read, including blank and comment lines
    pub lines_processed: usize,
    /// Per-line problems, in file order
    pub issues: Vec<LineIssue>,
}

impl ImportReport {
    /// Lines that were repaired but kept
    pub fn repaired_lines(&self) -> usize {
        let mut lines: Vec<usize> = self
            .issues
            .iter()
            .filter(|issue| issue.recovery() == RecoveryStrategy::UseDefaults)
            .map(LineIssue::line)
            .collect();
        lines.dedup();
        lines.len()
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Imported {} record(s), skipped {} line(s), processed {} line(s)",
            self.imported, self.skipped, self.lines_processed
        )
    }
}

/// Records decoded from a file together with the tally
#[derive(Debug, Clone, Default)]
pub struct RecordBatch {
    /// Accepted records in file order
    pub records: Vec<VisitorRecord>,
    /// Tally of the run
    pub report: ImportReport,
}

/// Decode every data line from `reader`
///
/// Only I/O failures are returned as errors; malformed lines are tallied.
pub fn read_records<R: BufRead>(mut reader: R, options: &CodecOptions) -> io::Result<RecordBatch> {
    let mut batch = RecordBatch::default();
    let mut buffer = Vec::new();
    let mut line_number = 0;

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }
        line_number += 1;
        batch.report.lines_processed += 1;

        let mut bytes = buffer.as_slice();
        if let Some(rest) = bytes.strip_suffix(b"\n") {
            bytes = rest;
        }
        if let Some(rest) = bytes.strip_suffix(b"\r") {
            bytes = rest;
        }

        let line = match str::from_utf8(bytes) {
            Ok(line) => line,
            Err(_) => {
                skip_line(&mut batch.report, MalformedRecord::InvalidEncoding { line: line_number });
                continue;
            }
        };

        if is_ignorable(line) {
            continue;
        }

        match decode_record(line, line_number, options) {
            Ok(decoded) => {
                for issue in decoded.issues {
                    debug!(line = line_number, "Repaired imported field: {}", issue);
                    batch.report.issues.push(LineIssue::Repaired { line: line_number, issue });
                }
                batch.records.push(decoded.visitor);
                batch.report.imported += 1;
            }
            Err(malformed) => skip_line(&mut batch.report, malformed),
        }
    }

    Ok(batch)
}

fn skip_line(report: &mut ImportReport, malformed: MalformedRecord) {
    warn!("Skipping malformed history line: {}", malformed);
    report.skipped += 1;
    report.issues.push(LineIssue::Skipped(malformed));
}

/// Open `path` and decode its records
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_records(path: impl AsRef<Path>, options: &CodecOptions) -> RideResult<RecordBatch> {
    let path = path.as_ref();
    let to_error = |source: io::Error| {
        warn!(error = %source, "Reading history file failed");
        RideError::file_access(path, source)
    };

    let file = File::open(path).map_err(to_error)?;
    read_records(BufReader::new(file), options).map_err(to_error)
}

/// Append the records of the file at `path` to `history`
///
/// Import is additive: existing records are kept and the new ones follow
/// them in file order.
pub fn import_history(
    history: &mut HistoryLog,
    path: impl AsRef<Path>,
    options: &CodecOptions,
) -> RideResult<ImportReport> {
    let path = path.as_ref();
    let batch = load_records(path, options)?;
    history.extend(batch.records);

    let report = batch.report;
    info!(
        imported = report.imported,
        skipped = report.skipped,
        lines = report.lines_processed,
        "Ride history imported from {}",
        path.display()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
# Ride History Export for: Thunder Bolt
# Export Date: 2024-05-01 09:30:00 UTC
# Format: Name,Age,Gender,VisitorID,TicketType,HasSeasonPass
Mike Wilson,32,Male,V2001,Family Pass,false

Emma Davis,25,Female,V2002,Season Pass,true
Broken,abc,Male,V2003,General,false
Short,40
,151,Female,,General,yes
";

    #[test]
    fn test_read_records_tally() {
        let batch = read_records(Cursor::new(SAMPLE), &CodecOptions::default()).unwrap();
        let report = &batch.report;

        assert_eq!(report.imported, 3);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.lines_processed, 9);
        assert_eq!(report.repaired_lines(), 1);

        let names: Vec<&str> = batch.records.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Mike Wilson", "Emma Davis", "Unknown Visitor"]);

        let repaired = &batch.records[2];
        assert_eq!(repaired.age, 25);
        assert_eq!(repaired.visitor_id, "IMPORTED-0009");
        assert!(!repaired.has_season_pass);
    }

    #[test]
    fn test_skipped_lines_are_reported_in_order() {
        let batch = read_records(Cursor::new(SAMPLE), &CodecOptions::default()).unwrap();
        let skipped: Vec<usize> = batch
            .report
            .issues
            .iter()
            .filter(|issue| issue.recovery() == RecoveryStrategy::Skip)
            .map(LineIssue::line)
            .collect();
        assert_eq!(skipped, vec![7, 8]);
    }

    #[test]
    fn test_header_is_optional() {
        let text = "Amy,25,Female,V1,General,false\nBob,30,Male,V2,General,true\n";
        let batch = read_records(Cursor::new(text), &CodecOptions::default()).unwrap();
        assert_eq!(batch.report.imported, 2);
        assert!(batch.report.issues.is_empty());
    }

    #[test]
    fn test_custom_delimiter() {
        let options = CodecOptions::new('|').unwrap();
        let text = "A;B|25|Female|V1|General|false\n";
        let batch = read_records(Cursor::new(text), &options).unwrap();
        assert_eq!(batch.records[0].name, "A|B");
    }

    #[test]
    fn test_invalid_utf8_line_is_skipped() {
        let mut bytes = b"Amy,25,Female,V1,General,false\n".to_vec();
        bytes.extend_from_slice(b"B\xffb,30,Male,V2,General,true\n");
        bytes.extend_from_slice(b"Cal,41,Male,V3,General,false\n");

        let batch = read_records(Cursor::new(bytes), &CodecOptions::default()).unwrap();
        assert_eq!(batch.report.imported, 2);
        assert_eq!(batch.report.skipped, 1);
        assert_eq!(batch.report.lines_processed, 3);
        assert_eq!(
            batch.report.issues,
            vec![LineIssue::Skipped(MalformedRecord::InvalidEncoding { line: 2 })]
        );

        let names: Vec<&str> = batch.records.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Amy", "Cal"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = "# header\r\n Amy ,25,Female,V1,General,true\r\n\r\nBob,30,Male,V2,General,false";
        let batch = read_records(Cursor::new(text), &CodecOptions::default()).unwrap();
        assert_eq!(batch.report.imported, 2);
        assert_eq!(batch.report.lines_processed, 4);
        assert!(batch.report.issues.is_empty());
        assert_eq!(batch.records[0].name, " Amy ");
        assert!(batch.records[0].has_season_pass);
        assert_eq!(batch.records[1].ticket_type, "General");
    }

    #[test]
    fn test_import_is_additive() {
        let mut history = HistoryLog::new();
        history
            .append(VisitorRecord::new("Existing", 50, "Male", "V0", "General", false))
            .unwrap();

        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "Amy,25,Female,V1,General,false\n").unwrap();

        let report = import_history(&mut history, file.path(), &CodecOptions::default()).unwrap();
        assert_eq!(report.imported, 1);
        assert_eq!(history.count(), 2);
        assert_eq!(history.as_slice()[0].name, "Existing");
        assert_eq!(history.as_slice()[1].name, "Amy");
    }

    #[test]
    fn test_missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = HistoryLog::new();
        let result =
            import_history(&mut history, dir.path().join("missing.csv"), &CodecOptions::default());
        assert!(matches!(
            result,
            Err(RideError::FileAccess { kind: crate::ride::error::FileAccessKind::NotFound, .. })
        ));
        assert!(history.is_empty());
    }
}
