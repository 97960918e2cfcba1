//! Export of the ride history to a delimited text file

use crate::codec::format::{
    check_encodable, encode_record, format_comment, CodecOptions, COMMENT_PREFIX,
};
use crate::ride::error::{RideError, RideResult};
use crate::ride::history::HistoryLog;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Number of comment lines written before the records
pub const HEADER_LINES: usize = 3;

/// Outcome of a successful export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    /// File written
    pub path: PathBuf,
    /// Visitor records written
    pub records_written: usize,
    /// All lines written, header comments included
    pub lines_written: usize,
}

/// Write the export header and one line per visitor to `writer`
///
/// Returns the number of records written.
pub fn write_history<W: Write>(
    writer: &mut W,
    history: &HistoryLog,
    ride_name: &str,
    exported_at: DateTime<Utc>,
    options: &CodecOptions,
) -> io::Result<usize> {
    writeln!(writer, "{} Ride History Export for: {}", COMMENT_PREFIX, ride_name)?;
    writeln!(
        writer,
        "{} Export Date: {}",
        COMMENT_PREFIX,
        exported_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(writer, "{}", format_comment(options))?;

    let mut records = 0;
    for visitor in history {
        writeln!(writer, "{}", encode_record(visitor, options))?;
        records += 1;
    }
    Ok(records)
}

/// Export the history to `path`, replacing any existing file
///
/// Every record is checked with [`check_encodable`] before the file is
/// opened; a record that would not read back refuses the whole export with
/// `InvalidInput` and leaves any existing file alone. File-level failures are
/// returned as `FileAccess` errors. A failure part way through can leave a
/// partially written file behind.
#[instrument(skip_all, fields(ride = ride_name, path = %path.as_ref().display(), records = history.count()))]
pub fn export_history(
    history: &HistoryLog,
    ride_name: &str,
    path: impl AsRef<Path>,
    options: &CodecOptions,
) -> RideResult<ExportReport> {
    let path = path.as_ref();
    let to_error = |source: io::Error| {
        warn!(error = %source, "Ride history export failed");
        RideError::file_access(path, source)
    };

    for visitor in history {
        check_encodable(visitor).map_err(|error| {
            warn!(error = %error, "Ride history export refused");
            error
        })?;
    }

    let file = File::create(path).map_err(to_error)?;
    let mut writer = BufWriter::new(file);
    let records_written = write_history(&mut writer, history, ride_name, Utc::now(), options)
        .map_err(to_error)?;
    writer.flush().map_err(to_error)?;

    info!(records = records_written, "Ride history exported to {}", path.display());
    Ok(ExportReport {
        path: path.to_path_buf(),
        records_written,
        lines_written: records_written + HEADER_LINES,
    })
}
