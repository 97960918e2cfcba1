//! Error types and handling
//!
//! This module contains the error taxonomy for ride operations. Every
//! condition here is recovered locally: the failing operation reports it and
//! leaves the queue, history and cycle counter untouched.

use crate::codec::MalformedRecord;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Classification of file-level failures during export or import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAccessKind {
    /// The file or one of its parent directories does not exist
    NotFound,
    /// The process lacks permission to open the file
    PermissionDenied,
    /// Any other I/O failure while opening, reading or writing
    Io,
}

impl From<io::ErrorKind> for FileAccessKind {
    fn from(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => FileAccessKind::NotFound,
            io::ErrorKind::PermissionDenied => FileAccessKind::PermissionDenied,
            _ => FileAccessKind::Io,
        }
    }
}

/// Errors that can occur during ride operations
#[derive(Debug, Error)]
pub enum RideError {
    /// A required record or argument was absent or out of range
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The admission queue has no waiting visitors
    #[error("The admission queue is empty")]
    EmptyQueue,

    /// The ride history has no records to work on
    #[error("The ride history is empty")]
    EmptyHistory,

    /// A cycle was requested for a ride without an operator
    #[error("Cannot run ride '{ride}': no operator assigned")]
    NoOperatorAssigned {
        /// Name of the ride
        ride: String,
    },

    /// A cycle was requested for a ride that is closed
    #[error("Cannot run ride '{ride}': ride is not operational")]
    RideNotOperational {
        /// Name of the ride
        ride: String,
    },

    /// A sort was requested without an ordering
    #[error("No comparator supplied for sorting the ride history")]
    InvalidComparator,

    /// The history file could not be opened, read or written
    #[error("File access error ({kind:?}) on {}: {source}", .path.display())]
    FileAccess {
        /// File that was being accessed
        path: PathBuf,
        /// Classified failure
        kind: FileAccessKind,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A single history line failed validation
    #[error("Malformed record: {0}")]
    MalformedRecord(#[from] MalformedRecord),
}

impl RideError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a file access error, classifying the I/O error kind
    pub fn file_access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileAccess { path: path.into(), kind: source.kind().into(), source }
    }

    /// Check if this is a recoverable error
    ///
    /// All ride errors leave state unchanged, so every one of them is
    /// recoverable by the caller.
    pub fn is_recoverable(&self) -> bool {
        match self {
            RideError::InvalidInput(_)
            | RideError::EmptyQueue
            | RideError::EmptyHistory
            | RideError::NoOperatorAssigned { .. }
            | RideError::RideNotOperational { .. }
            | RideError::InvalidComparator
            | RideError::FileAccess { .. }
            | RideError::MalformedRecord(_) => true,
        }
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            RideError::InvalidInput(_) => "Invalid Input",
            RideError::EmptyQueue => "Empty Queue",
            RideError::EmptyHistory => "Empty History",
            RideError::NoOperatorAssigned { .. } => "No Operator Assigned",
            RideError::RideNotOperational { .. } => "Ride Not Operational",
            RideError::InvalidComparator => "Invalid Comparator",
            RideError::FileAccess { .. } => "File Access",
            RideError::MalformedRecord(_) => "Malformed Record",
        }
    }
}

/// Result type for ride operations
pub type RideResult<T> = Result<T, RideError>;

/// How a problem in one imported field is recovered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryStrategy {
    /// Drop the whole line and continue with the next one
    Skip,
    /// Substitute a default value for the field and keep the line
    UseDefaults,
}
