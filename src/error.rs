//! Error types for the console.

use std::fmt;

/// Errors surfaced to the host.
///
/// Only integration bugs and bad configuration are reported here. A backlog
/// that misses its reveal window, a degenerate reveal rate and off-grid writes
/// are all absorbed by the console itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConsoleError {
    /// The console was used after [`release`](crate::TypewriterConsole::release).
    NotInitialized,
    /// The grid must have at least one row and one column.
    InvalidGrid {
        /// Requested row count.
        rows: u16,
        /// Requested column count.
        cols: u16,
    },
    /// A timing value was negative, NaN or infinite.
    InvalidTiming {
        /// Name of the offending config field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// The console was called back into while one of its own ticks was running.
    Reentrant,
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "console used before initialize or after release"),
            Self::InvalidGrid { rows, cols } => {
                write!(f, "invalid grid {rows}x{cols} (rows and cols must be non-zero)")
            }
            Self::InvalidTiming { field, value } => {
                write!(f, "invalid {field}: {value} (must be finite and non-negative)")
            }
            Self::Reentrant => write!(f, "console re-entered during its own tick"),
        }
    }
}

impl std::error::Error for ConsoleError {}
