//! Error types for the serial LCD hardware library.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to the display.
#[derive(Error, Debug)]
pub enum Error {
    /// Serial port not found at the given path.
    #[error("Serial port not found at {0}")]
    PortNotFound(String),

    /// Serial port could not be opened or configured.
    #[error("Serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),

    /// Transport write failed.
    #[error("Serial I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Cursor position does not fit in a single command byte.
    #[error("Cursor position out of range: row {row}, column {col}")]
    CursorOutOfRange { row: u8, col: u8 },

    /// Raw command byte could not be parsed as hex.
    #[error("Invalid hex byte: {0}")]
    InvalidHex(String),
}
