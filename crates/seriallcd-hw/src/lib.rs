//! Serial LCD Hardware Library
//!
//! Encodes high-level display operations (text, cursor movement, backlight,
//! clear) into the single-byte commands understood by Parallax 2x16 and 4x20
//! serial character LCDs, and writes them over a serial transport.

pub mod display;
pub mod error;
pub mod protocol;
pub mod transport;

pub use display::{check_baud_rate, Display, DisplayOptions, UnsupportedBaudRate};
pub use error::{Error, Result};
pub use protocol::{Command, CLEAR_SETTLE_TIME, DEFAULT_BAUD_RATE, SUPPORTED_BAUD_RATES};
pub use transport::{SerialTransport, Transport};
