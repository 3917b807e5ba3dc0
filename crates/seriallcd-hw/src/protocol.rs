//! Serial LCD command bytes and encoding.
//!
//! Protocol structure:
//! - Printable text is sent as raw UTF-8
//! - Control commands are single bytes below 0x20
//! - Cursor positioning is a single byte: 0x80 + row * 20 + column

use crate::{Error, Result};
use std::time::Duration;

/// Baud rates the display firmware recognizes.
pub const SUPPORTED_BAUD_RATES: [u32; 3] = [2400, 9600, 19200];

/// Baud rate used when none is configured.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Base byte for cursor positioning commands.
pub const CURSOR_BASE: u8 = 0x80;

/// Address distance between consecutive rows (20 columns per row).
pub const ROW_STRIDE: u16 = 0x14;

/// Minimum pause after a form feed before the display accepts more input.
pub const CLEAR_SETTLE_TIME: Duration = Duration::from_millis(5);

/// Display command bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    /// Move the cursor one position left.
    CursorLeft = 0x08,
    /// Move the cursor one position right.
    CursorRight = 0x09,
    /// Move the cursor down one line.
    LineFeed = 0x0A,
    /// Clear the display and home the cursor.
    FormFeed = 0x0C,
    /// Move the cursor to the start of the next line.
    CarriageReturn = 0x0D,
    /// Backlight on.
    BacklightOn = 0x11,
    /// Backlight off.
    BacklightOff = 0x12,
    /// Display on, cursor off, no blink.
    ModePlain = 0x16,
    /// Display on, cursor off, character blink.
    ModeBlink = 0x17,
    /// Display on, cursor on, no blink.
    ModeCursor = 0x18,
    /// Display on, cursor on, character blink.
    ModeCursorBlink = 0x19,
}

impl Command {
    /// Returns the display mode command for a cursor/blink combination.
    pub fn mode(cursor: bool, blink: bool) -> Self {
        match (cursor, blink) {
            (true, true) => Command::ModeCursorBlink,
            (true, false) => Command::ModeCursor,
            (false, true) => Command::ModeBlink,
            (false, false) => Command::ModePlain,
        }
    }

    /// Returns the backlight command.
    pub fn backlight(on: bool) -> Self {
        if on {
            Command::BacklightOn
        } else {
            Command::BacklightOff
        }
    }

    /// Returns the wire byte.
    pub fn byte(self) -> u8 {
        self as u8
    }
}

/// Encodes a cursor position command.
///
/// Returns `None` when `0x80 + row * 20 + col` does not fit in a byte.
pub fn cursor_position(row: u8, col: u8) -> Option<u8> {
    let offset = u16::from(row) * ROW_STRIDE + u16::from(col);
    u8::try_from(u16::from(CURSOR_BASE) + offset).ok()
}

/// Returns true if the display firmware understands this baud rate.
pub fn is_supported_baud_rate(rate: u32) -> bool {
    SUPPORTED_BAUD_RATES.contains(&rate)
}

/// Parses hex byte tokens such as `0C`, `0x80` or `d`.
pub fn parse_hex_bytes<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<u8>> {
    tokens
        .iter()
        .map(|token| {
            let token = token.as_ref().trim();
            let digits = token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .unwrap_or(token);
            u8::from_str_radix(digits, 16).map_err(|_| Error::InvalidHex(token.to_string()))
        })
        .collect()
}
