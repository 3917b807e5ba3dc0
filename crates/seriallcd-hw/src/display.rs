//! Serial LCD display controller.

use crate::protocol::{self, Command};
use crate::transport::Transport;
use crate::{Error, Result};
use tracing::{debug, warn};

/// Display construction options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayOptions {
    /// Suppress the unsupported baud rate warning.
    pub ignore_bad_baud: bool,
}

/// Warning raised when the transport runs at a rate the display can't decode.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error(
    "serial baud rate {rate} is not supported by the display (use 2400, 9600 or 19200); \
     set ignore_bad_baud to silence this warning"
)]
pub struct UnsupportedBaudRate {
    /// The offending baud rate.
    pub rate: u32,
}

/// Decides whether a transport's baud rate deserves a warning.
///
/// Transports that don't report a rate are never warned about.
pub fn check_baud_rate(
    baud_rate: Option<u32>,
    options: &DisplayOptions,
) -> Option<UnsupportedBaudRate> {
    match baud_rate {
        Some(rate) if !options.ignore_bad_baud && !protocol::is_supported_baud_rate(rate) => {
            Some(UnsupportedBaudRate { rate })
        }
        _ => None,
    }
}

/// Serial LCD controller.
///
/// Holds no display state; every call writes its bytes to the transport
/// before returning.
pub struct Display<T: Transport> {
    transport: T,
    options: DisplayOptions,
}

impl<T: Transport> Display<T> {
    /// Creates a controller with default options.
    pub fn new(transport: T) -> Self {
        Self::with_options(transport, DisplayOptions::default())
    }

    /// Creates a controller, warning if the transport's baud rate is unsupported.
    pub fn with_options(transport: T, options: DisplayOptions) -> Self {
        if let Some(warning) = check_baud_rate(transport.baud_rate(), &options) {
            warn!("{}", warning);
        }

        Self { transport, options }
    }

    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        debug!("Sending to display: {:02X?}", bytes);
        self.transport.write(bytes)?;
        Ok(())
    }

    fn command(&mut self, command: Command) -> Result<()> {
        self.send(&[command.byte()])
    }

    /// Prints text at the cursor.
    pub fn print(&mut self, text: &str) -> Result<()> {
        self.send(text.as_bytes())
    }

    /// Prints text followed by a carriage return.
    pub fn println(&mut self, text: &str) -> Result<()> {
        self.print(text)?;
        self.carriage_return()
    }

    /// Sends raw bytes unmodified.
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        self.send(data)
    }

    /// Moves the cursor one position left.
    pub fn cursor_left(&mut self) -> Result<()> {
        self.command(Command::CursorLeft)
    }

    /// Moves the cursor one position right.
    pub fn cursor_right(&mut self) -> Result<()> {
        self.command(Command::CursorRight)
    }

    /// Moves the cursor down one line.
    pub fn line_feed(&mut self) -> Result<()> {
        self.command(Command::LineFeed)
    }

    /// Clears the display.
    ///
    /// The display ignores input for [`protocol::CLEAR_SETTLE_TIME`] afterwards;
    /// waiting is up to the caller.
    pub fn form_feed(&mut self) -> Result<()> {
        self.command(Command::FormFeed)
    }

    /// Alias for [`Display::form_feed`].
    pub fn clear(&mut self) -> Result<()> {
        self.form_feed()
    }

    /// Returns the cursor to the start of the next line.
    pub fn carriage_return(&mut self) -> Result<()> {
        self.command(Command::CarriageReturn)
    }

    /// Alias for [`Display::carriage_return`].
    pub fn new_line(&mut self) -> Result<()> {
        self.carriage_return()
    }

    /// Sets cursor visibility and character blink.
    pub fn set_mode(&mut self, cursor: bool, blink: bool) -> Result<()> {
        self.command(Command::mode(cursor, blink))
    }

    /// Turns the backlight on or off.
    pub fn set_backlight(&mut self, on: bool) -> Result<()> {
        self.command(Command::backlight(on))
    }

    /// Moves the cursor to a zero-based row and column.
    ///
    /// Positions that don't encode into a single byte are rejected without
    /// writing anything.
    pub fn move_cursor(&mut self, row: u8, col: u8) -> Result<()> {
        let byte =
            protocol::cursor_position(row, col).ok_or(Error::CursorOutOfRange { row, col })?;
        self.send(&[byte])
    }

    /// Returns the options the controller was built with.
    pub fn options(&self) -> &DisplayOptions {
        &self.options
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Consumes the controller, returning the transport.
    pub fn into_inner(self) -> T {
        self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    /// Transport reporting a fixed baud rate.
    struct BaudTransport {
        baud: u32,
        sent: Vec<u8>,
    }

    impl Transport for BaudTransport {
        fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
            self.sent.extend_from_slice(bytes);
            Ok(())
        }

        fn baud_rate(&self) -> Option<u32> {
            Some(self.baud)
        }
    }

    /// Transport whose every write fails.
    struct FaultyTransport;

    impl Transport for FaultyTransport {
        fn write(&mut self, _bytes: &[u8]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "line disconnected"))
        }
    }

    fn sent(op: impl FnOnce(&mut Display<Vec<u8>>) -> Result<()>) -> Vec<u8> {
        let mut display = Display::new(Vec::new());
        op(&mut display).unwrap();
        display.into_inner()
    }

    #[test]
    fn test_set_mode() {
        assert_eq!(sent(|d| d.set_mode(true, true)), vec![0x19]);
        assert_eq!(sent(|d| d.set_mode(true, false)), vec![0x18]);
        assert_eq!(sent(|d| d.set_mode(false, true)), vec![0x17]);
        assert_eq!(sent(|d| d.set_mode(false, false)), vec![0x16]);
    }

    #[test]
    fn test_set_backlight() {
        assert_eq!(sent(|d| d.set_backlight(true)), vec![0x11]);
        assert_eq!(sent(|d| d.set_backlight(false)), vec![0x12]);
    }

    #[test]
    fn test_cursor_commands() {
        assert_eq!(sent(|d| d.cursor_left()), vec![0x08]);
        assert_eq!(sent(|d| d.cursor_right()), vec![0x09]);
        assert_eq!(sent(|d| d.line_feed()), vec![0x0A]);
    }

    #[test]
    fn test_aliases() {
        assert_eq!(sent(|d| d.clear()), vec![0x0C]);
        assert_eq!(sent(|d| d.clear()), sent(|d| d.form_feed()));
        assert_eq!(sent(|d| d.new_line()), vec![0x0D]);
        assert_eq!(sent(|d| d.new_line()), sent(|d| d.carriage_return()));
    }

    #[test]
    fn test_move_cursor() {
        for row in 0u8..=6 {
            for col in 0u8..=0x7F {
                let offset = u16::from(row) * 0x14 + u16::from(col);
                if offset > 0x7F {
                    continue;
                }
                assert_eq!(
                    sent(|d| d.move_cursor(row, col)),
                    vec![0x80 + offset as u8],
                    "row {} col {}",
                    row,
                    col
                );
            }
        }
    }

    #[test]
    fn test_move_cursor_out_of_range() {
        let mut display = Display::new(Vec::new());
        let result = display.move_cursor(7, 0);
        assert!(matches!(
            result,
            Err(Error::CursorOutOfRange { row: 7, col: 0 })
        ));
        assert!(display.transport().is_empty());
    }

    #[test]
    fn test_print() {
        assert_eq!(sent(|d| d.print("Hello")), b"Hello");
        assert_eq!(sent(|d| d.print("°C")), "°C".as_bytes());
        assert!(sent(|d| d.print("")).is_empty());
    }

    #[test]
    fn test_println() {
        assert_eq!(sent(|d| d.println("hi")), b"hi\x0D");
        assert_eq!(sent(|d| d.println("")), vec![0x0D]);
    }

    #[test]
    fn test_write_raw() {
        assert_eq!(sent(|d| d.write(&[0x0C, 0x80, 0xFF])), vec![0x0C, 0x80, 0xFF]);
    }

    #[test]
    fn test_calls_accumulate_in_order() {
        let bytes = sent(|d| {
            d.set_backlight(true)?;
            d.clear()?;
            d.move_cursor(1, 2)?;
            d.print("ok")
        });
        assert_eq!(bytes, vec![0x11, 0x0C, 0x96, b'o', b'k']);
    }

    #[test]
    fn test_borrowed_transport() {
        let mut sink: Vec<u8> = Vec::new();
        {
            let mut display = Display::new(&mut sink);
            display.println("a").unwrap();
        }
        assert_eq!(sink, b"a\r");
    }

    #[test]
    fn test_no_baud_rate_no_warning() {
        let options = DisplayOptions::default();
        assert_eq!(check_baud_rate(None, &options), None);

        let display = Display::with_options(Vec::new(), options);
        assert_eq!(display.options(), &options);
    }

    #[test]
    fn test_supported_baud_rates_no_warning() {
        let options = DisplayOptions::default();
        for rate in [2400, 9600, 19200] {
            assert_eq!(check_baud_rate(Some(rate), &options), None);
        }
    }

    #[test]
    fn test_unsupported_baud_rate_warning() {
        let warning = check_baud_rate(Some(57600), &DisplayOptions::default());
        assert_eq!(warning, Some(UnsupportedBaudRate { rate: 57600 }));

        let message = warning.unwrap().to_string();
        assert!(message.contains("57600"));
        assert!(message.contains("ignore_bad_baud"));
    }

    #[test]
    fn test_ignore_bad_baud() {
        let options = DisplayOptions {
            ignore_bad_baud: true,
        };
        assert_eq!(check_baud_rate(Some(57600), &options), None);
    }

    #[test]
    fn test_construction_with_bad_baud_succeeds() {
        let transport = BaudTransport {
            baud: 57600,
            sent: Vec::new(),
        };
        let mut display = Display::new(transport);
        display.print("still works").unwrap();
        assert_eq!(display.transport().baud_rate(), Some(57600));
        assert_eq!(display.into_inner().sent, b"still works");
    }

    #[test]
    fn test_write_errors_propagate() {
        type Op = fn(&mut Display<FaultyTransport>) -> Result<()>;
        let ops: [(&str, Op); 13] = [
            ("print", |d| d.print("x")),
            ("println", |d| d.println("x")),
            ("write", |d| d.write(&[0x01])),
            ("cursor_left", |d| d.cursor_left()),
            ("cursor_right", |d| d.cursor_right()),
            ("line_feed", |d| d.line_feed()),
            ("form_feed", |d| d.form_feed()),
            ("clear", |d| d.clear()),
            ("carriage_return", |d| d.carriage_return()),
            ("new_line", |d| d.new_line()),
            ("set_mode", |d| d.set_mode(true, false)),
            ("set_backlight", |d| d.set_backlight(true)),
            ("move_cursor", |d| d.move_cursor(0, 0)),
        ];

        for (name, op) in ops {
            let mut display = Display::new(FaultyTransport);
            match op(&mut display) {
                Err(Error::Io(e)) => {
                    assert_eq!(e.kind(), io::ErrorKind::BrokenPipe, "{}", name);
                    assert_eq!(e.to_string(), "line disconnected", "{}", name);
                }
                other => panic!("{} did not propagate the write error: {:?}", name, other),
            }
        }
    }
}
