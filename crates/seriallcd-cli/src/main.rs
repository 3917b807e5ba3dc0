//! Serial LCD Control Tool
//!
//! CLI for driving a Parallax-style serial character LCD.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use seriallcd_hw::protocol::parse_hex_bytes;
use seriallcd_hw::{Display, DisplayOptions, SerialTransport, Transport, CLEAR_SETTLE_TIME};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use config::Config;

/// Text shown by the `hello` command.
const HELLO_TEXT: &str = "Hello from seriallcd!";

#[derive(Parser)]
#[command(name = "seriallcdctl")]
#[command(about = "Control tool for serial character LCDs")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serial port path (overrides the configuration file)
    #[arg(short, long)]
    port: Option<String>,

    /// Baud rate (overrides the configuration file)
    #[arg(short, long)]
    baud: Option<u32>,

    /// Don't warn about baud rates the display doesn't support
    #[arg(long)]
    ignore_bad_baud: bool,

    /// Print the encoded bytes instead of sending them
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Switch {
    On,
    Off,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Direction {
    Left,
    Right,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Print text at the cursor
    Print {
        /// Text to print
        text: String,

        /// Follow the text with a carriage return
        #[arg(short, long)]
        newline: bool,
    },
    /// Clear the display
    Clear,
    /// Turn the backlight on or off
    Backlight {
        /// on or off
        #[arg(value_enum)]
        state: Switch,
    },
    /// Set cursor and blink mode
    Mode {
        /// Show the cursor
        #[arg(long)]
        cursor: bool,

        /// Blink the character at the cursor
        #[arg(long)]
        blink: bool,
    },
    /// Move the cursor to a zero-based row and column
    Move { row: u8, col: u8 },
    /// Move the cursor one position
    Cursor {
        #[arg(value_enum)]
        direction: Direction,
    },
    /// Move the cursor down one line
    LineFeed,
    /// Move the cursor to the start of the next line
    CarriageReturn,
    /// Send raw command bytes
    Raw {
        /// Hex bytes (e.g. 0C 0x80)
        #[arg(required = true)]
        bytes: Vec<String>,
    },
    /// Turn on the backlight and print a greeting
    Hello,
    /// Write a default configuration file
    InitConfig {
        /// Output file path
        #[arg(default_value = "seriallcd.toml")]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::InitConfig { path } = &cli.command {
        Config::default().save(path)?;
        println!("Configuration written to: {}", path.display());
        return Ok(());
    }

    let config = load_config(&cli)?;
    let options = DisplayOptions {
        ignore_bad_baud: config.serial.ignore_bad_baud,
    };

    if cli.dry_run {
        let mut display = Display::with_options(Vec::new(), options);
        run(&cli.command, &mut display)?;
        println!("{}", format_hex(display.transport()));
        return Ok(());
    }

    let port = SerialTransport::open(&config.serial.device, config.serial.baud)
        .with_context(|| format!("Failed to open serial port {}", config.serial.device))?;
    let mut display = Display::with_options(port, options);
    run(&cli.command, &mut display)
        .with_context(|| format!("Failed to write to {}", config.serial.device))
}

/// Reads the configuration file, if any, and applies command-line overrides.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(port) = &cli.port {
        config.serial.device = port.clone();
    }
    if let Some(baud) = cli.baud {
        config.serial.baud = baud;
    }
    if cli.ignore_bad_baud {
        config.serial.ignore_bad_baud = true;
    }

    debug!("Using serial configuration: {:?}", config.serial);
    Ok(config)
}

/// Issues a single command to the display.
fn run<T: Transport>(command: &Commands, display: &mut Display<T>) -> Result<()> {
    match command {
        Commands::Print { text, newline } => {
            if *newline {
                display.println(text)?;
            } else {
                display.print(text)?;
            }
        }
        Commands::Clear => {
            display.clear()?;
            std::thread::sleep(CLEAR_SETTLE_TIME);
        }
        Commands::Backlight { state } => display.set_backlight(*state == Switch::On)?,
        Commands::Mode { cursor, blink } => display.set_mode(*cursor, *blink)?,
        Commands::Move { row, col } => display.move_cursor(*row, *col)?,
        Commands::Cursor { direction } => match direction {
            Direction::Left => display.cursor_left()?,
            Direction::Right => display.cursor_right()?,
        },
        Commands::LineFeed => display.line_feed()?,
        Commands::CarriageReturn => display.carriage_return()?,
        Commands::Raw { bytes } => {
            let data = parse_hex_bytes(bytes)?;
            display.write(&data)?;
        }
        Commands::Hello => {
            display.set_backlight(true)?;
            display.clear()?;
            std::thread::sleep(CLEAR_SETTLE_TIME);
            display.print(HELLO_TEXT)?;
        }
        Commands::InitConfig { .. } => {}
    }
    Ok(())
}

/// Formats bytes as space-separated hex.
fn format_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
