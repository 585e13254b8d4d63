use anyhow::{Context, Result};
use clap::Parser;
use han_decode::emitter::WriterSink;
use han_decode::source::{ByteSource, FileSource, StdinSource};
use han_decode::{Decoder, ParseOptions, VendorMap};
use std::path::PathBuf;

/// Decode a HAN port byte stream into JSON documents, one per frame.
///
/// Reads from a file or serial device given as `input`, or from stdin when
/// omitted. Each well-formed, checksum-valid HDLC frame produces one JSON
/// document on stdout; malformed or checksum-failing frames are logged and
/// skipped, and scanning resumes at the next frame delimiter.
#[derive(Parser, Debug)]
#[command(name = "han-decode", version, about)]
struct Cli {
    /// Vendor/version register dictionary to interpret frames against.
    #[arg(long, value_enum)]
    vendor_map: VendorMap,

    /// Byte source: a captured frame dump, or `-`/omitted for stdin.
    input: Option<PathBuf>,

    /// Treat `input` as a serial character device at the HAN port's
    /// standard rate (2400 baud, 8E1) rather than a plain file.
    #[cfg(feature = "serial")]
    #[arg(long)]
    serial: bool,

    /// Baud rate to use when `--serial` is set.
    #[cfg(feature = "serial")]
    #[arg(long, default_value_t = han_decode::source::serial::HAN_BAUD_RATE)]
    baud_rate: u32,

    /// Emit one-line-per-frame JSON instead of pretty-printed.
    #[arg(long)]
    compact: bool,

    /// Emit a diagnostic trace to stderr (equivalent to `RUST_LOG=debug`).
    #[arg(long)]
    debug: bool,

    /// Suppress informational stderr output (equivalent to `RUST_LOG=error`).
    #[arg(long)]
    quiet: bool,

    /// Decode a frame despite a header or frame checksum mismatch, logging
    /// a warning instead of dropping it.
    #[arg(long)]
    ignore_checksum: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.debug {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    han_decode::logging::init_logger_with_default(default_filter);

    let decoder = Decoder::new(
        cli.vendor_map,
        ParseOptions {
            ignore_checksum: cli.ignore_checksum,
        },
    );

    let mut sink = WriterSink::new(std::io::stdout(), cli.compact);

    let mut source = open_source(&cli)?;
    decoder
        .run(source.as_mut(), &mut sink)
        .context("HAN decode pipeline failed")?;

    Ok(())
}

fn open_source(cli: &Cli) -> Result<Box<dyn ByteSource>> {
    #[cfg(feature = "serial")]
    if cli.serial {
        let path = cli
            .input
            .as_ref()
            .context("--serial requires an input device path")?;
        let source = han_decode::source::SerialSource::open(
            path.to_str().context("serial device path is not valid UTF-8")?,
            cli.baud_rate,
        )
        .with_context(|| format!("opening serial device {}", path.display()))?;
        return Ok(Box::new(source));
    }

    match &cli.input {
        None => Ok(Box::new(StdinSource::new())),
        Some(path) if path.as_os_str() == "-" => Ok(Box::new(StdinSource::new())),
        Some(path) => {
            let source = FileSource::open(path)
                .with_context(|| format!("opening input file {}", path.display()))?;
            Ok(Box::new(source))
        }
    }
}
