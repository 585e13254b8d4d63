//! # Byte Source
//!
//! The abstract, possibly-blocking, not-restartable byte source the Frame
//! Scanner reads from. Implemented here for stdin and a regular file; the
//! `serial` feature adds a blocking serial character device implementation.
//! All three are the same trait object from the pipeline's point of view,
//! which is what lets the binary treat a live HAN port and a captured hex
//! dump as interchangeable inputs (see SPEC_FULL.md §10.7).

use std::fs::File;
use std::io::{self, Read, Stdin};

/// A blocking source of octets. `read(buf)` returns the number of bytes
/// placed into `buf`; `0` signals end of stream. Implementations may block
/// indefinitely inside a single call.
pub trait ByteSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Reads exactly one octet, or `None` on clean EOF.
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        match self.read(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }

    /// Reads exactly `n` octets, or `Ok(None)` if the stream ends before
    /// `n` bytes are available (a short read).
    fn read_exact_or_eof(&mut self, n: usize) -> io::Result<Option<Vec<u8>>> {
        let mut out = Vec::with_capacity(n);
        while out.len() < n {
            let mut chunk = vec![0u8; n - out.len()];
            let read = self.read(&mut chunk)?;
            if read == 0 {
                return Ok(None);
            }
            out.extend_from_slice(&chunk[..read]);
        }
        Ok(Some(out))
    }
}

/// Reads from the process's standard input.
pub struct StdinSource(Stdin);

impl StdinSource {
    pub fn new() -> Self {
        Self(io::stdin())
    }
}

impl Default for StdinSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteSource for StdinSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}

/// Reads from a regular file (a captured frame dump, for offline replay).
pub struct FileSource(File);

impl FileSource {
    pub fn open(path: &std::path::Path) -> io::Result<Self> {
        Ok(Self(File::open(path)?))
    }
}

impl ByteSource for FileSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}


#[cfg(feature = "serial")]
pub mod serial {
    //! Blocking serial character device byte source for the live HAN port.
    //!
    //! Opening and configuring the device (baud, parity) is the one piece
    //! of this module that the distilled spec treats as an external
    //! collaborator; this is the minimal real implementation behind that
    //! interface, not a re-creation of a full device-configuration tool.

    use super::ByteSource;
    use std::io;
    use std::time::Duration;

    /// Electricity meter HAN ports run at 2400 baud, 8 data bits, even
    /// parity, 1 stop bit (8E1).
    pub const HAN_BAUD_RATE: u32 = 2400;

    pub struct SerialSource {
        port: Box<dyn serialport::SerialPort>,
    }

    impl SerialSource {
        pub fn open(path: &str, baud_rate: u32) -> io::Result<Self> {
            let port = serialport::new(path, baud_rate)
                .data_bits(serialport::DataBits::Eight)
                .parity(serialport::Parity::Even)
                .stop_bits(serialport::StopBits::One)
                .timeout(Duration::from_secs(5))
                .open()
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            Ok(Self { port })
        }
    }

    impl ByteSource for SerialSource {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            // A read timeout on a quiet HAN port is not end-of-stream (0
            // bytes read means EOF per the ByteSource contract); retry
            // until data arrives or a real I/O error occurs.
            loop {
                match self.port.read(buf) {
                    Ok(n) => return Ok(n),
                    Err(e) if e.kind() == io::ErrorKind::TimedOut => continue,
                    Err(e) => return Err(e),
                }
            }
        }
    }
}

#[cfg(feature = "serial")]
pub use serial::SerialSource;
