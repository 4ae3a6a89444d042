//! Byte transport abstraction
//!
//! The protocol session talks to the motion controller through this trait so
//! the core can run against real serial hardware, a mock in tests, or nothing
//! at all. Reads are non-blocking polls: each call returns whatever bytes are
//! currently available, possibly none.

use millstream_core::Result;

/// Raw byte transport to the motion controller
pub trait Transport: Send {
    /// Open the underlying link
    fn connect(&mut self) -> Result<()>;

    /// Close the underlying link
    fn disconnect(&mut self) -> Result<()>;

    /// Check if the link is open
    fn is_connected(&self) -> bool;

    /// Write raw bytes, returning the number written
    fn send(&mut self, data: &[u8]) -> Result<usize>;

    /// Drain currently available bytes without blocking
    ///
    /// Returns an empty vector when no data is pending.
    fn receive(&mut self) -> Result<Vec<u8>>;

    /// Flush any buffered outbound bytes to the device
    fn flush(&mut self) -> Result<()>;
}

/// Transport that accepts everything and produces nothing
///
/// Useful as a placeholder before a real port is configured.
#[derive(Debug, Default)]
pub struct NoOpTransport {
    connected: bool,
}

impl NoOpTransport {
    /// Create a new no-op transport
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for NoOpTransport {
    fn connect(&mut self) -> Result<()> {
        self.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) -> Result<()> {
        self.connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn send(&mut self, data: &[u8]) -> Result<usize> {
        Ok(data.len())
    }

    fn receive(&mut self) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
