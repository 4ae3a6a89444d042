//! Serial port transport implementation
//!
//! Wraps the `serialport` crate behind the [`Transport`] trait for direct
//! hardware connection to a GRBL controller via USB or RS-232. Reads use a
//! very short timeout and report a timed-out read as "no data available" so
//! the tick loop never blocks on the port.

use crate::transport::Transport;
use millstream_core::{Error, Result};
use std::io::{Read, Write};
use std::time::Duration;

/// Information about an available serial port
#[derive(Debug, Clone)]
pub struct SerialPortInfo {
    /// Port name (e.g., "/dev/ttyUSB0", "COM3")
    pub port_name: String,
    /// Port description (e.g., "USB Serial Port")
    pub description: String,
    /// Manufacturer name if available
    pub manufacturer: Option<String>,
    /// USB vendor ID if applicable
    pub vid: Option<u16>,
    /// USB product ID if applicable
    pub pid: Option<u16>,
}

/// List available serial ports on the system
///
/// Filters the enumeration to port names that look like CNC controllers:
/// - Windows: COM*
/// - Linux: /dev/ttyUSB*, /dev/ttyACM*
/// - macOS: /dev/cu.usbserial-*, /dev/cu.usbmodem*
pub fn list_ports() -> Result<Vec<SerialPortInfo>> {
    match serialport::available_ports() {
        Ok(ports) => Ok(ports
            .iter()
            .filter(|port| is_cnc_port(&port.port_name))
            .map(|port| {
                let mut info = SerialPortInfo {
                    port_name: port.port_name.clone(),
                    description: "Serial port".to_string(),
                    manufacturer: None,
                    vid: None,
                    pid: None,
                };
                if let serialport::SerialPortType::UsbPort(usb) = &port.port_type {
                    info.description = usb
                        .product
                        .clone()
                        .unwrap_or_else(|| "USB serial device".to_string());
                    info.manufacturer = usb.manufacturer.clone();
                    info.vid = Some(usb.vid);
                    info.pid = Some(usb.pid);
                }
                info
            })
            .collect()),
        Err(e) => {
            tracing::error!("Failed to enumerate serial ports: {}", e);
            Err(Error::transport(format!("Failed to enumerate ports: {}", e)))
        }
    }
}

fn is_cnc_port(name: &str) -> bool {
    name.starts_with("COM")
        || name.starts_with("/dev/ttyUSB")
        || name.starts_with("/dev/ttyACM")
        || name.starts_with("/dev/cu.usbserial")
        || name.starts_with("/dev/cu.usbmodem")
}

/// Default read timeout; short enough that a read behaves like a poll
const DEFAULT_TIMEOUT_MS: u64 = 10;

/// Serial transport over a hardware port
pub struct SerialTransport {
    port_name: String,
    baud_rate: u32,
    timeout_ms: u64,
    port: Option<Box<dyn serialport::SerialPort>>,
}

impl SerialTransport {
    /// Create a transport for the given port and baud rate (not yet open)
    pub fn new(port_name: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            port_name: port_name.into(),
            baud_rate,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            port: None,
        }
    }

    /// Override the read timeout (clamped to at least 1 ms)
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms.max(1);
        self
    }

    /// The configured port name
    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// The configured read timeout in milliseconds
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }
}

impl Transport for SerialTransport {
    fn connect(&mut self) -> Result<()> {
        let port = serialport::new(&self.port_name, self.baud_rate)
            .timeout(Duration::from_millis(self.timeout_ms))
            .open()
            .map_err(|e| {
                Error::transport(format!("Failed to open {}: {}", self.port_name, e))
            })?;

        tracing::info!(port = %self.port_name, baud = self.baud_rate, "Serial port opened");
        self.port = Some(port);
        Ok(())
    }

    fn disconnect(&mut self) -> Result<()> {
        if self.port.take().is_some() {
            tracing::info!(port = %self.port_name, "Serial port closed");
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.port.is_some()
    }

    fn send(&mut self, data: &[u8]) -> Result<usize> {
        let port = self.port.as_mut().ok_or(Error::NotConnected)?;
        let written = port
            .write(data)
            .map_err(|e| Error::transport(format!("Write failed: {}", e)))?;
        Ok(written)
    }

    fn receive(&mut self) -> Result<Vec<u8>> {
        let port = self.port.as_mut().ok_or(Error::NotConnected)?;

        let available = port
            .bytes_to_read()
            .map_err(|e| Error::transport(format!("Poll failed: {}", e)))?;
        if available == 0 {
            return Ok(Vec::new());
        }

        let mut buf = vec![0u8; available as usize];
        match port.read(&mut buf) {
            Ok(n) => {
                buf.truncate(n);
                Ok(buf)
            }
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(Vec::new()),
            Err(e) => Err(Error::transport(format!("Read failed: {}", e))),
        }
    }

    fn flush(&mut self) -> Result<()> {
        let port = self.port.as_mut().ok_or(Error::NotConnected)?;
        port.flush()
            .map_err(|e| Error::transport(format!("Flush failed: {}", e)))
    }
}
