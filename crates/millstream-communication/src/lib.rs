//! # millstream-communication
//!
//! The GRBL protocol core: byte transport abstraction, serial port
//! implementation, response framing, status report parsing and the
//! one-command-in-flight protocol session.

pub mod error_decoder;
pub mod framer;
pub mod serial;
pub mod session;
pub mod status;
pub mod transport;

pub use framer::ResponseFramer;
pub use serial::{list_ports, SerialPortInfo, SerialTransport};
pub use session::{GrblSession, HOLD, QUERY, RESUME, SOFT_RESET};
pub use transport::{NoOpTransport, Transport};
