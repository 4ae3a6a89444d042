//! GRBL protocol session
//!
//! Owns the serial transport and the "at most one command in flight"
//! invariant: a plain line command may only be sent when no reply is
//! outstanding and no firmware error is latched. Hold and soft-reset are
//! fire-and-forget control bytes the firmware never acknowledges, so they
//! clear the awaiting flag immediately.
//!
//! The session is tick-driven: the host calls [`GrblSession::tick`] with an
//! elapsed-time delta at a bounded cadence. Each tick advances the 1-second
//! status-query timer and drains whatever bytes the transport has available
//! through the response framer. Completed frames are classified as status
//! reports (leading `<`), acknowledgements (trailing `ok`) or firmware
//! errors (leading `error`). A firmware error latches: it blocks further
//! transmission until explicitly cleared by [`GrblSession::restart`], a
//! resume, or a soft reset. Errors are never retried.

use crate::error_decoder::describe_error_frame;
use crate::framer::ResponseFramer;
use crate::status::{apply_report, is_status_report};
use crate::transport::Transport;
use millstream_core::{Error, MachineStatus, Result};

/// GRBL real-time status query
pub const QUERY: &str = "?";
/// GRBL real-time feed hold
pub const HOLD: &str = "!";
/// GRBL real-time cycle start / resume
pub const RESUME: &str = "~";
/// GRBL soft-reset control byte
pub const SOFT_RESET: char = '\u{12}';

/// Interval between automatic status queries
const QUERY_INTERVAL_MS: u64 = 1000;

/// Protocol session over a byte transport to a GRBL controller
pub struct GrblSession {
    transport: Box<dyn Transport>,
    framer: ResponseFramer,
    status: MachineStatus,
    awaiting_reply: bool,
    error: bool,
    error_message: String,
    query_timer_ms: u64,
    query_due: bool,
}

impl GrblSession {
    /// Create a session over the given transport
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            framer: ResponseFramer::new(),
            status: MachineStatus::default(),
            awaiting_reply: false,
            error: false,
            error_message: String::new(),
            query_timer_ms: 0,
            query_due: false,
        }
    }

    /// Open the underlying transport
    pub fn connect(&mut self) -> Result<()> {
        self.transport.connect()
    }

    /// Close the underlying transport
    pub fn disconnect(&mut self) -> Result<()> {
        self.transport.disconnect()
    }

    /// Check whether a line command may be sent right now
    ///
    /// True iff no reply is outstanding and no firmware error is latched.
    pub fn can_send(&self) -> bool {
        !self.awaiting_reply && !self.error
    }

    /// Send a G-code line command
    ///
    /// Fails with [`Error::SessionBusy`] unless [`GrblSession::can_send`]
    /// is true.
    pub fn send_command(&mut self, command: &str) -> Result<()> {
        if self.awaiting_reply {
            return Err(Error::busy("awaiting reply for previous command"));
        }
        if self.error {
            return Err(Error::busy("firmware error latched"));
        }
        self.transmit(command)
    }

    /// Send a status query; a reply is awaited like any other command
    pub fn send_query(&mut self) -> Result<()> {
        self.query_due = false;
        self.transmit(QUERY)
    }

    /// Send a feed hold; the firmware emits no acknowledgement for it
    pub fn send_hold(&mut self) -> Result<()> {
        self.transmit(HOLD)?;
        self.awaiting_reply = false;
        Ok(())
    }

    /// Send a cycle start / resume
    ///
    /// Permitted while an error is latched: resuming is one of the two
    /// operator paths that clear the error condition.
    pub fn send_resume(&mut self) -> Result<()> {
        self.transmit(RESUME)
    }

    /// Send a soft reset; the firmware emits no acknowledgement for it
    pub fn send_reset(&mut self) -> Result<()> {
        self.transmit(&SOFT_RESET.to_string())?;
        self.awaiting_reply = false;
        Ok(())
    }

    /// Clear the awaiting-reply flag and any latched error
    ///
    /// Recovery path for a latched error (or a reply that will never
    /// arrive) without a hardware reset. Idempotent.
    pub fn restart(&mut self) {
        self.awaiting_reply = false;
        self.error = false;
    }

    /// Advance the query timer and drain the transport
    ///
    /// `delta_ms` is externally supplied elapsed time, so the session is
    /// deterministic under test with a fake clock.
    pub fn tick(&mut self, delta_ms: u64) -> Result<()> {
        self.query_timer_ms += delta_ms;
        while self.query_timer_ms >= QUERY_INTERVAL_MS {
            self.query_timer_ms -= QUERY_INTERVAL_MS;
            self.query_due = true;
        }

        let chunk = self.transport.receive()?;
        if let Some(frame) = self.framer.push_chunk(&chunk) {
            self.handle_frame(&frame);
        }

        Ok(())
    }

    /// Check whether the periodic status query is due
    pub fn query_due(&self) -> bool {
        self.query_due
    }

    /// Send the periodic status query when due and the session is free
    ///
    /// Returns true when a query was transmitted this call.
    pub fn send_query_if_due(&mut self) -> Result<bool> {
        if self.query_due && self.can_send() {
            self.send_query()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Current machine status, by value
    pub fn status(&self) -> MachineStatus {
        self.status.clone()
    }

    /// Check whether a firmware error is latched
    pub fn is_error(&self) -> bool {
        self.error
    }

    /// The latched firmware error text, decoded for display
    pub fn last_command_error(&self) -> &str {
        &self.error_message
    }

    /// Transmit a command line followed by the newline terminator
    fn transmit(&mut self, command: &str) -> Result<()> {
        tracing::debug!(command = %command.escape_debug().to_string(), "Send");

        self.transport.send(command.as_bytes())?;
        self.transport.send(b"\n")?;
        self.transport.flush()?;

        self.awaiting_reply = true;
        self.error = false;
        self.error_message.clear();
        self.framer.clear();
        Ok(())
    }

    /// Classify a completed response frame
    fn handle_frame(&mut self, frame: &str) {
        if is_status_report(frame) {
            tracing::debug!(report = %frame, "Report");
            apply_report(frame, &mut self.status);
            self.awaiting_reply = false;
        } else if frame.ends_with("ok") {
            tracing::debug!(response = %frame, "Ack");
            self.awaiting_reply = false;
        } else if frame.starts_with("error") {
            let message = describe_error_frame(frame);
            tracing::error!(response = %message, "Firmware error");
            self.error_message = message;
            self.awaiting_reply = false;
            self.error = true;
        } else {
            tracing::debug!(response = %frame, "Unsupported response");
        }
    }
}
