//! Error handling for millstream
//!
//! Provides error types for all layers of the application:
//! - Transport errors (serial link, connection state)
//! - Session errors (protocol state machine violations)
//! - Source errors (G-code file access)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Top-level error type for millstream
#[derive(Error, Debug)]
pub enum Error {
    /// Serial link or connection failure
    #[error("Transport error: {message}")]
    Transport {
        /// A message describing the transport failure.
        message: String,
    },

    /// Transport is not connected
    #[error("Transport not connected")]
    NotConnected,

    /// A line command was attempted while the session cannot send
    #[error("Session busy: {reason}")]
    SessionBusy {
        /// Why the session refused the command.
        reason: String,
    },

    /// G-code source could not be read
    #[error("Source error: {message}")]
    Source {
        /// A message describing the source failure.
        message: String,
    },

    /// Underlying I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be read or written
    #[error("Settings error: {message}")]
    Settings {
        /// A message describing the settings failure.
        message: String,
    },

    /// Any other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a transport error from any displayable value
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a session-busy error
    pub fn busy(reason: impl Into<String>) -> Self {
        Self::SessionBusy {
            reason: reason.into(),
        }
    }

    /// Create a source error
    pub fn source(message: impl Into<String>) -> Self {
        Self::Source {
            message: message.into(),
        }
    }

    /// Create a settings error
    pub fn settings(message: impl Into<String>) -> Self {
        Self::Settings {
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

/// Result type alias used throughout millstream
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::transport("port vanished");
        assert_eq!(err.to_string(), "Transport error: port vanished");

        let err = Error::busy("awaiting reply");
        assert_eq!(err.to_string(), "Session busy: awaiting reply");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "timeout");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
