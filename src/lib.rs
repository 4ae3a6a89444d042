//! # millstream
//!
//! Host-side controller for GRBL-driven CNC milling machines. Streams a
//! G-code program over a serial link one command at a time, tracks machine
//! state from periodic status reports, and sequences the job under operator
//! control (start/pause/resume/stop).
//!
//! ## Architecture
//!
//! millstream is organized as a workspace:
//!
//! 1. **millstream-core** - shared machine status model and error types
//! 2. **millstream-communication** - serial transport, response framing,
//!    status parsing and the GRBL protocol session
//! 3. **millstream-control** - G-code sources, operator input and the
//!    milling sequencer state machine
//! 4. **millstream-settings** - configuration persistence
//! 5. **millstream** - the binary tying it all together

pub use millstream_communication::{
    list_ports, GrblSession, NoOpTransport, ResponseFramer, SerialPortInfo, SerialTransport,
    Transport,
};
pub use millstream_control::{
    is_executable_line, FileSource, GcodeSource, JobSnapshot, KeyQueue, MillingSequencer,
    NoOpPresenter, OperatorInput, OperatorKey, Presenter, SequencerState, StringSource,
    UpdateOutcome,
};
pub use millstream_core::{Error, MachineStatus, Result};
pub use millstream_settings::Settings;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Structured console logging on stderr with `RUST_LOG` environment
/// variable support. Stdout is left to the status display.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
