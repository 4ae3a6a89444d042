//! Presentation contract
//!
//! The core never draws anything itself. Each tick it hands a
//! [`JobSnapshot`] value to a [`Presenter`]; what the presenter does with it
//! (OLED screen, terminal, web page) is outside the core.

use crate::sequencer::SequencerState;
use millstream_core::MachineStatus;
use serde::Serialize;

/// Everything a presenter needs to render one frame of milling state
#[derive(Debug, Clone, Serialize)]
pub struct JobSnapshot {
    /// Display name of the loaded file
    pub file_name: String,
    /// Active sequencer state (selects Back/Stop and Pause/Play affordances)
    pub state: SequencerState,
    /// Executable lines sent so far
    pub current_line: usize,
    /// Executable lines in the whole program
    pub total_lines: usize,
    /// `current_line / total_lines`, 0.0 when the program is empty
    pub progress: f32,
    /// Text of the last command sent (or "Finished", or the error text)
    pub current_command: String,
    /// Seconds spent in the Running state
    pub elapsed_seconds: u64,
    /// Latest machine status copy
    pub machine: MachineStatus,
}

/// Consumer of milling state for display
pub trait Presenter {
    /// Render load progress while the source is pre-scanned
    fn show_loading(&mut self, file_name: &str, progress: f32);

    /// Render the milling status view
    fn show_status(&mut self, snapshot: &JobSnapshot);
}

/// Presenter that drops everything, for headless use and tests
#[derive(Debug, Default)]
pub struct NoOpPresenter;

impl Presenter for NoOpPresenter {
    fn show_loading(&mut self, _file_name: &str, _progress: f32) {}
    fn show_status(&mut self, _snapshot: &JobSnapshot) {}
}
