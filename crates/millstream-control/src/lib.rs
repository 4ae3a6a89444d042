//! # millstream-control
//!
//! Milling job execution: G-code sources, the operator input contract, the
//! Ready/Running/Paused sequencer state machine and the presentation
//! snapshot it exposes.

pub mod input;
pub mod presentation;
pub mod sequencer;
pub mod source;

pub use input::{KeyQueue, OperatorInput, OperatorKey};
pub use presentation::{JobSnapshot, NoOpPresenter, Presenter};
pub use sequencer::{is_executable_line, MillingSequencer, SequencerState, UpdateOutcome};
pub use source::{FileSource, GcodeSource, StringSource};
