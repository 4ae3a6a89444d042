//! Milling job sequencer
//!
//! Streams a G-code program to the controller one line at a time through a
//! [`GrblSession`], under operator control. The sequencer is a three-state
//! machine:
//!
//! - `Ready`: idle, at the start of the program or after completion/stop
//! - `Running`: feeding the next executable line whenever the session is free
//! - `Paused`: operator feed-hold, or forced by a latched firmware error
//!
//! All transitions happen inside [`MillingSequencer::update`], which the
//! host calls at a bounded cadence with the elapsed delta. Stop, pause and
//! back are cooperative: they take effect on the tick that observes the key
//! press, never mid-send.

use crate::input::{OperatorInput, OperatorKey};
use crate::presentation::JobSnapshot;
use crate::source::GcodeSource;
use millstream_communication::GrblSession;
use millstream_core::Result;
use serde::Serialize;

/// Sequencer run-state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SequencerState {
    /// No job running; the program is rewound and can be (re)started
    Ready,
    /// Streaming commands
    Running,
    /// Held by the operator or by a latched firmware error
    Paused,
}

/// What the host should do after an update tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Keep ticking
    Continue,
    /// The operator pressed Back while Ready; leave the milling screen
    Back,
}

/// Terminal display text once the program is exhausted
const FINISHED_TEXT: &str = "Finished";

/// Load-progress reporting granularity
const LOAD_PROGRESS_STEP: f32 = 0.02;

/// Streams G-code from a source through a protocol session
pub struct MillingSequencer {
    source: Box<dyn GcodeSource>,
    total_lines: usize,
    current_line: usize,
    current_command: String,
    elapsed_seconds: u64,
    second_timer_ms: u64,
    state: SequencerState,
}

impl MillingSequencer {
    /// Load a job: pre-scan the source and leave the controller reset
    ///
    /// The pre-scan counts the executable lines (for progress reporting)
    /// while feeding incremental load progress to `on_progress`. A soft
    /// reset is issued afterwards so the controller starts from a known
    /// state, and the source is rewound ready to run.
    pub fn load(
        mut source: Box<dyn GcodeSource>,
        session: &mut GrblSession,
        on_progress: &mut dyn FnMut(f32),
    ) -> Result<Self> {
        tracing::info!(file = %source.name(), "Reading milling program");

        let size = source.size().max(1) as f32;
        let mut loaded_bytes = 0u64;
        let mut progress = 0.0f32;
        let mut total_lines = 0usize;

        on_progress(progress);
        while let Some(line) = source.read_line()? {
            loaded_bytes += line.len() as u64 + 1;
            if is_executable_line(&line) {
                total_lines += 1;
            }
            let new_progress = loaded_bytes as f32 / size;
            if new_progress - LOAD_PROGRESS_STEP > progress {
                progress = new_progress;
                on_progress(progress);
            }
        }

        tracing::info!(
            file = %source.name(),
            commands = total_lines,
            "Program loaded"
        );

        session.send_reset()?;

        let mut sequencer = Self {
            source,
            total_lines,
            current_line: 0,
            current_command: String::new(),
            elapsed_seconds: 0,
            second_timer_ms: 0,
            state: SequencerState::Ready,
        };
        sequencer.reset(session)?;
        Ok(sequencer)
    }

    /// Advance the sequencer by one tick
    ///
    /// Per tick: advance the elapsed-time counter, drain the serial link
    /// through the session, fold a latched firmware error into the state
    /// machine, process at most one operator key (priority back, stop,
    /// pause, play), then — if the session is free — send either the due
    /// status query or the next executable program line.
    pub fn update(
        &mut self,
        session: &mut GrblSession,
        input: &mut dyn OperatorInput,
        delta_ms: u64,
    ) -> Result<UpdateOutcome> {
        self.second_timer_ms += delta_ms;
        while self.second_timer_ms >= 1000 {
            self.second_timer_ms -= 1000;
            if self.state == SequencerState::Running {
                self.elapsed_seconds += 1;
            }
        }

        session.tick(delta_ms)?;

        // A firmware error halts everything until the operator reacts,
        // including errors latched while Ready (a rejected status query or a
        // late reply drained after a stop).
        if session.is_error() && self.state != SequencerState::Paused {
            tracing::warn!(error = %session.last_command_error(), "Paused on firmware error");
            self.state = SequencerState::Paused;
            self.current_command = session.last_command_error().to_string();
        }

        if input.was_pressed(OperatorKey::Back) {
            if self.state == SequencerState::Ready {
                tracing::info!(file = %self.source.name(), "Leaving milling screen");
                return Ok(UpdateOutcome::Back);
            }
        } else if input.was_pressed(OperatorKey::Stop) {
            tracing::info!(file = %self.source.name(), "Stopped");
            session.send_reset()?;
            self.reset(session)?;
        } else if input.was_pressed(OperatorKey::Pause) {
            if self.state == SequencerState::Running {
                tracing::info!(file = %self.source.name(), "Paused");
                self.state = SequencerState::Paused;
                session.send_hold()?;
            }
        } else if input.was_pressed(OperatorKey::Play) {
            match self.state {
                SequencerState::Ready => {
                    tracing::info!(file = %self.source.name(), "Running");
                    self.reset(session)?;
                    session.send_resume()?;
                    self.state = SequencerState::Running;
                }
                SequencerState::Paused => {
                    // Operator dismisses any latched error condition.
                    tracing::info!(file = %self.source.name(), "Resumed");
                    session.restart();
                    session.send_resume()?;
                    self.state = SequencerState::Running;
                }
                SequencerState::Running => {}
            }
        }

        if session.can_send() && !session.send_query_if_due()? && self.state == SequencerState::Running
        {
            self.send_next_command(session)?;
        }

        Ok(UpdateOutcome::Continue)
    }

    /// Rewind the job to its start with all counters zeroed
    fn reset(&mut self, session: &mut GrblSession) -> Result<()> {
        self.source.seek_to_start()?;
        self.second_timer_ms = 0;
        self.elapsed_seconds = 0;
        self.current_line = 0;
        self.current_command.clear();
        self.state = SequencerState::Ready;
        session.restart();
        Ok(())
    }

    /// Pull one line from the source; send it if it is executable
    ///
    /// A filtered line (comment or blank) is consumed without a send, so
    /// the following tick pulls the next one. Source exhaustion is the
    /// normal completion path back to `Ready`.
    fn send_next_command(&mut self, session: &mut GrblSession) -> Result<()> {
        match self.source.read_line()? {
            Some(line) => {
                if is_executable_line(&line) {
                    let command = line.trim().to_string();
                    session.send_command(&command)?;
                    self.current_line += 1;
                    self.current_command = command;
                }
            }
            None => {
                tracing::info!(file = %self.source.name(), "Done");
                self.current_command = FINISHED_TEXT.to_string();
                self.state = SequencerState::Ready;
            }
        }
        Ok(())
    }

    /// Active sequencer state
    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// Executable lines in the loaded program
    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Executable lines sent so far
    pub fn current_line(&self) -> usize {
        self.current_line
    }

    /// Text of the last command sent (or the terminal/error text)
    pub fn current_command(&self) -> &str {
        &self.current_command
    }

    /// Seconds spent running
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Build the presentation snapshot for this tick
    pub fn snapshot(&self, session: &GrblSession) -> JobSnapshot {
        JobSnapshot {
            file_name: self.source.name().to_string(),
            state: self.state,
            current_line: self.current_line,
            total_lines: self.total_lines,
            progress: if self.total_lines > 0 {
                self.current_line as f32 / self.total_lines as f32
            } else {
                0.0
            },
            current_command: self.current_command.clone(),
            elapsed_seconds: self.elapsed_seconds,
            machine: session.status(),
        }
    }
}

/// Check whether a source line should be sent to the controller
///
/// Executable lines are non-empty after trimming and do not start with a
/// comment marker (`;`, `%` or `(`).
pub fn is_executable_line(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return false;
    }
    !matches!(trimmed.chars().next(), Some(';') | Some('%') | Some('('))
}
