//! Machine status data model
//!
//! The status record reported by the motion controller: run-state plus
//! machine position on the three axes. A fresh report overwrites the whole
//! record; no history is retained.

use serde::{Deserialize, Serialize};

/// Snapshot of the machine's reported state and position
///
/// Owned by the protocol session and exposed by value, so a render pass can
/// never observe a half-updated record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MachineStatus {
    /// Machine state as reported (Idle, Run, Hold, Alarm, Jog, ...)
    pub state: String,
    /// X position in machine coordinates
    pub x: f64,
    /// Y position in machine coordinates
    pub y: f64,
    /// Z position in machine coordinates
    pub z: f64,
}

impl MachineStatus {
    /// Check if the reported state is a running state
    pub fn is_running(&self) -> bool {
        matches!(self.state.as_str(), "Run" | "Jog")
    }

    /// Check if the reported state is held/paused
    pub fn is_hold(&self) -> bool {
        self.state.starts_with("Hold")
    }

    /// Check if the reported state is idle
    pub fn is_idle(&self) -> bool {
        self.state == "Idle"
    }

    /// Check if the reported state indicates a fault condition
    pub fn is_fault(&self) -> bool {
        matches!(self.state.as_str(), "Alarm" | "Door" | "Check")
    }
}

impl std::fmt::Display for MachineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} X{:.3} Y{:.3} Z{:.3}",
            if self.state.is_empty() {
                "?"
            } else {
                self.state.as_str()
            },
            self.x,
            self.y,
            self.z
        )
    }
}
