//! Operator input contract
//!
//! The sequencer reacts to four logical buttons. Each is edge-triggered:
//! `was_pressed` answers "was this key pressed since the last check" and
//! consumes the edge. Debouncing and key scanning live behind this trait.

/// Logical operator buttons, in the sequencer's priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKey {
    /// Leave the milling screen (only honored while Ready)
    Back,
    /// Abort the job and soft-reset the controller
    Stop,
    /// Feed-hold a running job
    Pause,
    /// Start a job, or resume a paused one
    Play,
}

impl OperatorKey {
    /// All keys in priority order
    pub const ALL: [OperatorKey; 4] = [Self::Back, Self::Stop, Self::Pause, Self::Play];
}

/// Edge-triggered key press source
pub trait OperatorInput {
    /// Check-and-consume whether `key` was pressed since the last check
    fn was_pressed(&mut self, key: OperatorKey) -> bool;
}

/// Simple latching key queue for channel-fed hosts
///
/// The host pushes presses as they arrive (e.g. from a reader thread via an
/// mpsc channel) and the sequencer consumes them edge-wise on its tick.
#[derive(Debug, Default)]
pub struct KeyQueue {
    pressed: [bool; 4],
}

impl KeyQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press
    pub fn press(&mut self, key: OperatorKey) {
        self.pressed[Self::index(key)] = true;
    }

    fn index(key: OperatorKey) -> usize {
        match key {
            OperatorKey::Back => 0,
            OperatorKey::Stop => 1,
            OperatorKey::Pause => 2,
            OperatorKey::Play => 3,
        }
    }
}

impl OperatorInput for KeyQueue {
    fn was_pressed(&mut self, key: OperatorKey) -> bool {
        std::mem::take(&mut self.pressed[Self::index(key)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_triggered() {
        let mut keys = KeyQueue::new();
        assert!(!keys.was_pressed(OperatorKey::Play));

        keys.press(OperatorKey::Play);
        assert!(keys.was_pressed(OperatorKey::Play));
        assert!(!keys.was_pressed(OperatorKey::Play));
    }

    #[test]
    fn test_keys_are_independent() {
        let mut keys = KeyQueue::new();
        keys.press(OperatorKey::Stop);
        assert!(!keys.was_pressed(OperatorKey::Back));
        assert!(keys.was_pressed(OperatorKey::Stop));
    }
}
