use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle state of a capture session.
///
/// `stop` tears the session down and returns to `Idle`; there is no separate
/// stopped state once the stream handle is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum CaptureState {
    Idle = 0,
    Recording = 1,
    Paused = 2,
}

impl CaptureState {
    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => CaptureState::Recording,
            2 => CaptureState::Paused,
            _ => CaptureState::Idle,
        }
    }
}

/// Shared state cell read by both the capture pump and the chunk dispatcher.
///
/// The dispatcher reads it once per chunk, at dispatch time, which is what
/// makes the pause-drop policy hold even when pause lands mid-interval.
#[derive(Debug)]
pub struct StateCell(AtomicU8);

impl StateCell {
    pub fn new(state: CaptureState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    pub fn get(&self) -> CaptureState {
        CaptureState::from_u8(self.0.load(Ordering::SeqCst))
    }

    pub fn set(&self, state: CaptureState) {
        self.0.store(state as u8, Ordering::SeqCst);
    }

    /// Transition only if the current state matches `from`.
    /// Returns whether the transition happened.
    pub fn transition(&self, from: CaptureState, to: CaptureState) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}
