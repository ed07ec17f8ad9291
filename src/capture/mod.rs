//! Capture session: owns the live audio stream and slices it into chunks.
//!
//! The session runs a pump task that interleaves three concerns:
//! - frame intake from the capture backend (mono mixdown + downsampling)
//! - the periodic chunk timer (segment finalize + restart, no boundary loss)
//! - shutdown (final flush, backend release)

mod session;
mod state;

pub use session::{CaptureSession, ChunkConsumer};
pub use state::{CaptureState, StateCell};
