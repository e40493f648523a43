//! Staged reveal sequencer
//!
//! Advances through an ordered list of timed [`Step`]s — fixed delays,
//! character-by-character typed text, and ticking progress bars — emitting
//! a completion event exactly once per step. Cancellation stops all pending
//! timers deterministically.

pub mod engine;
pub mod step;

pub use engine::{RevealSequencer, SequencerEvent, SequencerSnapshot};
pub use step::{Step, StepProgress};
