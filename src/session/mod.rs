//! Live sampling session module
//!
//! [`SamplingSession`] is the LIVE/FROZEN state machine around one frame
//! source. [`LiveSamplingController`] drives it from a stream of frames on a
//! tokio task.

pub mod controller;
pub mod state;

pub use controller::{sampling_loop, LiveSamplingController, SharedSession};
pub use state::{FrameSource, LiveSample, SamplingSession, SessionState};
