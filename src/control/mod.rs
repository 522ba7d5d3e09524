//! Control channel
//!
//! Owns the control socket and the optional traffic observer.

pub mod channel;
pub mod observer;

pub use channel::ControlChannel;
pub use observer::{ControlObserver, Transcript, TranscriptEntry};
