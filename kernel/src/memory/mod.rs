//! Memory management subsystem.
//!
//! User memory is modelled at page granularity: a process owns the frames
//! its image, stack and argument area occupy, and gives them back on exit.

pub mod frame;

pub use frame::{Frame, FramePool};
