//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time/ticks (fixed-step accumulator, cancellable intervals)
//! - Input events (DOM key names and touches to game commands)

pub mod clock;
pub mod input;

pub use clock::{FixedStep, Interval};
pub use input::{Command, key_down, key_up, touch_end, touch_start};
