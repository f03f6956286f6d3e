//! ID Runner - A side-scrolling runner/avoidance game
//!
//! Core modules:
//! - `sim`: Authoritative game state (motion, gestures, collisions, phases)
//! - `platform`: Frame clock and browser input mapping
//! - `game`: Facade the presentation layer drives and observes
//! - `settings`: Player preferences (LocalStorage)
//! - `tuning`: Data-driven game balance

pub mod game;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use settings::{MissPolicy, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Reference frame time. Every per-tick tuning value is a coefficient at this rate.
    pub const REFERENCE_DT: f32 = 1.0 / 60.0;
    /// Fixed simulation timestep (runs at the reference rate)
    pub const SIM_DT: f32 = REFERENCE_DT;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Villain roster size (one ending per villain)
    pub const VILLAIN_ROSTER_SIZE: usize = 7;
    /// Good guy roster size
    pub const GOOD_GUY_ROSTER_SIZE: usize = 2;

    /// Viewport width used until the presentation reports its own
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 1280.0;

    /// Gesture progress value that completes a hold
    pub const FULL_PROGRESS: f32 = 100.0;
}

/// Scale factor that converts per-reference-tick coefficients to a step of `dt` seconds
#[inline]
pub fn reference_scale(dt: f32) -> f32 {
    dt / consts::REFERENCE_DT
}
