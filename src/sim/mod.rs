//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Timestep supplied by the caller, coefficients tuned at 60 Hz
//! - Seeded RNG only
//! - State mutated only by `tick`; input arrives as queued intents
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod gesture;
pub mod motion;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Hitbox, check_runner_collision, obstacle_hitbox, runner_hitbox};
pub use gesture::{GestureState, HoldSource, Release};
pub use motion::Jump;
pub use spawner::on_obstacle_exit;
pub use state::{
    GameEvent, GamePhase, GameState, ObstacleKind, ObstacleState, RunnerState, Snapshot,
    roster_size,
};
pub use tick::{Intent, Queued, TickInput, tick};
