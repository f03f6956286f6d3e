//! Entity motion: runner jump physics and obstacle scrolling
//!
//! All coefficients are per reference tick and scaled by `scale`
//! (`dt / REFERENCE_DT`), so a 60 Hz step reproduces the tuned feel exactly.

use super::state::{ObstacleState, RunnerState};
use crate::tuning::Tuning;

/// Which jump a trigger produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jump {
    Single,
    Double,
}

impl RunnerState {
    pub fn is_grounded(&self) -> bool {
        !self.is_jumping
    }

    /// Apply a jump trigger. Returns `None` once both jumps are spent.
    pub fn jump(&mut self, tuning: &Tuning) -> Option<Jump> {
        if !self.is_jumping {
            self.is_jumping = true;
            self.vertical_velocity = tuning.jump_power;
            self.jump_count = 1;
            Some(Jump::Single)
        } else if self.jump_count < 2 {
            self.vertical_velocity = tuning.jump_power * tuning.double_jump_factor;
            self.jump_count += 1;
            Some(Jump::Double)
        } else {
            None
        }
    }

    /// Integrate one step of jump physics. Returns true on landing.
    pub fn integrate(&mut self, tuning: &Tuning, scale: f32) -> bool {
        if !self.is_jumping {
            return false;
        }
        self.vertical_offset += self.vertical_velocity * scale;
        self.vertical_velocity -= tuning.gravity * scale;

        if self.vertical_offset <= 0.0 {
            self.vertical_offset = 0.0;
            self.vertical_velocity = 0.0;
            self.is_jumping = false;
            self.jump_count = 0;
            return true;
        }
        false
    }
}

impl ObstacleState {
    /// Scroll left by one step. On leaving the playfield (`x < -width`) the
    /// obstacle wraps to the viewport's right edge and this returns true.
    pub fn advance(&mut self, scale: f32, width: f32, viewport_width: f32) -> bool {
        self.horizontal_position -= self.speed * scale;
        if self.horizontal_position < -width {
            self.horizontal_position = viewport_width;
            return true;
        }
        false
    }
}
