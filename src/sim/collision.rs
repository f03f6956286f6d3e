//! Runner vs obstacle collision
//!
//! Hitboxes are inset from the sprite bounds on both sides so that grazing
//! a sprite's transparent edge doesn't count. Coordinates are playfield
//! pixels: x grows rightward, y grows upward from the bottom edge.

use glam::Vec2;

use super::state::{GameState, ObstacleKind};
use crate::tuning::Tuning;

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub min: Vec2,
    pub max: Vec2,
}

impl Hitbox {
    /// Box for a sprite anchored at its bottom-left corner, narrowed by
    /// `inset` on the left and right
    pub fn inset(anchor: Vec2, width: f32, height: f32, inset: f32) -> Self {
        Self {
            min: Vec2::new(anchor.x + inset, anchor.y),
            max: Vec2::new(anchor.x + width - inset, anchor.y + height),
        }
    }

    /// Strict overlap: touching edges do not collide
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Runner's hitbox at its current height
pub fn runner_hitbox(vertical_offset: f32, tuning: &Tuning) -> Hitbox {
    let anchor = Vec2::new(tuning.runner_left, tuning.base_bottom + vertical_offset);
    // Only the runner's bottom edge matters vertically
    Hitbox::inset(anchor, tuning.entity_width, tuning.entity_width, tuning.hitbox_inset)
}

/// Obstacle hitbox at a horizontal anchor
pub fn obstacle_hitbox(horizontal_position: f32, tuning: &Tuning) -> Hitbox {
    let anchor = Vec2::new(horizontal_position, tuning.base_bottom);
    Hitbox::inset(anchor, tuning.entity_width, tuning.obstacle_height, tuning.hitbox_inset)
}

/// Check the runner against the single active obstacle.
///
/// Returns the obstacle kind on overlap. A good guy whose encounter was
/// already resolved never collides again.
pub fn check_runner_collision(state: &GameState) -> Option<ObstacleKind> {
    let (kind, obstacle) = state.active_obstacle();
    if !obstacle.visible {
        return None;
    }
    if kind == ObstacleKind::GoodGuy && state.good_guy_collision_processed {
        return None;
    }

    let runner = runner_hitbox(state.runner.vertical_offset, &state.tuning);
    let other = obstacle_hitbox(obstacle.horizontal_position, &state.tuning);
    runner.overlaps(&other).then_some(kind)
}
