//! Idle/demo mode planner
//!
//! Looks at the state before a tick and posts the intents a player would:
//! jump villains (with a late double jump to stretch the airtime) and hold
//! for good guys.

use super::collision::{obstacle_hitbox, runner_hitbox};
use super::state::{GamePhase, GameState, ObstacleKind};
use super::tick::Intent;
use super::HoldSource;

/// Gap between hitboxes at which the first jump is taken
const JUMP_LEAD: f32 = 75.0;
/// Height margin over the obstacle at which the second jump is spent
const DOUBLE_JUMP_MARGIN: f32 = 8.0;

/// Intents for the coming tick
pub fn plan(state: &GameState) -> Vec<Intent> {
    let mut intents = Vec::new();
    match state.phase {
        GamePhase::Intro | GamePhase::GameOver | GamePhase::Win => {
            intents.push(Intent::Restart);
            return intents;
        }
        GamePhase::Playing => {}
    }

    let tuning = &state.tuning;
    let (kind, obstacle) = state.active_obstacle();
    let runner_box = runner_hitbox(state.runner.vertical_offset, tuning);
    let obstacle_box = obstacle_hitbox(obstacle.horizontal_position, tuning);
    let gap = obstacle_box.min.x - runner_box.max.x;
    let passed = obstacle_box.max.x <= runner_box.min.x;

    match kind {
        ObstacleKind::Villain => {
            if let Some(source) = state.gesture.source {
                intents.push(Intent::EndHold(source));
            }
            let runner = &state.runner;
            if runner.is_grounded() && gap > 0.0 && gap <= JUMP_LEAD {
                intents.push(Intent::Jump);
            } else if runner.is_jumping
                && runner.jump_count == 1
                && runner.vertical_velocity < 0.0
                && runner.vertical_offset < tuning.obstacle_height + DOUBLE_JUMP_MARGIN
                && !passed
            {
                intents.push(Intent::Jump);
            }
        }
        ObstacleKind::GoodGuy => {
            if !state.good_guy_collision_processed && !state.gesture.is_holding() {
                intents.push(Intent::BeginHold(HoldSource::Keyboard));
            }
        }
    }
    intents
}
