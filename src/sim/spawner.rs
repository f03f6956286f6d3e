//! Obstacle cycling
//!
//! Villains come round in roster order. After each villain there is a fixed
//! chance that the next encounter is a good guy instead.

use rand::Rng;

use super::state::{GameEvent, GameState, ObstacleKind, roster_size};

/// React to the active obstacle leaving the playfield
pub fn on_obstacle_exit(state: &mut GameState, exited: ObstacleKind) {
    let next = match exited {
        ObstacleKind::Villain => {
            state.villain.active_index =
                (state.villain.active_index + 1) % roster_size(ObstacleKind::Villain);
            if state.rng.random_bool(state.tuning.good_guy_chance) {
                spawn_good_guy(state);
                ObstacleKind::GoodGuy
            } else {
                ObstacleKind::Villain
            }
        }
        ObstacleKind::GoodGuy => {
            retire_good_guy(state);
            ObstacleKind::Villain
        }
    };
    log::debug!(
        "{:?} left the playfield, next {:?} #{}",
        exited,
        next,
        match next {
            ObstacleKind::Villain => state.villain.active_index,
            ObstacleKind::GoodGuy => state.good_guy.active_index,
        }
    );
    state.events.push(GameEvent::ObstacleCycled { exited, next });
}

/// Start a fresh good guy encounter at the right edge
fn spawn_good_guy(state: &mut GameState) {
    state.villain.visible = false;
    state.villain.horizontal_position = state.viewport_width;

    state.good_guy.visible = true;
    state.good_guy.horizontal_position = state.viewport_width;
    state.good_guy.active_index = state.rng.random_range(0..roster_size(ObstacleKind::GoodGuy));
    state.good_guy_collision_processed = false;
    // Only a hold begun during this encounter can win it
    state.gesture.reset();
}

/// Hand the playfield back to the villains
fn retire_good_guy(state: &mut GameState) {
    state.good_guy.visible = false;
    state.good_guy.horizontal_position = state.viewport_width;
    // A hold only means something while a good guy is on screen
    state.gesture.reset();

    state.villain.visible = true;
    state.villain.horizontal_position = state.viewport_width;
}
