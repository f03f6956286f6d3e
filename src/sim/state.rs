//! Game state and core simulation types
//!
//! Everything the presentation layer reads lives here, owned by a single
//! [`GameState`] that only [`super::tick`] mutates.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::gesture::GestureState;
use crate::consts::*;
use crate::settings::{MissPolicy, Settings};
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting on the intro screen
    Intro,
    /// Active gameplay
    Playing,
    /// Run ended by a villain (or a missed good guy under the strict rule)
    GameOver,
    /// Run ended by winning over a good guy
    Win,
}

impl GamePhase {
    /// Terminal phases only leave through a restart
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Win)
    }
}

/// Which obstacle roster an obstacle belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Villain,
    GoodGuy,
}

/// The player-controlled runner (vertical motion only)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunnerState {
    /// Height above the ground line, never negative
    pub vertical_offset: f32,
    /// Upward velocity (px per reference tick)
    pub vertical_velocity: f32,
    /// Jumps used since leaving the ground (0, 1 or 2)
    pub jump_count: u8,
    pub is_jumping: bool,
}

/// A horizontally scrolling obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleState {
    /// Left anchor of the sprite
    pub horizontal_position: f32,
    /// Scroll speed (px per reference tick)
    pub speed: f32,
    /// Selector into the obstacle's roster
    pub active_index: usize,
    pub visible: bool,
}

impl ObstacleState {
    pub fn new(viewport_width: f32, speed: f32, visible: bool) -> Self {
        Self {
            horizontal_position: viewport_width,
            speed,
            active_index: 0,
            visible,
        }
    }
}

/// Discrete events produced by a tick, drained by the game facade
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged(GamePhase),
    /// An obstacle left the playfield and the next one was chosen
    ObstacleCycled { exited: ObstacleKind, next: ObstacleKind },
    /// A hold reached 100%
    GestureCompleted,
    /// A good guy overlapped the runner before the hold completed
    GoodGuyMissed,
}

/// Read-only view of the state for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub runner_vertical_offset: f32,
    pub active_obstacle: ObstacleKind,
    pub obstacle_horizontal_position: f32,
    pub active_obstacle_index: usize,
    pub gesture_progress_percent: f32,
    pub holding: bool,
    /// Villain index that picks the ending text
    pub ending_index: usize,
    pub miss_notice: bool,
}

/// Complete game state (deterministic for a given seed and intent stream)
#[derive(Debug, Clone)]
pub struct GameState {
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub miss_policy: MissPolicy,
    pub intro_screen: bool,
    /// Current phase
    pub phase: GamePhase,
    /// Clock time (ms) at which the current phase was entered
    pub phase_entered_ms: f64,
    /// Incremented on every restart; intents from older epochs are stale
    pub epoch: u32,
    /// Width obstacles wrap back to
    pub viewport_width: f32,
    pub runner: RunnerState,
    pub villain: ObstacleState,
    pub good_guy: ObstacleState,
    pub gesture: GestureState,
    /// One-shot latch for the current good guy encounter
    pub good_guy_collision_processed: bool,
    /// Remaining time of the "missed" notice
    pub miss_notice_ms: f32,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, settings: &Settings, tuning: Tuning, viewport_width: f32) -> Self {
        let phase = if settings.intro_screen {
            GamePhase::Intro
        } else {
            GamePhase::Playing
        };
        Self {
            rng: Pcg32::seed_from_u64(seed),
            miss_policy: settings.miss_policy,
            intro_screen: settings.intro_screen,
            phase,
            phase_entered_ms: 0.0,
            epoch: 0,
            viewport_width,
            runner: RunnerState::default(),
            villain: ObstacleState::new(viewport_width, tuning.obstacle_speed, true),
            good_guy: ObstacleState::new(viewport_width, tuning.obstacle_speed, false),
            gesture: GestureState::default(),
            good_guy_collision_processed: false,
            miss_notice_ms: 0.0,
            events: Vec::new(),
            tuning,
        }
    }

    /// Put every entity, gesture and spawner value back to its initial state.
    /// The RNG keeps running so consecutive runs differ.
    pub fn reset_run(&mut self) {
        let speed = self.tuning.obstacle_speed;
        self.runner = RunnerState::default();
        self.villain = ObstacleState::new(self.viewport_width, speed, true);
        self.good_guy = ObstacleState::new(self.viewport_width, speed, false);
        self.gesture.reset();
        self.good_guy_collision_processed = false;
        self.miss_notice_ms = 0.0;
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// The single obstacle currently in play
    pub fn active_obstacle(&self) -> (ObstacleKind, &ObstacleState) {
        if self.good_guy.visible {
            (ObstacleKind::GoodGuy, &self.good_guy)
        } else {
            (ObstacleKind::Villain, &self.villain)
        }
    }

    pub fn active_obstacle_mut(&mut self) -> (ObstacleKind, &mut ObstacleState) {
        if self.good_guy.visible {
            (ObstacleKind::GoodGuy, &mut self.good_guy)
        } else {
            (ObstacleKind::Villain, &mut self.villain)
        }
    }

    /// Switch phases and record the change. Terminal phases are sticky until
    /// a restart, so repeated requests in the same tick are no-ops.
    pub fn enter_phase(&mut self, phase: GamePhase, now_ms: f64) -> bool {
        if self.phase == phase || self.phase.is_terminal() {
            return false;
        }
        log::info!("Phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.phase_entered_ms = now_ms;
        self.gesture.reset();
        self.events.push(GameEvent::PhaseChanged(phase));
        true
    }

    /// Leave a terminal phase (or the intro) for a fresh run
    pub fn restart(&mut self, now_ms: f64) {
        self.reset_run();
        let next = if self.intro_screen && self.phase != GamePhase::Intro {
            GamePhase::Intro
        } else {
            GamePhase::Playing
        };
        log::info!("Restart ({:?} -> {:?}, epoch {})", self.phase, next, self.epoch);
        self.phase = next;
        self.phase_entered_ms = now_ms;
        self.events.push(GameEvent::PhaseChanged(next));
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        let (kind, obstacle) = self.active_obstacle();
        Snapshot {
            phase: self.phase,
            runner_vertical_offset: self.runner.vertical_offset,
            active_obstacle: kind,
            obstacle_horizontal_position: obstacle.horizontal_position,
            active_obstacle_index: obstacle.active_index,
            gesture_progress_percent: self.gesture.progress_percent,
            holding: self.gesture.is_holding(),
            ending_index: self.villain.active_index,
            miss_notice: self.miss_notice_ms > 0.0,
        }
    }
}

/// Roster size for an obstacle kind
pub fn roster_size(kind: ObstacleKind) -> usize {
    match kind {
        ObstacleKind::Villain => VILLAIN_ROSTER_SIZE,
        ObstacleKind::GoodGuy => GOOD_GUY_ROSTER_SIZE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(7, &Settings::default(), Tuning::default(), 1280.0)
    }

    #[test]
    fn test_new_state_starts_on_intro() {
        let state = state();
        assert_eq!(state.phase, GamePhase::Intro);
        assert!(state.villain.visible);
        assert!(!state.good_guy.visible);
        assert_eq!(state.villain.horizontal_position, 1280.0);
        assert_eq!(state.active_obstacle().0, ObstacleKind::Villain);
    }

    #[test]
    fn test_terminal_phase_is_sticky() {
        let mut state = state();
        state.phase = GamePhase::Playing;
        assert!(state.enter_phase(GamePhase::GameOver, 10.0));
        assert!(!state.enter_phase(GamePhase::Win, 10.0));
        assert!(!state.enter_phase(GamePhase::GameOver, 10.0));
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.drain_events(), vec![GameEvent::PhaseChanged(GamePhase::GameOver)]);
    }

    #[test]
    fn test_restart_goes_back_to_intro_when_enabled() {
        let mut state = state();
        state.phase = GamePhase::Win;
        state.villain.active_index = 4;
        state.restart(2000.0);
        assert_eq!(state.phase, GamePhase::Intro);
        assert_eq!(state.villain.active_index, 0);
        assert_eq!(state.epoch, 1);

        // From the intro, a restart starts playing
        state.restart(2100.0);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_snapshot_reports_good_guy_when_visible() {
        let mut state = state();
        state.villain.visible = false;
        state.good_guy.visible = true;
        state.good_guy.horizontal_position = 400.0;
        state.good_guy.active_index = 1;
        state.villain.active_index = 3;

        let snap = state.snapshot();
        assert_eq!(snap.active_obstacle, ObstacleKind::GoodGuy);
        assert_eq!(snap.obstacle_horizontal_position, 400.0);
        assert_eq!(snap.active_obstacle_index, 1);
        assert_eq!(snap.ending_index, 3);
    }
}
