//! Fixed timestep simulation tick
//!
//! The phase state machine. Each tick drains the queued intents, moves the
//! entities, samples the hold gesture, checks the one active obstacle and
//! decides the phase, then lets the spawner react to exits.

use super::collision::check_runner_collision;
use super::gesture::{HoldSource, Release};
use super::spawner::on_obstacle_exit;
use super::state::{GameEvent, GamePhase, GameState, ObstacleKind};
use crate::consts::FULL_PROGRESS;
use crate::reference_scale;
use crate::settings::MissPolicy;

/// Something the player or a timer asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Jump,
    BeginHold(HoldSource),
    EndHold(HoldSource),
    /// Periodic gesture sampler fired
    SampleGesture,
    /// Start from the intro, or restart from a terminal phase
    Restart,
}

/// An intent stamped with the run it was posted in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Queued {
    pub epoch: u32,
    pub intent: Intent,
}

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Clock time of this tick in milliseconds
    pub now_ms: f64,
    /// Intents in posting order
    pub intents: Vec<Queued>,
}

impl TickInput {
    pub fn at(now_ms: f64) -> Self {
        Self {
            now_ms,
            intents: Vec::new(),
        }
    }

    /// Add intents stamped with the given epoch
    pub fn with(mut self, epoch: u32, intents: &[Intent]) -> Self {
        self.intents
            .extend(intents.iter().map(|&intent| Queued { epoch, intent }));
        self
    }
}

/// Advance the game state by one timestep of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let now = input.now_ms;

    // Stale intents belong to a run that no longer exists
    let mut intents = input.intents.iter().filter(|q| {
        let current = q.epoch == state.epoch;
        if !current {
            log::debug!("Dropping stale {:?} from epoch {}", q.intent, q.epoch);
        }
        current
    });

    match state.phase {
        GamePhase::Intro => {
            if intents.any(|q| matches!(q.intent, Intent::Restart | Intent::Jump)) {
                state.restart(now);
            }
            return;
        }
        GamePhase::GameOver | GamePhase::Win => {
            let debounced = now - state.phase_entered_ms >= state.tuning.restart_debounce_ms;
            if debounced && intents.any(|q| q.intent == Intent::Restart) {
                state.restart(now);
            }
            return;
        }
        GamePhase::Playing => {}
    }

    let intents: Vec<Intent> = intents.map(|q| q.intent).collect();
    let scale = reference_scale(dt);
    let tuning = state.tuning.clone();

    // Discrete input first so a jump moves the runner this tick
    let mut samples = 0;
    for intent in intents {
        match intent {
            Intent::Jump => {
                state.runner.jump(&tuning);
            }
            Intent::BeginHold(source) => {
                state.gesture.begin(source, now, &tuning);
            }
            Intent::EndHold(source) => {
                if state.gesture.release(source, now, &tuning) == Release::Tap {
                    state.runner.jump(&tuning);
                }
            }
            Intent::SampleGesture => samples += 1,
            Intent::Restart => {}
        }
    }

    // Motion
    state.runner.integrate(&tuning, scale);
    let viewport_width = state.viewport_width;
    let (active, obstacle) = state.active_obstacle_mut();
    let exited = obstacle
        .advance(scale, tuning.entity_width, viewport_width)
        .then_some(active);
    state.miss_notice_ms = (state.miss_notice_ms - dt * 1000.0).max(0.0);

    // Gesture: one sample is enough however many came due this tick
    if samples > 0 && state.gesture.sample(now) {
        state.events.push(GameEvent::GestureCompleted);
        resolve_completed_hold(state, active, now);
    }

    // Collision against the single active obstacle
    if state.phase == GamePhase::Playing {
        if let Some(kind) = check_runner_collision(state) {
            resolve_collision(state, kind, now);
        }
    }

    // Spawner
    if state.phase == GamePhase::Playing {
        if let Some(kind) = exited {
            on_obstacle_exit(state, kind);
        }
    }
}

/// A hold reached 100%: win against an unresolved good guy, lose otherwise
fn resolve_completed_hold(state: &mut GameState, active: ObstacleKind, now: f64) {
    match active {
        ObstacleKind::GoodGuy if !state.good_guy_collision_processed => {
            state.good_guy_collision_processed = true;
            state.enter_phase(GamePhase::Win, now);
        }
        // Encounter already settled; the hold changes nothing
        ObstacleKind::GoodGuy => {}
        ObstacleKind::Villain => {
            state.enter_phase(GamePhase::GameOver, now);
        }
    }
}

fn resolve_collision(state: &mut GameState, kind: ObstacleKind, now: f64) {
    match kind {
        ObstacleKind::Villain => {
            state.enter_phase(GamePhase::GameOver, now);
        }
        ObstacleKind::GoodGuy => {
            if state.good_guy_collision_processed {
                return;
            }
            state.good_guy_collision_processed = true;

            if state.gesture.progress_percent >= FULL_PROGRESS {
                state.enter_phase(GamePhase::Win, now);
                return;
            }

            log::info!(
                "Missed good guy at {:.0}% hold",
                state.gesture.progress_percent
            );
            state.gesture.reset();
            state.events.push(GameEvent::GoodGuyMissed);
            match state.miss_policy {
                MissPolicy::Continue => state.miss_notice_ms = state.tuning.miss_notice_ms,
                MissPolicy::GameOver => {
                    state.enter_phase(GamePhase::GameOver, now);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::Settings;
    use crate::tuning::Tuning;

    const STEP_MS: f64 = SIM_DT as f64 * 1000.0;

    fn playing(settings: Settings) -> GameState {
        let settings = Settings {
            intro_screen: false,
            ..settings
        };
        GameState::new(12345, &settings, Tuning::default(), 1280.0)
    }

    fn with_good_guy(state: &mut GameState, x: f32) {
        state.villain.visible = false;
        state.good_guy.visible = true;
        state.good_guy.horizontal_position = x;
        state.good_guy_collision_processed = false;
    }

    fn step(state: &mut GameState, now_ms: f64, intents: &[Intent]) {
        let epoch = state.epoch;
        tick(state, &TickInput::at(now_ms).with(epoch, intents), SIM_DT);
    }

    #[test]
    fn test_intro_to_playing() {
        let mut state = GameState::new(1, &Settings::default(), Tuning::default(), 1280.0);
        assert_eq!(state.phase, GamePhase::Intro);

        step(&mut state, 0.0, &[]);
        assert_eq!(state.phase, GamePhase::Intro);
        assert_eq!(state.villain.horizontal_position, 1280.0);

        step(&mut state, STEP_MS, &[Intent::Jump]);
        assert_eq!(state.phase, GamePhase::Playing);
        // The starting press doesn't also jump
        assert_eq!(state.runner.vertical_offset, 0.0);
    }

    #[test]
    fn test_villain_scrolls_by_speed() {
        let mut state = playing(Settings::default());
        step(&mut state, STEP_MS, &[]);
        assert_eq!(state.villain.horizontal_position, 1275.0);
        step(&mut state, 2.0 * STEP_MS, &[]);
        assert_eq!(state.villain.horizontal_position, 1270.0);
    }

    #[test]
    fn test_grounded_runner_hits_villain_at_zero() {
        let mut state = playing(Settings::default());
        state.villain.horizontal_position = 0.0;
        step(&mut state, STEP_MS, &[]);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::PhaseChanged(GamePhase::GameOver)]
        );
    }

    #[test]
    fn test_nothing_moves_after_game_over() {
        let mut state = playing(Settings::default());
        state.villain.horizontal_position = 0.0;
        step(&mut state, STEP_MS, &[]);
        let x = state.villain.horizontal_position;

        step(&mut state, 2.0 * STEP_MS, &[Intent::Jump, Intent::SampleGesture]);
        assert_eq!(state.villain.horizontal_position, x);
        assert_eq!(state.runner.vertical_offset, 0.0);
    }

    #[test]
    fn test_hold_completes_before_good_guy_arrives() {
        let mut state = playing(Settings::default());
        with_good_guy(&mut state, 1000.0);

        step(&mut state, 0.0, &[Intent::BeginHold(HoldSource::Keyboard)]);
        step(&mut state, 3000.0, &[Intent::SampleGesture]);
        assert_eq!(state.phase, GamePhase::Win);
        assert!(state.good_guy_collision_processed);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::GestureCompleted));
        assert!(events.contains(&GameEvent::PhaseChanged(GamePhase::Win)));

        // The pass-by no longer resolves anything
        state.good_guy.horizontal_position = 0.0;
        assert_eq!(check_runner_collision(&state), None);
        step(&mut state, 3000.0 + STEP_MS, &[]);
        assert_eq!(state.phase, GamePhase::Win);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_miss_continues_by_default() {
        let mut state = playing(Settings::default());
        with_good_guy(&mut state, 600.0);

        step(&mut state, 0.0, &[Intent::BeginHold(HoldSource::Keyboard)]);
        step(&mut state, 1200.0, &[Intent::SampleGesture]);
        assert!((state.gesture.progress_percent - 40.0).abs() < 1e-3);

        state.good_guy.horizontal_position = 0.0;
        step(&mut state, 1200.0 + STEP_MS, &[]);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.good_guy_collision_processed);
        assert_eq!(state.gesture.progress_percent, 0.0);
        assert!(!state.gesture.is_holding());
        assert!(state.snapshot().miss_notice);
        assert!(state.drain_events().contains(&GameEvent::GoodGuyMissed));

        // Still overlapping next tick: resolved once only
        step(&mut state, 1200.0 + 2.0 * STEP_MS, &[]);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_miss_ends_run_under_strict_policy() {
        let mut state = playing(Settings {
            miss_policy: MissPolicy::GameOver,
            ..Default::default()
        });
        with_good_guy(&mut state, 0.0);
        step(&mut state, STEP_MS, &[]);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_completed_hold_against_villain_loses() {
        let mut state = playing(Settings::default());
        step(&mut state, 0.0, &[Intent::BeginHold(HoldSource::Touch)]);
        step(&mut state, 500.0, &[Intent::SampleGesture]);
        assert_eq!(state.phase, GamePhase::Playing);
        step(&mut state, 1000.0, &[Intent::SampleGesture]);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_hold_and_collision_in_same_tick_win() {
        let mut state = playing(Settings::default());
        with_good_guy(&mut state, 600.0);
        step(&mut state, 0.0, &[Intent::BeginHold(HoldSource::Touch)]);

        // Overlap and completion land on the same tick
        state.good_guy.horizontal_position = 0.0;
        step(&mut state, 1000.0, &[Intent::SampleGesture]);
        assert_eq!(state.phase, GamePhase::Win);
        let events = state.drain_events();
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::PhaseChanged(_)))
                .count(),
            1
        );
        assert!(!events.contains(&GameEvent::GoodGuyMissed));
    }

    #[test]
    fn test_short_touch_jumps() {
        let mut state = playing(Settings::default());
        step(&mut state, 0.0, &[Intent::BeginHold(HoldSource::Touch)]);
        step(&mut state, 100.0, &[Intent::EndHold(HoldSource::Touch)]);
        assert!(state.runner.is_jumping);
        assert!(state.runner.vertical_offset > 0.0);
    }

    #[test]
    fn test_restart_waits_for_debounce() {
        let mut state = playing(Settings::default());
        state.villain.horizontal_position = 0.0;
        state.villain.active_index = 5;
        step(&mut state, 5000.0, &[]);
        assert_eq!(state.phase, GamePhase::GameOver);

        step(&mut state, 5500.0, &[Intent::Restart]);
        assert_eq!(state.phase, GamePhase::GameOver);

        step(&mut state, 6000.0, &[Intent::Restart]);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.villain.active_index, 0);
        assert_eq!(state.villain.horizontal_position, 1280.0);
        assert_eq!(state.runner.vertical_offset, 0.0);
        assert_eq!(state.gesture.progress_percent, 0.0);
    }

    #[test]
    fn test_stale_intents_are_dropped() {
        let mut state = playing(Settings::default());
        let old_epoch = state.epoch;
        state.restart(0.0);
        assert_ne!(state.epoch, old_epoch);

        let input = TickInput::at(STEP_MS).with(old_epoch, &[Intent::Jump]);
        tick(&mut state, &input, SIM_DT);
        assert!(!state.runner.is_jumping);
    }

    #[test]
    fn test_exit_cycles_villain() {
        let mut state = playing(Settings::default());
        state.tuning.good_guy_chance = 0.0;
        state.villain.horizontal_position = -298.0;
        step(&mut state, STEP_MS, &[]);
        assert_eq!(state.villain.horizontal_position, 1280.0);
        assert_eq!(state.villain.active_index, 1);
    }

    #[test]
    fn test_hold_from_villain_does_not_carry_into_good_guy() {
        let mut state = playing(Settings::default());
        state.tuning.good_guy_chance = 1.0;
        step(&mut state, 0.0, &[Intent::BeginHold(HoldSource::Keyboard)]);

        // Villain leaves on the same tick the hold is almost done
        state.villain.horizontal_position = -299.0;
        step(&mut state, 2950.0, &[Intent::SampleGesture]);
        assert_eq!(state.active_obstacle().0, ObstacleKind::GoodGuy);
        assert!(!state.gesture.is_holding());
        assert_eq!(state.gesture.progress_percent, 0.0);

        step(&mut state, 3000.0, &[Intent::SampleGesture]);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(!state.good_guy_collision_processed);
    }

    #[test]
    fn test_miss_notice_expires() {
        let mut state = playing(Settings::default());
        with_good_guy(&mut state, 0.0);
        step(&mut state, STEP_MS, &[]);
        assert!(state.snapshot().miss_notice);

        let mut now = STEP_MS;
        for _ in 0..80 {
            now += STEP_MS;
            step(&mut state, now, &[]);
        }
        assert!(state.snapshot().miss_notice);

        for _ in 0..15 {
            now += STEP_MS;
            step(&mut state, now, &[]);
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(!state.snapshot().miss_notice);
    }

    #[test]
    fn test_touch_release_leaves_keyboard_hold() {
        let mut state = playing(Settings::default());
        with_good_guy(&mut state, 1200.0);
        step(&mut state, 0.0, &[Intent::BeginHold(HoldSource::Keyboard)]);
        step(&mut state, 400.0, &[Intent::BeginHold(HoldSource::Touch)]);
        step(&mut state, 600.0, &[Intent::EndHold(HoldSource::Touch)]);
        assert!(state.gesture.is_holding());
        assert!(!state.runner.is_jumping);

        step(&mut state, 3000.0, &[Intent::SampleGesture]);
        assert_eq!(state.phase, GamePhase::Win);
    }
}
