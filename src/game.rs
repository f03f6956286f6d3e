//! Game facade
//!
//! Owns the simulation state and everything that feeds it: the frame clock,
//! the gesture sampler and the intent queue. The presentation layer calls the
//! input methods, drives [`Game::advance`] once per animation frame and reads
//! [`Game::snapshot`]; discrete events are delivered to registered callbacks.

use crate::consts::SIM_DT;
use crate::platform::{Command, FixedStep, Interval};
use crate::settings::{MissPolicy, Settings};
use crate::sim::{
    GameEvent, GamePhase, GameState, HoldSource, Intent, ObstacleKind, Queued, Snapshot,
    TickInput, autopilot, tick,
};
use crate::tuning::Tuning;

#[derive(Default)]
struct Listeners {
    phase: Vec<Box<dyn FnMut(GamePhase)>>,
    obstacle_cycle: Vec<Box<dyn FnMut(ObstacleKind)>>,
    gesture_complete: Vec<Box<dyn FnMut()>>,
}

pub struct Game {
    state: GameState,
    settings: Settings,
    clock: FixedStep,
    /// Simulated clock in milliseconds
    clock_ms: f64,
    /// Gesture sampler; runs only while playing
    sampler: Interval,
    pending: Vec<Queued>,
    listeners: Listeners,
    autopilot: bool,
}

impl Game {
    pub fn new(seed: u64, settings: Settings, tuning: Tuning, viewport_width: f32) -> Self {
        let tuning = tuning.sanitized();
        let mut sampler = Interval::new(tuning.sample_interval_ms);
        let state = GameState::new(seed, &settings, tuning, viewport_width.max(1.0));
        if state.phase == GamePhase::Playing {
            sampler.start(0.0);
        }
        Self {
            state,
            autopilot: settings.autopilot,
            settings,
            clock: FixedStep::default(),
            clock_ms: 0.0,
            sampler,
            pending: Vec::new(),
            listeners: Listeners::default(),
        }
    }

    // --- Input entry points ---

    pub fn trigger_jump(&mut self) {
        self.post(Intent::Jump);
    }

    pub fn begin_hold(&mut self, source: HoldSource) {
        self.post(Intent::BeginHold(source));
    }

    pub fn end_hold(&mut self, source: HoldSource) {
        self.post(Intent::EndHold(source));
    }

    pub fn restart(&mut self) {
        self.post(Intent::Restart);
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Jump => self.trigger_jump(),
            Command::BeginHold(source) => self.begin_hold(source),
            Command::EndHold(source) => self.end_hold(source),
            Command::Restart => self.restart(),
            Command::ToggleAutopilot => {
                self.autopilot = !self.autopilot;
                log::info!("Autopilot: {}", self.autopilot);
            }
            Command::ToggleMissPolicy => {
                let policy = self.settings.miss_policy.toggled();
                self.set_miss_policy(policy);
                log::info!("Missed good guy rule: {:?}", policy);
            }
        }
    }

    /// Queue an intent for the next tick, stamped with the current run
    fn post(&mut self, intent: Intent) {
        self.pending.push(Queued {
            epoch: self.state.epoch,
            intent,
        });
    }

    // --- Observers ---

    pub fn on_phase_change(&mut self, f: impl FnMut(GamePhase) + 'static) {
        self.listeners.phase.push(Box::new(f));
    }

    pub fn on_obstacle_cycle(&mut self, f: impl FnMut(ObstacleKind) + 'static) {
        self.listeners.obstacle_cycle.push(Box::new(f));
    }

    pub fn on_gesture_complete(&mut self, f: impl FnMut() + 'static) {
        self.listeners.gesture_complete.push(Box::new(f));
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn set_autopilot(&mut self, on: bool) {
        self.autopilot = on;
    }

    /// Takes effect from the next good guy collision
    pub fn set_miss_policy(&mut self, policy: MissPolicy) {
        self.settings.miss_policy = policy;
        self.state.miss_policy = policy;
        self.settings.save();
    }

    /// Viewport resized; obstacles wrap to the new right edge from now on
    pub fn resize(&mut self, viewport_width: f32) {
        self.state.viewport_width = viewport_width.max(1.0);
    }

    // --- Scheduling ---

    /// Feed one animation frame's elapsed seconds. Returns the number of
    /// simulation steps run.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let steps = self.clock.push(frame_dt);
        for _ in 0..steps {
            self.step();
        }
        steps
    }

    /// Run exactly one fixed simulation step
    pub fn step(&mut self) {
        self.clock_ms += SIM_DT as f64 * 1000.0;

        if self.sampler.poll(self.clock_ms) > 0 {
            self.post(Intent::SampleGesture);
        }
        if self.autopilot {
            for intent in autopilot::plan(&self.state) {
                self.post(intent);
            }
        }

        let input = TickInput {
            now_ms: self.clock_ms,
            intents: std::mem::take(&mut self.pending),
        };
        tick(&mut self.state, &input, SIM_DT);
        self.dispatch_events();
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::PhaseChanged(phase) => {
                    // Timers belong to the phase that started them
                    if phase == GamePhase::Playing {
                        self.sampler.start(self.clock_ms);
                    } else {
                        self.sampler.cancel();
                    }
                    for f in &mut self.listeners.phase {
                        f(phase);
                    }
                }
                GameEvent::ObstacleCycled { next, .. } => {
                    for f in &mut self.listeners.obstacle_cycle {
                        f(next);
                    }
                }
                GameEvent::GestureCompleted => {
                    for f in &mut self.listeners.gesture_complete {
                        f();
                    }
                }
                GameEvent::GoodGuyMissed => {}
            }
        }
    }
}
