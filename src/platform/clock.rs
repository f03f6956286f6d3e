//! Frame clock
//!
//! Turns variable browser frame times into whole fixed simulation steps and
//! drives periodic timers off the same simulated clock.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Fixed timestep accumulator
#[derive(Debug, Clone)]
pub struct FixedStep {
    accumulator: f32,
    step: f32,
    max_substeps: u32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedStep {
    pub fn new(step: f32, max_substeps: u32) -> Self {
        Self {
            accumulator: 0.0,
            step,
            max_substeps,
        }
    }

    /// Add a frame's elapsed seconds and return how many steps to run.
    /// Long stalls (tab switches) are capped instead of replayed.
    pub fn push(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, 0.1);

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_substeps {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == self.max_substeps {
            // Drop the backlog we refused to simulate
            self.accumulator = self.accumulator.min(self.step);
        }
        steps
    }
}

/// Periodic timer on the simulated clock. Inactive until started, and a
/// cancelled interval never fires again until restarted.
#[derive(Debug, Clone)]
pub struct Interval {
    period_ms: f64,
    next_due_ms: Option<f64>,
}

impl Interval {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms: period_ms.max(1.0),
            next_due_ms: None,
        }
    }

    pub fn start(&mut self, now_ms: f64) {
        self.next_due_ms = Some(now_ms + self.period_ms);
    }

    pub fn cancel(&mut self) {
        self.next_due_ms = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due_ms.is_some()
    }

    /// Number of periods that elapsed up to `now_ms`
    pub fn poll(&mut self, now_ms: f64) -> u32 {
        let Some(mut due) = self.next_due_ms else {
            return 0;
        };
        let mut fired = 0;
        while due <= now_ms {
            fired += 1;
            due += self.period_ms;
        }
        self.next_due_ms = Some(due);
        fired
    }
}
