//! Hold-to-win gesture tracking
//!
//! A hold (keyboard or touch) is sampled on a fixed interval and turned into
//! a 0-100 progress value over a per-source window. Short touches are taps.

use serde::{Deserialize, Serialize};

use crate::consts::FULL_PROGRESS;
use crate::tuning::Tuning;

/// Input device that started a hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoldSource {
    Keyboard,
    Touch,
}

/// How a released hold is classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// Touch released inside the tap grace window: treat as a jump
    Tap,
    /// Hold let go before completion
    Abandoned,
    /// Nothing was being held by that source
    Idle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GestureState {
    pub hold_start_ms: Option<f64>,
    pub source: Option<HoldSource>,
    /// 0..=100, non-decreasing while a hold is active
    pub progress_percent: f32,
    /// Window of the active hold
    pub window_ms: f64,
}

impl GestureState {
    pub fn is_holding(&self) -> bool {
        self.hold_start_ms.is_some()
    }

    /// Start a hold. A hold already in progress keeps its original start.
    pub fn begin(&mut self, source: HoldSource, now_ms: f64, tuning: &Tuning) -> bool {
        if self.is_holding() {
            return false;
        }
        self.hold_start_ms = Some(now_ms);
        self.source = Some(source);
        self.window_ms = tuning.hold_window_ms(source);
        self.progress_percent = 0.0;
        true
    }

    /// Let go of the hold. Only the source that started it can end it.
    pub fn release(&mut self, source: HoldSource, now_ms: f64, tuning: &Tuning) -> Release {
        let Some(start) = self.hold_start_ms else {
            return Release::Idle;
        };
        if self.source != Some(source) {
            return Release::Idle;
        }
        let outcome = match source {
            HoldSource::Touch if now_ms - start < tuning.tap_grace_ms => Release::Tap,
            _ => Release::Abandoned,
        };
        self.reset();
        outcome
    }

    /// Progress for a hold that has lasted `elapsed_ms`
    pub fn progress_for(elapsed_ms: f64, window_ms: f64) -> f32 {
        if window_ms <= 0.0 {
            return FULL_PROGRESS;
        }
        ((elapsed_ms.max(0.0) / window_ms * 100.0).min(100.0)) as f32
    }

    /// Update progress from the clock. Returns true when the hold completes,
    /// in which case the tracker has already reset itself.
    pub fn sample(&mut self, now_ms: f64) -> bool {
        let Some(start) = self.hold_start_ms else {
            return false;
        };
        let progress = Self::progress_for(now_ms - start, self.window_ms);
        self.progress_percent = self.progress_percent.max(progress);
        if self.progress_percent >= FULL_PROGRESS {
            self.reset();
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.hold_start_ms = None;
        self.source = None;
        self.progress_percent = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_hits_exactly_100_at_window() {
        assert_eq!(GestureState::progress_for(3000.0, 3000.0), 100.0);
        assert_eq!(GestureState::progress_for(1500.0, 3000.0), 50.0);
        assert_eq!(GestureState::progress_for(9000.0, 3000.0), 100.0);
        assert_eq!(GestureState::progress_for(-5.0, 3000.0), 0.0);
    }

    #[test]
    fn test_sampling_completes_and_resets() {
        let tuning = Tuning::default();
        let mut gesture = GestureState::default();
        assert!(gesture.begin(HoldSource::Touch, 0.0, &tuning));

        assert!(!gesture.sample(500.0));
        assert_eq!(gesture.progress_percent, 50.0);

        assert!(gesture.sample(1000.0));
        assert!(!gesture.is_holding());
        assert_eq!(gesture.progress_percent, 0.0);

        // A completed hold does not fire twice
        assert!(!gesture.sample(1050.0));
    }

    #[test]
    fn test_release_before_completion_resets() {
        let tuning = Tuning::default();
        let mut gesture = GestureState::default();
        gesture.begin(HoldSource::Keyboard, 100.0, &tuning);
        gesture.sample(1600.0);
        assert_eq!(gesture.progress_percent, 50.0);

        assert_eq!(gesture.release(HoldSource::Keyboard, 1700.0, &tuning), Release::Abandoned);
        assert_eq!(gesture.progress_percent, 0.0);
        assert_eq!(gesture.release(HoldSource::Keyboard, 1800.0, &tuning), Release::Idle);
    }

    #[test]
    fn test_short_touch_is_a_tap() {
        let tuning = Tuning::default();
        let mut gesture = GestureState::default();
        gesture.begin(HoldSource::Touch, 0.0, &tuning);
        assert_eq!(gesture.release(HoldSource::Touch, 249.0, &tuning), Release::Tap);

        gesture.begin(HoldSource::Touch, 0.0, &tuning);
        assert_eq!(gesture.release(HoldSource::Touch, 250.0, &tuning), Release::Abandoned);

        // Keyboard holds are never taps; Space is the jump key
        gesture.begin(HoldSource::Keyboard, 0.0, &tuning);
        assert_eq!(gesture.release(HoldSource::Keyboard, 10.0, &tuning), Release::Abandoned);
    }

    #[test]
    fn test_second_begin_keeps_original_start() {
        let tuning = Tuning::default();
        let mut gesture = GestureState::default();
        assert!(gesture.begin(HoldSource::Keyboard, 0.0, &tuning));
        assert!(!gesture.begin(HoldSource::Touch, 1500.0, &tuning));
        assert_eq!(gesture.hold_start_ms, Some(0.0));
        assert_eq!(gesture.window_ms, 3000.0);
    }

    #[test]
    fn test_other_source_cannot_end_hold() {
        let tuning = Tuning::default();
        let mut gesture = GestureState::default();
        gesture.begin(HoldSource::Keyboard, 0.0, &tuning);
        assert!(!gesture.begin(HoldSource::Touch, 400.0, &tuning));

        assert_eq!(gesture.release(HoldSource::Touch, 500.0, &tuning), Release::Idle);
        assert!(gesture.is_holding());
        gesture.sample(1500.0);
        assert_eq!(gesture.progress_percent, 50.0);

        assert_eq!(gesture.release(HoldSource::Keyboard, 1600.0, &tuning), Release::Abandoned);
        assert!(!gesture.is_holding());
    }
}
