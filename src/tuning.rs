//! Data-driven game balance
//!
//! Motion values are per-tick coefficients at the 60 Hz reference rate
//! (see [`crate::consts::REFERENCE_DT`]). Durations are in milliseconds,
//! lengths in CSS pixels measured from the bottom-left of the playfield.

use serde::{Deserialize, Serialize};

use crate::sim::HoldSource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Upward velocity applied by a grounded jump (px per tick)
    pub jump_power: f32,
    /// Velocity lost per tick while airborne
    pub gravity: f32,
    /// Fraction of `jump_power` applied by the second jump
    pub double_jump_factor: f32,

    /// Horizontal obstacle speed (px per tick)
    pub obstacle_speed: f32,
    /// Sprite width shared by the runner and both obstacles
    pub entity_width: f32,
    /// Horizontal hitbox inset on each side of a sprite
    pub hitbox_inset: f32,
    /// Runner's fixed left anchor
    pub runner_left: f32,
    /// Ground line (bottom edge of the runner when grounded)
    pub base_bottom: f32,
    /// Obstacle height above the ground line the runner must clear
    pub obstacle_height: f32,

    /// Chance that a villain exit is followed by a good guy encounter
    pub good_guy_chance: f64,

    /// Delay after a terminal phase before restart is accepted
    pub restart_debounce_ms: f64,
    /// Hold duration to complete a keyboard hold
    pub key_hold_window_ms: f64,
    /// Hold duration to complete a touch hold
    pub touch_hold_window_ms: f64,
    /// Touches released sooner than this are jumps, not holds
    pub tap_grace_ms: f64,
    /// Gesture sampling period
    pub sample_interval_ms: f64,
    /// How long the "missed" notice stays up
    pub miss_notice_ms: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            jump_power: 18.0,
            gravity: 0.8,
            double_jump_factor: 0.9,

            obstacle_speed: 5.0,
            entity_width: 300.0,
            hitbox_inset: 80.0,
            runner_left: 50.0,
            base_bottom: 200.0,
            obstacle_height: 170.0,

            good_guy_chance: 0.4,

            restart_debounce_ms: 1000.0,
            key_hold_window_ms: 3000.0,
            touch_hold_window_ms: 1000.0,
            tap_grace_ms: 250.0,
            sample_interval_ms: 50.0,
            miss_notice_ms: 1500.0,
        }
    }
}

impl Tuning {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "id_runner_tuning";

    /// Parse a tuning override; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    /// Clamp values that would break the simulation
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.gravity > 0.0) {
            self.gravity = defaults.gravity;
        }
        if !(self.obstacle_speed > 0.0) {
            self.obstacle_speed = defaults.obstacle_speed;
        }
        self.jump_power = self.jump_power.max(0.0);
        self.double_jump_factor = self.double_jump_factor.clamp(0.0, 1.0);
        self.entity_width = self.entity_width.max(1.0);
        self.hitbox_inset = self.hitbox_inset.clamp(0.0, self.entity_width / 2.0);
        self.good_guy_chance = self.good_guy_chance.clamp(0.0, 1.0);
        self.restart_debounce_ms = self.restart_debounce_ms.max(1000.0);
        self.key_hold_window_ms = self.key_hold_window_ms.max(1.0);
        self.touch_hold_window_ms = self.touch_hold_window_ms.max(1.0);
        self.tap_grace_ms = self.tap_grace_ms.max(0.0);
        self.sample_interval_ms = self.sample_interval_ms.max(1.0);
        self.miss_notice_ms = self.miss_notice_ms.max(0.0);
        self
    }

    /// Hold duration for an input source
    pub fn hold_window_ms(&self, source: HoldSource) -> f64 {
        match source {
            HoldSource::Keyboard => self.key_hold_window_ms,
            HoldSource::Touch => self.touch_hold_window_ms,
        }
    }

    /// Load tuning overrides from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning overrides from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {}", e),
                }
            }
        }

        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
