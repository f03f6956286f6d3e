//! Browser input mapping
//!
//! Space jumps, Enter is held for the good guys, touches hold (or jump when
//! short). In the intro and end screens the hold input restarts instead.
//! `i` toggles the autopilot and `m` the missed good guy rule.
//! Pure functions over DOM key names so they can be tested natively.

use crate::sim::{GamePhase, HoldSource};

/// A player command for the game facade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Jump,
    BeginHold(HoldSource),
    EndHold(HoldSource),
    Restart,
    ToggleAutopilot,
    ToggleMissPolicy,
}

/// `KeyboardEvent.key` / `.code` pair on keydown
pub fn key_down(key: &str, code: &str, repeat: bool, phase: GamePhase) -> Option<Command> {
    if code == "Space" || key == " " || key == "ArrowUp" {
        // Held Space must not machine-gun the double jump
        return (!repeat).then_some(Command::Jump);
    }
    if repeat {
        return None;
    }
    match key {
        "Enter" if phase == GamePhase::Playing => Some(Command::BeginHold(HoldSource::Keyboard)),
        "Enter" => Some(Command::Restart),
        "i" | "I" => Some(Command::ToggleAutopilot),
        "m" | "M" => Some(Command::ToggleMissPolicy),
        _ => None,
    }
}

pub fn key_up(key: &str) -> Option<Command> {
    (key == "Enter").then_some(Command::EndHold(HoldSource::Keyboard))
}

pub fn touch_start(phase: GamePhase) -> Command {
    if phase == GamePhase::Playing {
        Command::BeginHold(HoldSource::Touch)
    } else {
        Command::Restart
    }
}

pub fn touch_end() -> Command {
    Command::EndHold(HoldSource::Touch)
}
