//! Abstract commands and the keys that trigger them.

use crate::{InputState, KeyCode};

/// Everything the keyboard can ask the scene to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Quit,
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    FogDenser,
    FogThinner,
    SpotlightLeft,
    SpotlightRight,
    SpotlightUp,
    SpotlightDown,
    SpotlightGrow,
    SpotlightShrink,
    ToggleGouraud,
    ToggleBlinn,
    CycleCamera,
}

/// When a bound key fires its command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Every frame the key is down.
    Held,
    /// Once, on the frame the key goes up.
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub key: KeyCode,
    pub command: Command,
    pub trigger: Trigger,
}

/// Ordered key bindings. Commands are reported in binding order.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyBindings {
    bindings: Vec<Binding>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Command::*;
        use Trigger::*;

        let table = [
            (KeyCode::Escape, Quit, Held),
            (KeyCode::KeyW, MoveForward, Held),
            (KeyCode::KeyS, MoveBackward, Held),
            (KeyCode::KeyA, MoveLeft, Held),
            (KeyCode::KeyD, MoveRight, Held),
            (KeyCode::KeyF, FogDenser, Held),
            (KeyCode::KeyG, FogThinner, Held),
            (KeyCode::ArrowLeft, SpotlightLeft, Held),
            (KeyCode::ArrowRight, SpotlightRight, Held),
            (KeyCode::ArrowUp, SpotlightUp, Held),
            (KeyCode::ArrowDown, SpotlightDown, Held),
            (KeyCode::NumpadAdd, SpotlightGrow, Held),
            (KeyCode::NumpadSubtract, SpotlightShrink, Held),
            (KeyCode::KeyP, ToggleGouraud, Released),
            (KeyCode::KeyB, ToggleBlinn, Released),
            (KeyCode::KeyK, CycleCamera, Released),
        ];

        Self {
            bindings: table
                .into_iter()
                .map(|(key, command, trigger)| Binding { key, command, trigger })
                .collect(),
        }
    }
}

impl KeyBindings {
    /// Commands firing this frame.
    pub fn active_commands(&self, input: &InputState) -> Vec<Command> {
        self.bindings
            .iter()
            .filter(|b| match b.trigger {
                Trigger::Held => input.is_key_held(b.key),
                Trigger::Released => input.is_key_released(b.key),
            })
            .map(|b| b.command)
            .collect()
    }
}
