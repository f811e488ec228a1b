//! Key chord to editor command translation

use winit::keyboard::{KeyCode, ModifiersState};

use super::command::{Direction, EditorCommand, TransformMode};

/// A key plus the modifiers held with it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyChord {
    pub key: KeyCode,
    pub modifiers: ModifiersState,
}

impl KeyChord {
    /// Just a key
    pub fn key(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: ModifiersState::empty(),
        }
    }

    /// Ctrl + key
    pub fn ctrl(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: ModifiersState::CONTROL,
        }
    }

    /// Ctrl + Shift + key
    pub fn ctrl_shift(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: ModifiersState::CONTROL | ModifiersState::SHIFT,
        }
    }

    /// Chord from a key name such as `KeyZ`, `z`, `ArrowUp` or `Numpad3`.
    ///
    /// Only keys the editor binds have names.
    pub fn parse(name: &str, ctrl: bool, shift: bool) -> Option<Self> {
        let mut modifiers = ModifiersState::empty();
        if ctrl {
            modifiers |= ModifiersState::CONTROL;
        }
        if shift {
            modifiers |= ModifiersState::SHIFT;
        }
        Some(Self {
            key: key_code(name)?,
            modifiers,
        })
    }

    fn ctrl_down(&self) -> bool {
        self.modifiers.control_key()
    }

    fn shift_down(&self) -> bool {
        self.modifiers.shift_key()
    }
}

/// Resolve a chord against the layers currently bound.
///
/// Shortcuts need editing enabled; transform keys need an edit target.
pub fn resolve(chord: KeyChord, enabled: bool, editing: bool) -> Option<EditorCommand> {
    if enabled {
        if let Some(cmd) = shortcut(chord) {
            return Some(cmd);
        }
    }
    if editing {
        return transform(chord);
    }
    None
}

fn shortcut(chord: KeyChord) -> Option<EditorCommand> {
    if !chord.ctrl_down() {
        return None;
    }
    match (chord.key, chord.shift_down()) {
        (KeyCode::KeyS, false) => Some(EditorCommand::Save),
        (KeyCode::KeyZ, false) => Some(EditorCommand::Undo),
        (KeyCode::KeyZ, true) => Some(EditorCommand::Redo),
        _ => None,
    }
}

fn transform(chord: KeyChord) -> Option<EditorCommand> {
    let cmd = match chord.key {
        KeyCode::KeyT => EditorCommand::SetMode(TransformMode::Position),
        KeyCode::KeyY => EditorCommand::SetMode(TransformMode::Scale),
        KeyCode::KeyR => EditorCommand::SetMode(TransformMode::Rotation),

        KeyCode::ArrowUp => EditorCommand::Nudge(Direction::Up),
        KeyCode::ArrowDown => EditorCommand::Nudge(Direction::Down),
        KeyCode::ArrowLeft => EditorCommand::Nudge(Direction::Left),
        KeyCode::ArrowRight => EditorCommand::Nudge(Direction::Right),

        KeyCode::KeyM if chord.ctrl_down() => EditorCommand::Remove,
        KeyCode::KeyQ => EditorCommand::Deselect,

        key => return digit(key).map(EditorCommand::SetMultiplier),
    };
    Some(cmd)
}

fn key_code(name: &str) -> Option<KeyCode> {
    let key = match name {
        "KeyS" | "s" | "S" => KeyCode::KeyS,
        "KeyZ" | "z" | "Z" => KeyCode::KeyZ,
        "KeyT" | "t" | "T" => KeyCode::KeyT,
        "KeyY" | "y" | "Y" => KeyCode::KeyY,
        "KeyR" | "r" | "R" => KeyCode::KeyR,
        "KeyM" | "m" | "M" => KeyCode::KeyM,
        "KeyQ" | "q" | "Q" => KeyCode::KeyQ,
        "ArrowUp" | "Up" => KeyCode::ArrowUp,
        "ArrowDown" | "Down" => KeyCode::ArrowDown,
        "ArrowLeft" | "Left" => KeyCode::ArrowLeft,
        "ArrowRight" | "Right" => KeyCode::ArrowRight,
        "Digit1" | "1" => KeyCode::Digit1,
        "Digit2" | "2" => KeyCode::Digit2,
        "Digit3" | "3" => KeyCode::Digit3,
        "Digit4" | "4" => KeyCode::Digit4,
        "Digit5" | "5" => KeyCode::Digit5,
        "Digit6" | "6" => KeyCode::Digit6,
        "Digit7" | "7" => KeyCode::Digit7,
        "Digit8" | "8" => KeyCode::Digit8,
        "Digit9" | "9" => KeyCode::Digit9,
        "Numpad1" => KeyCode::Numpad1,
        "Numpad2" => KeyCode::Numpad2,
        "Numpad3" => KeyCode::Numpad3,
        "Numpad4" => KeyCode::Numpad4,
        "Numpad5" => KeyCode::Numpad5,
        "Numpad6" => KeyCode::Numpad6,
        "Numpad7" => KeyCode::Numpad7,
        "Numpad8" => KeyCode::Numpad8,
        "Numpad9" => KeyCode::Numpad9,
        _ => return None,
    };
    Some(key)
}

fn digit(key: KeyCode) -> Option<u8> {
    let n = match key {
        KeyCode::Digit1 | KeyCode::Numpad1 => 1,
        KeyCode::Digit2 | KeyCode::Numpad2 => 2,
        KeyCode::Digit3 | KeyCode::Numpad3 => 3,
        KeyCode::Digit4 | KeyCode::Numpad4 => 4,
        KeyCode::Digit5 | KeyCode::Numpad5 => 5,
        KeyCode::Digit6 | KeyCode::Numpad6 => 6,
        KeyCode::Digit7 | KeyCode::Numpad7 => 7,
        KeyCode::Digit8 | KeyCode::Numpad8 => 8,
        KeyCode::Digit9 | KeyCode::Numpad9 => 9,
        _ => return None,
    };
    Some(n)
}
