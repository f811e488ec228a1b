//! Editor commands and their vocabulary

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::history::ActionKind;

/// Property the arrow keys change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformMode {
    #[default]
    Position,
    Rotation,
    Scale,
}

impl TransformMode {
    pub const ALL: [TransformMode; 3] = [TransformMode::Position, TransformMode::Rotation, TransformMode::Scale];

    pub fn kind(self) -> ActionKind {
        match self {
            TransformMode::Position => ActionKind::Position,
            TransformMode::Rotation => ActionKind::Rotation,
            TransformMode::Scale => ActionKind::Scale,
        }
    }

    pub fn label(self) -> &'static str {
        self.kind().label()
    }

    /// Parse `position`, `rotation` or `scale`.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.label() == s)
    }
}

impl fmt::Display for TransformMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Arrow direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// `+1` for up/right, `-1` for down/left.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Up | Direction::Right => 1.0,
            Direction::Down | Direction::Left => -1.0,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

/// Everything a key chord can ask the editor to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorCommand {
    Save,
    Undo,
    Redo,
    SetMode(TransformMode),
    Nudge(Direction),
    SetMultiplier(u8),
    Remove,
    Deselect,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!(TransformMode::parse("rotation"), Some(TransformMode::Rotation));
        assert_eq!(TransformMode::parse("scale"), Some(TransformMode::Scale));
        assert_eq!(TransformMode::parse("remove"), None);
        assert_eq!(TransformMode::Position.kind(), ActionKind::Position);
    }

    #[test]
    fn test_direction_sign() {
        assert_eq!(Direction::Up.sign(), 1.0);
        assert_eq!(Direction::Left.sign(), -1.0);
        assert!(Direction::Down.is_vertical());
        assert!(!Direction::Right.is_vertical());
    }
}
