//! Keyboard-driven placement editor

pub mod command;
pub mod config;
pub mod controller;
pub mod focus;
pub mod keymap;
pub mod remote;
pub mod status;

pub use command::{Direction, EditorCommand, TransformMode};
pub use config::EditorConfig;
pub use controller::{Editor, EditorState};
pub use focus::{BindingEvent, FocusState, InputBinding, InputFocus, Layer, NullBinding, RecordingBinding};
pub use keymap::KeyChord;
pub use status::{EditorStatus, TargetStatus};
