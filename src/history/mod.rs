//! Edit history: recorded actions and the coalescing undo/redo stack.

pub mod action;
pub mod stack;

pub use action::{Action, ActionKind, ApplyAction, Offset};
pub use stack::{ActionStack, DEFAULT_THRESHOLD_MS};
