//! mapedit - edit history and save reconciliation for map object placement

pub mod core;
pub mod diff;
pub mod editor;
pub mod history;
pub mod scene;
