//! Core type aliases and re-exports

pub use glam::DVec3;

/// Standard Result type for the editor
pub type Result<T> = std::result::Result<T, crate::core::error::Error>;
