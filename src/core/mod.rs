//! Core editor types and utilities

pub mod types;
pub mod error;
pub mod logging;
pub mod clock;

pub use types::*;
pub use error::Error;
pub use clock::{Clock, ManualClock, SystemClock};
