//! Save-time reconciliation of session edits

pub mod notifier;
pub mod store;
pub mod tracker;

pub use notifier::{NotificationLog, Notifier, Severity, log_notifier};
pub use store::{FnStore, JsonFileStore, MemoryStore, RecordStore, StoreFuture};
pub use tracker::{DifferenceTracker, SaveOutcome, UPLOAD_COMPLETE};
