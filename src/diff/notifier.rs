//! User-facing notifications

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// How a notification should be presented.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Danger,
}

/// Callback receiving user-visible messages.
pub type Notifier = Arc<dyn Fn(&str, Severity) + Send + Sync>;

/// Notifier that only writes to the log.
pub fn log_notifier() -> Notifier {
    Arc::new(|msg: &str, severity: Severity| match severity {
        Severity::Success => log::info!("{}", msg),
        Severity::Warning => log::warn!("{}", msg),
        Severity::Danger => log::error!("{}", msg),
    })
}

/// Keeps every notification in memory, e.g. for a toast panel.
#[derive(Clone, Default)]
pub struct NotificationLog {
    entries: Arc<Mutex<Vec<(String, Severity)>>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier appending to this log.
    pub fn notifier(&self) -> Notifier {
        let entries = Arc::clone(&self.entries);
        Arc::new(move |msg: &str, severity: Severity| {
            if let Ok(mut entries) = entries.lock() {
                entries.push((msg.to_string(), severity));
            }
        })
    }

    pub fn entries(&self) -> Vec<(String, Severity)> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<(String, Severity)> {
        self.entries.lock().ok().and_then(|e| e.last().cloned())
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries
            .lock()
            .map(|e| e.iter().filter(|(_, s)| *s == severity).count())
            .unwrap_or(0)
    }
}
