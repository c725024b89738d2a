//! Page-level capabilities: navigation and blocking alerts.

use std::sync::{Mutex, PoisonError};

use url::Url;

pub trait Navigator: Send + Sync {
    fn navigate(&self, target: &Url);
}

pub trait Notifier: Send + Sync {
    /// Interrupting, user-facing message.
    fn alert(&self, message: &str);
}

/// Records navigation targets instead of leaving the page.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    targets: Mutex<Vec<Url>>,
}

impl RecordingNavigator {
    pub fn new() -> Self { Self::default() }

    pub fn targets(&self) -> Vec<Url> {
        self.targets.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, target: &Url) {
        self.targets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(target.clone());
    }
}

/// Records alerts instead of showing them.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    alerts: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self { Self::default() }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}
