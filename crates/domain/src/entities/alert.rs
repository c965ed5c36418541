//! Derived weather alert

use serde::{Deserialize, Serialize};

/// A title/body pair derived from a weather snapshot
///
/// Never persisted; recomputed on every trigger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Alert {
    /// Notification title, e.g. `22°C - Slight rain`
    pub title: String,
    /// Notification body
    pub body: String,
}

impl Alert {
    /// Create an alert
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}
