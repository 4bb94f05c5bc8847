//! User-facing side channels: desktop notifications and the settings page.

use crate::error::SearchResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Length of the message prefix used as notification id.
const NOTIFICATION_ID_LEN: usize = 20;

/// A desktop notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Derived from the message so repeats replace each other.
    pub id: String,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            id: message.chars().take(NOTIFICATION_ID_LEN).collect(),
            title: title.into(),
            message,
        }
    }
}

/// Shows desktop notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: Notification) -> SearchResult<()>;
}

/// Opens the external settings UI.
#[async_trait]
pub trait SettingsPage: Send + Sync {
    async fn open(&self) -> SearchResult<()>;
}
