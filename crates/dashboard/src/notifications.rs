//! Flash notifications.
//!
//! A notification queued before a redirect is stored in the session and
//! shown once on the next page render.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

const NOTIFICATIONS_KEY: &str = "notifications";

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// A message shown in the notification area at the top of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }

    /// CSS modifier class for the notification.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self.kind {
            NotificationKind::Success => "notification--success",
            NotificationKind::Error => "notification--error",
        }
    }

    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self.kind {
            NotificationKind::Success => "Success",
            NotificationKind::Error => "Error",
        }
    }
}

/// Queue a notification for the next page render.
///
/// Session failures are logged; a lost notification never fails the request.
pub async fn push(session: &Session, notification: Notification) {
    let mut pending = match session.get::<Vec<Notification>>(NOTIFICATIONS_KEY).await {
        Ok(pending) => pending.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read pending notifications");
            Vec::new()
        }
    };
    pending.push(notification);

    if let Err(e) = session.insert(NOTIFICATIONS_KEY, pending).await {
        tracing::warn!(error = %e, "Failed to store notification");
    }
}

/// Remove and return all queued notifications.
pub async fn take(session: &Session) -> Vec<Notification> {
    match session.remove::<Vec<Notification>>(NOTIFICATIONS_KEY).await {
        Ok(pending) => pending.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read notifications");
            Vec::new()
        }
    }
}
