//! Notification channel
//!
//! Fire-and-forget, human-readable success/error messages emitted by the
//! record store once per mutation attempt and on read failures.

use std::fmt;

use crossbeam::channel::{self, Receiver, Sender};

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A single user-visible message
#[derive(Debug, Clone, PartialEq, Eq)]
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

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NotificationKind::Success => write!(f, "[ok] {}", self.message),
            NotificationKind::Error => write!(f, "[error] {}", self.message),
        }
    }
}

/// Sink for notifications
///
/// Implementations must not block and must not fail the caller.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Publishes notifications on an unbounded channel
#[derive(Clone)]
pub struct ChannelNotifier {
    sender: Sender<Notification>,
}

impl ChannelNotifier {
    /// Create the notifier and the receiving end for the UI
    pub fn new() -> (Self, Receiver<Notification>) {
        let (sender, receiver) = channel::unbounded();
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        // Nobody listening is fine
        if let Err(e) = self.sender.send(notification) {
            tracing::trace!("notification dropped: {}", e.into_inner().message);
        }
    }
}

/// Writes notifications to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => tracing::info!(target: "samplebook::notify", "{}", notification.message),
            NotificationKind::Error => tracing::warn!(target: "samplebook::notify", "{}", notification.message),
        }
    }
}
