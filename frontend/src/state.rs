//! Messages from async operations back to the UI thread.

use std::sync::mpsc::{channel, Receiver, Sender};

use crate::dashboard::DashboardData;
use crate::store::AuthMessage;

/// Messages sent from async operations to the main UI thread.
#[derive(Debug)]
pub enum AppMessage {
    /// Authentication state change, applied to the auth store
    Auth(AuthMessage),

    /// Initial dashboard data loaded after login
    DataLoaded(DashboardData),
    /// Initial dashboard data could not be loaded
    DataLoadFailed(String),
}

/// Mailbox the UI thread drains once per frame.
///
/// Async operations post through cloned senders; only the owner reads.
pub struct AppMailbox {
    tx: Sender<AppMessage>,
    rx: Receiver<AppMessage>,
}

impl AppMailbox {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self { tx, rx }
    }

    /// Sender handed to an async operation.
    pub fn sender(&self) -> Sender<AppMessage> {
        self.tx.clone()
    }

    /// Next queued message, if any. Never blocks.
    pub fn try_next(&self) -> Option<AppMessage> {
        self.rx.try_recv().ok()
    }

    /// Take every queued message, oldest first.
    pub fn pending(&self) -> Vec<AppMessage> {
        self.rx.try_iter().collect()
    }
}

impl Default for AppMailbox {
    fn default() -> Self {
        Self::new()
    }
}
