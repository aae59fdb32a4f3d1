//! Authentication store.
//!
//! Holds the authoritative login state for the dashboard and publishes a
//! [`AuthSnapshot`] to every subscriber whenever that state changes. The store
//! lives on the UI thread; async work reaches it only through
//! [`AuthMessage`]s routed by the application.

use std::sync::mpsc::{channel, Receiver, Sender};

use tracing::{debug, info};

/// Read access to the authentication state.
pub trait AuthSnapshotRead {
    /// A validation request is in flight.
    fn is_validating(&self) -> bool;
    /// The last validation succeeded and the session is active.
    fn is_logged_in(&self) -> bool;
    /// The last validation attempt was rejected.
    fn was_last_attempt_invalid(&self) -> bool;
    /// Message describing the last failed attempt (empty otherwise).
    fn last_attempt_message(&self) -> &str;
}

/// Subscribe/unsubscribe capability of a store.
pub trait AuthStoreListen {
    /// Register a new listener. Each call creates an independent registration.
    fn subscribe(&mut self) -> Subscription;
    /// Remove a registration created by [`AuthStoreListen::subscribe`].
    fn unsubscribe(&mut self, subscription: Subscription);
}

/// Immutable copy of the store state sent to listeners.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub validating: bool,
    pub logged_in: bool,
    pub last_attempt_invalid: bool,
    pub last_attempt_message: String,
}

impl AuthSnapshotRead for AuthSnapshot {
    fn is_validating(&self) -> bool {
        self.validating
    }

    fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    fn was_last_attempt_invalid(&self) -> bool {
        self.last_attempt_invalid
    }

    fn last_attempt_message(&self) -> &str {
        &self.last_attempt_message
    }
}

/// State transitions accepted by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMessage {
    /// A credential was submitted for validation
    ValidationStarted,
    /// The server accepted the credential
    ValidationSucceeded { token: String },
    /// The server rejected the credential or could not be reached
    ValidationFailed { message: String },
    /// The session was ended locally
    LoggedOut,
}

impl AuthMessage {
    fn description(&self) -> &'static str {
        match self {
            AuthMessage::ValidationStarted => "validation started",
            AuthMessage::ValidationSucceeded { .. } => "validation succeeded",
            AuthMessage::ValidationFailed { .. } => "validation failed",
            AuthMessage::LoggedOut => "logged out",
        }
    }
}

/// Identifier of a single store registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Handle returned by [`AuthStoreListen::subscribe`].
///
/// Owns the receiving end of the listener channel. Dropping it without
/// unsubscribing is tolerated: the store prunes the dead sender on its next
/// notification.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    rx: Receiver<AuthSnapshot>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Take every snapshot published since the last call, oldest first.
    pub fn pending(&self) -> Vec<AuthSnapshot> {
        self.rx.try_iter().collect()
    }
}

struct Listener {
    id: SubscriptionId,
    tx: Sender<AuthSnapshot>,
}

/// In-process authentication store.
#[derive(Default)]
pub struct AuthStore {
    snapshot: AuthSnapshot,
    /// Credential accepted by the server, kept for authenticated requests
    access_token: Option<String>,
    listeners: Vec<Listener>,
    next_id: u64,
}

impl AuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn snapshot(&self) -> &AuthSnapshot {
        &self.snapshot
    }

    /// Credential of the active session, if logged in.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Number of live registrations.
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    /// Apply a state transition and notify all listeners.
    pub fn apply(&mut self, message: AuthMessage) {
        debug!("Auth store: {}", message.description());

        match message {
            AuthMessage::ValidationStarted => {
                self.snapshot = AuthSnapshot {
                    validating: true,
                    ..AuthSnapshot::default()
                };
            }
            AuthMessage::ValidationSucceeded { token } => {
                info!("Credential accepted");
                self.access_token = Some(token);
                self.snapshot = AuthSnapshot {
                    logged_in: true,
                    ..AuthSnapshot::default()
                };
            }
            AuthMessage::ValidationFailed { message } => {
                info!("Credential rejected: {}", message);
                self.access_token = None;
                self.snapshot = AuthSnapshot {
                    last_attempt_invalid: true,
                    last_attempt_message: message,
                    ..AuthSnapshot::default()
                };
            }
            AuthMessage::LoggedOut => {
                info!("Session ended");
                self.access_token = None;
                self.snapshot = AuthSnapshot::default();
            }
        }

        self.notify();
    }

    fn notify(&mut self) {
        let snapshot = &self.snapshot;
        self.listeners.retain(|listener| {
            let alive = listener.tx.send(snapshot.clone()).is_ok();
            if !alive {
                debug!("Pruning dropped auth listener {:?}", listener.id);
            }
            alive
        });
    }
}

impl AuthSnapshotRead for AuthStore {
    fn is_validating(&self) -> bool {
        self.snapshot.is_validating()
    }

    fn is_logged_in(&self) -> bool {
        self.snapshot.is_logged_in()
    }

    fn was_last_attempt_invalid(&self) -> bool {
        self.snapshot.was_last_attempt_invalid()
    }

    fn last_attempt_message(&self) -> &str {
        self.snapshot.last_attempt_message()
    }
}

impl AuthStoreListen for AuthStore {
    fn subscribe(&mut self) -> Subscription {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        let (tx, rx) = channel();
        self.listeners.push(Listener { id, tx });
        debug!(
            "Auth listener {:?} subscribed ({} active)",
            id,
            self.listeners.len()
        );

        Subscription { id, rx }
    }

    fn unsubscribe(&mut self, subscription: Subscription) {
        self.listeners.retain(|listener| listener.id != subscription.id);
        debug!(
            "Auth listener {:?} unsubscribed ({} active)",
            subscription.id,
            self.listeners.len()
        );
    }
}
