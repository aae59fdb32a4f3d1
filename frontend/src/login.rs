//! Login UI component.
//!
//! A password field with a submit button while idle, replaced by a spinner
//! and status line while a credential is being validated or the dashboard
//! data is loading. Authentication itself belongs to the auth store and
//! actions; this view only mirrors the store and forwards submissions.

use egui::{Align2, Color32, Context, Key, Vec2, Window};
use serde::{Deserialize, Serialize};

use crate::actions::AuthActions;
use crate::store::{AuthSnapshotRead, AuthStoreListen, Subscription};

/// Status line shown while the password is being checked.
pub const VALIDATING_MESSAGE: &str = "Validating password…";
/// Status line shown after login while the dashboard data loads.
pub const LOADING_DATA_MESSAGE: &str = "Loading data…";

/// When the password field takes keyboard focus back after a store change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(not(target_arch = "wasm32"), derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum RefocusPolicy {
    /// Refocus on every change except while validating and logged in at once
    #[default]
    UnlessValidatingAndLoggedIn,
    /// Refocus only when neither validating nor logged in
    IdleOnly,
}

impl RefocusPolicy {
    fn should_refocus(self, validating: bool, logged_in: bool) -> bool {
        match self {
            RefocusPolicy::UnlessValidatingAndLoggedIn => !(validating && logged_in),
            RefocusPolicy::IdleOnly => !validating && !logged_in,
        }
    }
}

/// Which sub-view is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStatus {
    /// Password entry
    Idle,
    /// Spinner while the credential is checked
    Validating,
    /// Spinner while post-login data loads
    LoggedIn,
}

/// Pending keyboard focus change, applied when the password field is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusRequest {
    /// Give the password field keyboard focus
    PasswordField,
    /// Take focus away from the password field (hides on-screen keyboards)
    Release,
}

/// A key press inside the password field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keystroke {
    Enter,
    Other,
}

impl From<Key> for Keystroke {
    fn from(key: Key) -> Self {
        match key {
            Key::Enter => Keystroke::Enter,
            _ => Keystroke::Other,
        }
    }
}

/// Login view state
pub struct LoginView {
    /// Password input
    pub password: String,
    /// Whether the input is marked invalid
    invalid: bool,
    /// Error shown under the input while invalid
    error_message: String,
    /// Text beside the spinner
    status_message: &'static str,
    /// Last flags reported by the store
    validating: bool,
    logged_in: bool,
    pending_focus: Option<FocusRequest>,
    /// Set by a submission until the store reports back
    awaiting_store: bool,
    refocus: RefocusPolicy,
    subscription: Option<Subscription>,
}

impl Default for LoginView {
    fn default() -> Self {
        Self::new(RefocusPolicy::default())
    }
}

impl LoginView {
    pub fn new(refocus: RefocusPolicy) -> Self {
        Self {
            password: String::new(),
            invalid: false,
            error_message: String::new(),
            status_message: VALIDATING_MESSAGE,
            validating: false,
            logged_in: false,
            pending_focus: None,
            awaiting_store: false,
            refocus,
            subscription: None,
        }
    }

    /// Start listening to `store` and focus the password field.
    ///
    /// Mounting twice keeps the existing registration.
    pub fn mount(&mut self, store: &mut impl AuthStoreListen) {
        self.pending_focus = Some(FocusRequest::PasswordField);

        if self.subscription.is_some() {
            tracing::debug!("Login view already mounted");
            return;
        }
        let subscription = store.subscribe();
        tracing::debug!("Login view listening as {:?}", subscription.id());
        self.subscription = Some(subscription);
    }

    /// Stop listening to `store`.
    pub fn unmount(&mut self, store: &mut impl AuthStoreListen) {
        if let Some(subscription) = self.subscription.take() {
            store.unsubscribe(subscription);
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    /// Apply every store notification received since the last poll.
    pub fn poll_store(&mut self) {
        let pending = match self.subscription {
            Some(ref subscription) => subscription.pending(),
            None => return,
        };
        for snapshot in &pending {
            self.on_store_change(snapshot);
        }
    }

    /// Re-derive view state from the store.
    pub fn on_store_change(&mut self, store: &impl AuthSnapshotRead) {
        self.awaiting_store = false;
        self.validating = store.is_validating();
        self.logged_in = store.is_logged_in();

        self.status_message = if self.validating {
            VALIDATING_MESSAGE
        } else {
            LOADING_DATA_MESSAGE
        };

        if store.was_last_attempt_invalid() {
            self.invalid = true;
            self.error_message = store.last_attempt_message().to_string();
        }

        if self.refocus.should_refocus(self.validating, self.logged_in) {
            self.pending_focus = Some(FocusRequest::PasswordField);
        }
    }

    /// Handle a key pressed in the password field.
    pub fn handle_key(&mut self, key: Keystroke, actions: &dyn AuthActions) {
        match key {
            Keystroke::Enter => self.submit(actions),
            Keystroke::Other => {
                if self.invalid {
                    self.invalid = false;
                }
            }
        }
    }

    /// Release focus and ask the actions to validate the current input.
    ///
    /// Further submissions are ignored until the next store notification.
    /// The release is applied in the frame that submitted, so a refocus
    /// requested by that notification may replace it.
    pub fn submit(&mut self, actions: &dyn AuthActions) {
        if self.awaiting_store {
            tracing::debug!("Submission already in flight, ignoring");
            return;
        }
        self.awaiting_store = true;
        self.pending_focus = Some(FocusRequest::Release);
        tracing::info!("Submitting password for validation");
        actions.validate_credential(self.password.clone());
    }

    pub fn status(&self) -> ViewStatus {
        if self.validating {
            ViewStatus::Validating
        } else if self.logged_in {
            ViewStatus::LoggedIn
        } else {
            ViewStatus::Idle
        }
    }

    /// Whether the spinner view replaces the password field.
    pub fn shows_status(&self) -> bool {
        self.status() != ViewStatus::Idle
    }

    pub fn is_invalid(&self) -> bool {
        self.invalid
    }

    pub fn error_message(&self) -> Option<&str> {
        self.invalid.then_some(self.error_message.as_str())
    }

    pub fn status_message(&self) -> &'static str {
        self.status_message
    }

    pub fn pending_focus(&self) -> Option<FocusRequest> {
        self.pending_focus
    }

    /// Show the login window.
    pub fn show(&mut self, ctx: &Context, actions: &dyn AuthActions) {
        Window::new("Login")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                ui.heading("Hearth");
                ui.add_space(10.0);

                if self.shows_status() {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(self.status_message);
                    });
                    return;
                }

                self.show_password_form(ui, actions);
            });
    }

    fn show_password_form(&mut self, ui: &mut egui::Ui, actions: &dyn AuthActions) {
        ui.label("Password:");

        let mut edit = egui::TextEdit::singleline(&mut self.password)
            .password(true)
            .hint_text("Password");
        if self.invalid {
            edit = edit.text_color(Color32::RED);
        }
        let response = ui.add(edit);

        match self.pending_focus.take() {
            Some(FocusRequest::PasswordField) => response.request_focus(),
            Some(FocusRequest::Release) => response.surrender_focus(),
            None => {}
        }

        // Singleline edits drop focus on Enter, so check both
        if response.has_focus() || response.lost_focus() {
            let keystrokes: Vec<Keystroke> = ui.input(|i| {
                i.events
                    .iter()
                    .filter_map(|event| match event {
                        egui::Event::Key {
                            key,
                            pressed: true,
                            repeat: false,
                            ..
                        } => Some(Keystroke::from(*key)),
                        egui::Event::Text(_) => Some(Keystroke::Other),
                        _ => None,
                    })
                    .collect()
            });
            for key in keystrokes {
                self.handle_key(key, actions);
            }
        }

        if let Some(error) = self.error_message() {
            ui.colored_label(Color32::RED, error);
        }

        ui.add_space(10.0);

        if ui.button("Log In").clicked() {
            self.submit(actions);
        }

        if self.pending_focus == Some(FocusRequest::Release) {
            self.pending_focus = None;
            response.surrender_focus();
        }
    }
}
