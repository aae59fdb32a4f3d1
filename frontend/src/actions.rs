//! Authentication actions.
//!
//! Views trigger these and never wait on them; outcomes reach the UI only as
//! [`AppMessage`]s that the application applies to the auth store.

use std::sync::mpsc::Sender;

use crate::api::{ApiClient, ApiError};
use crate::state::AppMessage;
use crate::store::AuthMessage;

/// Message shown when the server rejects the password.
pub const INVALID_PASSWORD_MESSAGE: &str = "Invalid password";
/// Message shown when the server cannot be reached.
pub const UNABLE_TO_CONNECT_MESSAGE: &str = "Unable to connect";

/// Fire-and-forget authentication actions.
pub trait AuthActions {
    /// Start validating `value` as the access password.
    fn validate_credential(&self, value: String);
    /// End the current session.
    fn log_out(&self);
}

// Cross-platform task spawning
#[cfg(target_arch = "wasm32")]
fn spawn_task<F>(future: F)
where
    F: std::future::Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
}

#[cfg(not(target_arch = "wasm32"))]
fn spawn_task<F>(future: F)
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    tokio::spawn(future);
}

/// Text shown on the login form for a failed validation.
pub fn failure_message(error: &ApiError) -> String {
    match error {
        ApiError::Unauthorized => INVALID_PASSWORD_MESSAGE.to_string(),
        ApiError::Network(_) => UNABLE_TO_CONNECT_MESSAGE.to_string(),
        other => other.to_string(),
    }
}

/// Actions backed by the home server API.
#[derive(Clone)]
pub struct ApiAuthActions {
    api: ApiClient,
    tx: Sender<AppMessage>,
    ctx: egui::Context,
}

impl ApiAuthActions {
    pub fn new(api: ApiClient, tx: Sender<AppMessage>, ctx: egui::Context) -> Self {
        Self { api, tx, ctx }
    }

    fn post(&self, message: AppMessage) {
        if self.tx.send(message).is_err() {
            tracing::warn!("Application channel closed, dropping message");
        }
        self.ctx.request_repaint();
    }
}

impl AuthActions for ApiAuthActions {
    fn validate_credential(&self, value: String) {
        self.post(AppMessage::Auth(AuthMessage::ValidationStarted));

        let api = self.api.clone();
        let tx = self.tx.clone();
        let ctx = self.ctx.clone();

        spawn_task(async move {
            match api.validate_password(&value).await {
                Ok(_) => {
                    let _ = tx.send(AppMessage::Auth(AuthMessage::ValidationSucceeded {
                        token: value.clone(),
                    }));
                    ctx.request_repaint();

                    match api.with_access_token(value).load_dashboard().await {
                        Ok(data) => {
                            let _ = tx.send(AppMessage::DataLoaded(data));
                        }
                        Err(e) => {
                            tracing::error!("Failed to load dashboard data: {}", e);
                            let _ = tx.send(AppMessage::DataLoadFailed(e.to_string()));
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Password validation failed: {}", e);
                    let _ = tx.send(AppMessage::Auth(AuthMessage::ValidationFailed {
                        message: failure_message(&e),
                    }));
                }
            }
            ctx.request_repaint();
        });
    }

    fn log_out(&self) {
        tracing::info!("Logging out");
        self.post(AppMessage::Auth(AuthMessage::LoggedOut));
    }
}
