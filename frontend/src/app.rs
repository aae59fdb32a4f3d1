//! Main application structure.

use egui::Context;

use crate::actions::{ApiAuthActions, AuthActions};
use crate::api::ApiClient;
use crate::config::Config;
use crate::dashboard::{self, DashboardData};
use crate::login::{LoginView, RefocusPolicy};
use crate::state::{AppMailbox, AppMessage};
use crate::store::{AuthMessage, AuthSnapshotRead, AuthStore};

/// The main Hearth application.
pub struct HearthApp {
    /// Authoritative login state
    store: AuthStore,
    /// Channel-based state management
    mailbox: AppMailbox,
    /// Actions dispatched by the views
    actions: ApiAuthActions,
    /// Login view, present while the dashboard is not shown
    login_view: Option<LoginView>,
    /// Data loaded after login
    dashboard: Option<DashboardData>,
    /// Focus policy handed to each new login view
    refocus: RefocusPolicy,
    /// Password submitted on the first frame
    startup_password: Option<String>,
}

impl HearthApp {
    /// Create the app from the eframe creation context.
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        Self::with_context(cc.egui_ctx.clone(), config)
    }

    pub fn with_context(ctx: Context, config: Config) -> Self {
        let api = ApiClient::new(config.server_url);
        tracing::info!("Using home server at {}", api.base_url());

        let mailbox = AppMailbox::new();
        let actions = ApiAuthActions::new(api, mailbox.sender(), ctx);

        Self {
            store: AuthStore::new(),
            mailbox,
            actions,
            login_view: None,
            dashboard: None,
            refocus: config.refocus,
            startup_password: config.password,
        }
    }

    /// The dashboard replaces the login view once logged in and loaded.
    fn shows_dashboard(&self) -> bool {
        self.store.is_logged_in() && self.dashboard.is_some()
    }

    /// Process all pending channel messages.
    fn process_messages(&mut self) {
        while let Some(msg) = self.mailbox.try_next() {
            match msg {
                AppMessage::Auth(message) => {
                    if message == AuthMessage::LoggedOut {
                        self.dashboard = None;
                    }
                    self.store.apply(message);
                }
                AppMessage::DataLoaded(data) => {
                    if self.store.is_logged_in() {
                        tracing::info!("Dashboard data loaded: {} entities", data.states.len());
                        self.dashboard = Some(data);
                    } else {
                        tracing::debug!("Discarding dashboard data, session no longer active");
                    }
                }
                AppMessage::DataLoadFailed(error) => {
                    self.dashboard = None;
                    self.store.apply(AuthMessage::ValidationFailed {
                        message: format!("Unable to load data: {}", error),
                    });
                }
            }
        }
    }

    /// Mount or drop the login view to match the current state.
    fn route(&mut self) {
        if self.shows_dashboard() {
            if let Some(mut view) = self.login_view.take() {
                tracing::debug!("Showing dashboard, unmounting login view");
                view.unmount(&mut self.store);
            }
        } else if self.login_view.is_none() {
            tracing::debug!("Mounting login view");
            let mut view = LoginView::new(self.refocus);
            view.mount(&mut self.store);
            view.on_store_change(&self.store);
            self.login_view = Some(view);
        }
    }
}

impl eframe::App for HearthApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        if let Some(password) = self.startup_password.take() {
            tracing::info!("Submitting configured password");
            self.actions.validate_credential(password);
        }

        self.process_messages();
        self.route();

        if let Some(view) = self.login_view.as_mut() {
            view.poll_store();
            view.show(ctx, &self.actions);
        } else if let Some(data) = self.dashboard.as_ref() {
            dashboard::show(ctx, data, &self.actions);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::login::ViewStatus;
    use hearth_types::ConfigResponse;

    fn test_app() -> HearthApp {
        HearthApp::with_context(Context::default(), Config::default())
    }

    fn dashboard_data() -> DashboardData {
        DashboardData::new(
            ConfigResponse {
                location_name: "Home".to_string(),
                version: "0.1.0".to_string(),
                components: vec!["light".to_string()],
            },
            vec![],
        )
    }

    fn send(app: &HearthApp, msg: AppMessage) {
        app.mailbox.sender().send(msg).unwrap();
    }

    fn step(app: &mut HearthApp) {
        app.process_messages();
        app.route();
        if let Some(view) = app.login_view.as_mut() {
            view.poll_store();
        }
    }

    #[test]
    fn test_login_view_mounted_initially() {
        let mut app = test_app();
        step(&mut app);

        assert!(app.login_view.is_some());
        assert_eq!(app.store.subscriber_count(), 1);
        assert!(!app.shows_dashboard());
    }

    #[test]
    fn test_login_view_stays_until_data_loaded() {
        let mut app = test_app();
        step(&mut app);

        send(&app, AppMessage::Auth(AuthMessage::ValidationStarted));
        step(&mut app);
        assert_eq!(
            app.login_view.as_ref().map(|v| v.status()),
            Some(ViewStatus::Validating)
        );

        send(
            &app,
            AppMessage::Auth(AuthMessage::ValidationSucceeded {
                token: "hunter2".to_string(),
            }),
        );
        step(&mut app);
        let view = app.login_view.as_ref().unwrap();
        assert_eq!(view.status(), ViewStatus::LoggedIn);
        assert_eq!(view.status_message(), "Loading data…");

        send(&app, AppMessage::DataLoaded(dashboard_data()));
        step(&mut app);
        assert!(app.shows_dashboard());
        assert!(app.login_view.is_none());
        assert_eq!(app.store.subscriber_count(), 0);
    }

    #[test]
    fn test_logout_remounts_login_view() {
        let mut app = test_app();
        step(&mut app);
        send(
            &app,
            AppMessage::Auth(AuthMessage::ValidationSucceeded {
                token: "hunter2".to_string(),
            }),
        );
        send(&app, AppMessage::DataLoaded(dashboard_data()));
        step(&mut app);
        assert!(app.shows_dashboard());

        send(&app, AppMessage::Auth(AuthMessage::LoggedOut));
        step(&mut app);

        assert!(app.dashboard.is_none());
        let view = app.login_view.as_ref().unwrap();
        assert_eq!(view.status(), ViewStatus::Idle);
        assert!(view.password.is_empty());
        assert_eq!(app.store.subscriber_count(), 1);
    }

    #[test]
    fn test_data_load_failure_surfaces_on_login_view() {
        let mut app = test_app();
        step(&mut app);
        send(
            &app,
            AppMessage::Auth(AuthMessage::ValidationSucceeded {
                token: "hunter2".to_string(),
            }),
        );
        send(
            &app,
            AppMessage::DataLoadFailed("HTTP 500 error: boom".to_string()),
        );
        step(&mut app);

        assert!(!app.shows_dashboard());
        let view = app.login_view.as_ref().unwrap();
        assert_eq!(view.status(), ViewStatus::Idle);
        assert_eq!(
            view.error_message(),
            Some("Unable to load data: HTTP 500 error: boom")
        );
    }

    #[test]
    fn test_data_after_logout_discarded() {
        let mut app = test_app();
        step(&mut app);
        send(&app, AppMessage::Auth(AuthMessage::LoggedOut));
        send(&app, AppMessage::DataLoaded(dashboard_data()));
        step(&mut app);

        assert!(app.dashboard.is_none());
        assert!(app.login_view.is_some());
    }

    #[test]
    fn test_mount_syncs_with_store_state() {
        let mut app = test_app();
        send(&app, AppMessage::Auth(AuthMessage::ValidationStarted));
        step(&mut app);

        assert_eq!(
            app.login_view.as_ref().map(|v| v.status()),
            Some(ViewStatus::Validating)
        );
    }
}
