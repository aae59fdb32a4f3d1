//! Hearth frontend library.
//!
//! Login view, authentication store and dashboard shell for the Hearth
//! smart-home dashboard. Runs natively through eframe or in the browser.

#![warn(clippy::all, rust_2018_idioms)]

pub mod actions;
pub mod api;
mod app;
pub mod config;
pub mod dashboard;
pub mod login;
pub mod state;
pub mod store;

pub use app::HearthApp;
pub use config::Config;

// Native entry point (without tracing init - caller should handle that)
#[cfg(not(target_arch = "wasm32"))]
pub fn run_native(config: Config) -> eframe::Result<()> {
    tracing::info!("Initializing Hearth dashboard");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 640.0])
            .with_title("Hearth"),
        ..Default::default()
    };

    eframe::run_native(
        "Hearth",
        native_options,
        Box::new(move |cc| Ok(Box::new(HearthApp::new(cc, config)))),
    )
}
