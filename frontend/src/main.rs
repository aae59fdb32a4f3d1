//! Hearth dashboard application.
//!
//! Supports both WASM (for web browsers) and native modes.

#![warn(clippy::all, rust_2018_idioms)]

// ============================================================================
// WASM Entry Point
// ============================================================================

#[cfg(target_arch = "wasm32")]
fn main() {
    use hearth_frontend::{Config, HearthApp};
    use wasm_bindgen::JsCast;

    // Initialize panic handler for better error messages in browser console
    console_error_panic_hook::set_once();

    // Initialize tracing for WASM
    tracing_wasm::set_as_global_default();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let window = web_sys::window().expect("No window");
        let document = window.document().expect("No document");
        let canvas = document
            .get_element_by_id("hearth_app_canvas")
            .expect("Failed to find hearth_app_canvas")
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .expect("hearth_app_canvas is not a canvas");

        // Served by the home server itself, so talk to the page origin
        let config = Config {
            server_url: window.location().origin().expect("No origin"),
            ..Config::default()
        };

        eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(move |cc| Ok(Box::new(HearthApp::new(cc, config)))),
            )
            .await
            .expect("Failed to start eframe");
    });
}

// ============================================================================
// Native Entry Point
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use clap::Parser;
    use hearth_frontend::login::RefocusPolicy;
    use hearth_frontend::Config;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    /// Hearth - smart-home dashboard
    #[derive(Parser, Debug)]
    #[command(author, version, about, long_about = None)]
    pub struct Args {
        /// Base URL of the home server
        #[arg(long)]
        pub server_url: Option<String>,

        /// Password to submit on start-up
        #[arg(long, env = "HEARTH_PASSWORD", hide_env_values = true)]
        pub password: Option<String>,

        /// When the password field takes focus back after a state change
        #[arg(long, value_enum)]
        pub refocus: Option<RefocusPolicy>,

        /// Log level (trace, debug, info, warn, error)
        #[arg(long)]
        pub log_level: Option<String>,
    }

    /// Initialize logging. RUST_LOG wins over the configured level.
    ///
    /// The returned guard must be held for the file writer to flush.
    pub fn init_tracing(config: &Config) -> Option<tracing_appender::non_blocking::WorkerGuard> {
        let default_level = config.log_level.clone().unwrap_or_else(|| "info".to_string());
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));

        let (file_layer, guard) = match config.log_file {
            Some(ref path) => {
                let directory = path
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or_else(|| std::path::Path::new("."));
                let file_name = path
                    .file_name()
                    .map(|n| n.to_os_string())
                    .unwrap_or_else(|| "hearth.log".into());
                let appender = tracing_appender::rolling::daily(directory, file_name);
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let layer = fmt::layer().with_writer(writer).with_ansi(false);
                (Some(layer), Some(guard))
            }
            None => (None, None),
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).compact())
            .with(file_layer)
            .init();

        guard
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;
    use hearth_frontend::Config;

    let args = native::Args::parse();

    let config = Config::from_figment(
        args.server_url,
        args.password,
        args.refocus,
        args.log_level,
    )?;

    let _log_guard = native::init_tracing(&config);

    tracing::info!("Starting Hearth dashboard");
    tracing::debug!("Configuration: {:?}", config);

    // Async actions are spawned onto this runtime from the UI thread
    let runtime = tokio::runtime::Runtime::new()?;
    let _runtime_guard = runtime.enter();

    hearth_frontend::run_native(config).map_err(|e| anyhow::anyhow!("GUI error: {}", e))
}
