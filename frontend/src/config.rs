//! Configuration management.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::login::RefocusPolicy;

/// Configuration structure that matches the TOML file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    server: ServerConfig,
    #[serde(default)]
    auth: AuthConfig,
    #[serde(default)]
    login: LoginConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ServerConfig {
    #[serde(default = "default_server_url")]
    url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_server_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct AuthConfig {
    /// Password submitted automatically at start-up
    password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct LoginConfig {
    #[serde(default)]
    refocus: RefocusPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct LoggingConfig {
    /// Path to log file (if set, logs will be written to file in addition to stdout)
    log_file: Option<PathBuf>,
    /// Log level (trace, debug, info, warn, error)
    /// If not set, uses RUST_LOG environment variable or defaults to "info"
    log_level: Option<String>,
}

fn default_server_url() -> String {
    format!("http://localhost:{}", hearth_types::DEFAULT_PORT)
}

/// Application configuration.
#[derive(Clone)]
pub struct Config {
    /// Base URL of the home server
    pub server_url: String,
    /// Password to submit on start-up, if any
    pub password: Option<String>,
    /// When the login view takes keyboard focus back after a store change
    pub refocus: RefocusPolicy,
    /// Path to log file
    pub log_file: Option<PathBuf>,
    /// Log level (if set, used when RUST_LOG is not set)
    pub log_level: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("server_url", &self.server_url)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("refocus", &self.refocus)
            .field("log_file", &self.log_file)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_file(ConfigFile::default())
    }
}

impl Config {
    fn from_file(file: ConfigFile) -> Self {
        Self {
            server_url: file.server.url,
            password: file.auth.password.filter(|p| !p.is_empty()),
            refocus: file.login.refocus,
            log_file: file.logging.log_file,
            log_level: file.logging.log_level,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Config {
    /// Load configuration with full priority chain: CLI args > env vars > config files > defaults.
    ///
    /// Config files are searched in this order:
    /// 1. `config.toml` in user config directory (~/.config/hearth/ on Linux)
    /// 2. `.hearth.toml` in current directory
    pub fn from_figment(
        server_url: Option<String>,
        password: Option<String>,
        refocus: Option<RefocusPolicy>,
        log_level: Option<String>,
    ) -> anyhow::Result<Self> {
        let user_config = directories::ProjectDirs::from("", "", "hearth")
            .map(|dirs| dirs.config_dir().join("config.toml"));
        let local_config = std::env::current_dir().ok().map(|d| d.join(".hearth.toml"));

        let files: Vec<PathBuf> = user_config.into_iter().chain(local_config).collect();
        Self::load(&files, server_url, password, refocus, log_level)
    }

    /// Merge `files` (lowest priority first, missing ones skipped), then
    /// `HEARTH_*` env vars, then the CLI values.
    fn load(
        files: &[PathBuf],
        server_url: Option<String>,
        password: Option<String>,
        refocus: Option<RefocusPolicy>,
        log_level: Option<String>,
    ) -> anyhow::Result<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Toml},
            Figment,
        };

        let mut figment = Figment::new().merge(Serialized::defaults(ConfigFile::default()));

        for path in files {
            if path.exists() {
                tracing::debug!("Reading config file {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        // HEARTH_SERVER__URL -> server.url
        figment = figment.merge(Env::prefixed("HEARTH_").split("__"));

        if let Some(url) = server_url {
            figment = figment.merge(Serialized::default("server.url", url));
        }
        if let Some(password) = password {
            figment = figment.merge(Serialized::default("auth.password", password));
        }
        if let Some(refocus) = refocus {
            figment = figment.merge(Serialized::default("login.refocus", refocus));
        }
        if let Some(level) = log_level {
            figment = figment.merge(Serialized::default("logging.log_level", level));
        }

        let config_file: ConfigFile = figment.extract()?;
        Ok(Self::from_file(config_file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn clear_env() {
        std::env::remove_var("HEARTH_SERVER__URL");
        std::env::remove_var("HEARTH_LOGIN__REFOCUS");
        std::env::remove_var("HEARTH_AUTH__PASSWORD");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server_url, "http://localhost:8123");
        assert_eq!(config.password, None);
        assert_eq!(config.refocus, RefocusPolicy::UnlessValidatingAndLoggedIn);
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = Config {
            password: Some("hunter2".to_string()),
            ..Config::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    #[serial]
    fn test_load_defaults_without_files() {
        clear_env();

        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("config.toml");

        let config = Config::load(&[missing], None, None, None, None).unwrap();

        assert_eq!(config.server_url, "http://localhost:8123");
        assert_eq!(config.refocus, RefocusPolicy::UnlessValidatingAndLoggedIn);
        assert_eq!(config.password, None);
    }

    #[test]
    #[serial]
    fn test_load_config_file() {
        clear_env();

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".hearth.toml");
        fs::write(
            &path,
            r#"
[server]
url = "http://hearth.local:8123"

[login]
refocus = "idle-only"

[logging]
log_level = "debug"
"#,
        )
        .unwrap();

        let config = Config::load(&[path], None, None, None, None).unwrap();

        assert_eq!(config.server_url, "http://hearth.local:8123");
        assert_eq!(config.refocus, RefocusPolicy::IdleOnly);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    #[serial]
    fn test_local_file_overrides_user_file() {
        clear_env();

        let temp_dir = TempDir::new().unwrap();
        let user = temp_dir.path().join("config.toml");
        let local = temp_dir.path().join(".hearth.toml");
        fs::write(
            &user,
            "[server]\nurl = \"http://from-user:8123\"\n\n[login]\nrefocus = \"idle-only\"",
        )
        .unwrap();
        fs::write(&local, "[server]\nurl = \"http://from-local:8123\"").unwrap();

        let config = Config::load(&[user, local], None, None, None, None).unwrap();

        assert_eq!(config.server_url, "http://from-local:8123");
        assert_eq!(config.refocus, RefocusPolicy::IdleOnly);
    }

    #[test]
    #[serial]
    fn test_env_overrides_config_file() {
        clear_env();

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".hearth.toml");
        fs::write(&path, "[server]\nurl = \"http://from-file:8123\"").unwrap();

        std::env::set_var("HEARTH_SERVER__URL", "http://from-env:8123");
        let config = Config::load(&[path], None, None, None, None).unwrap();
        clear_env();

        assert_eq!(config.server_url, "http://from-env:8123");
    }

    #[test]
    #[serial]
    fn test_cli_overrides_env() {
        clear_env();
        std::env::set_var("HEARTH_SERVER__URL", "http://from-env:8123");

        let config = Config::load(
            &[],
            Some("http://from-cli:8123".to_string()),
            Some("hunter2".to_string()),
            Some(RefocusPolicy::IdleOnly),
            None,
        )
        .unwrap();

        clear_env();

        assert_eq!(config.server_url, "http://from-cli:8123");
        assert_eq!(config.password.as_deref(), Some("hunter2"));
        assert_eq!(config.refocus, RefocusPolicy::IdleOnly);
    }

    #[test]
    fn test_empty_password_treated_as_unset() {
        let mut file = ConfigFile::default();
        file.auth.password = Some(String::new());
        assert_eq!(Config::from_file(file).password, None);
    }
}
