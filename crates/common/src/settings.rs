use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Server {
    pub port: u16,
    pub report_path: String,
    pub max_body_size: usize,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            port: 8400,
            report_path: "/api/report".into(),
            max_body_size: 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Logger {
    pub directory: String,
    pub level: String,
}

impl Default for Logger {
    fn default() -> Self {
        Self {
            directory: "logs".into(),
            level: "info".into(),
        }
    }
}

/// Report persistence location. No path means reports only live for the
/// lifetime of the collector process.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Store {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub server: Server,
    pub logger: Logger,
    pub store: Store,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_config_dir("config")
    }

    pub fn with_config_dir(config_dir: &str) -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .add_source(File::with_name(&format!("{config_dir}/default")).required(false))
            .add_source(File::with_name(&format!("{config_dir}/{run_mode}")).required(false))
            .add_source(File::with_name(&format!("{config_dir}/local")).required(false))
            .add_source(Environment::default().separator("__"));

        builder.build()?.try_deserialize()
    }
}
