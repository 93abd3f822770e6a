use std::env;

/// Environment variable naming the collector base URL. When unset, the
/// reporter stays fully inactive.
pub const BASE_URL_ENV: &str = "FAULTLINE_URL";

const REPORT_PATH: &str = "/api/report";

#[derive(Debug, Clone, Default)]
pub struct ReporterConfig {
    base_url: Option<String>,
}

impl ReporterConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
        }
    }

    /// A config with no collector URL; `install` becomes a no-op.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self {
            base_url: env::var(BASE_URL_ENV)
                .ok()
                .filter(|value| !value.trim().is_empty()),
        }
    }

    /// The submission endpoint, or `None` when reporting is disabled.
    pub fn endpoint(&self) -> Option<String> {
        self.base_url
            .as_ref()
            .map(|base| format!("{}{REPORT_PATH}", base.trim_end_matches('/')))
    }
}
