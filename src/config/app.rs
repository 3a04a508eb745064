//! Application-level configuration.

use serde::Deserialize;

/// Top-level `app` section: identity and logging.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Name reported in the startup log line.
    pub name: String,
    /// Verbosity for the tracing subscriber ("debug", "info", "warn",
    /// "error"). Defaults to "info" when absent.
    #[serde(default)]
    pub log_level: Option<String>,
}
