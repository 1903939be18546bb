use log::info;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the extraction service; uploads go to `<base>/upload-pdf`.
    pub base_url: String,
    /// `None` waits for the service indefinitely.
    pub request_timeout: Option<Duration>,
    /// Show a cancel control while a request is in flight.
    pub allow_cancel: bool,
    pub export_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl ClientConfig {
    /// Read the process environment. Binaries load `.env` before calling this.
    pub fn from_env() -> Self {
        let config = Self::from_lookup(|key| env::var(key).ok());
        info!("Client configuration loaded:");
        info!("  Extraction service: {}", config.base_url);
        info!("  Request timeout: {:?}", config.request_timeout);
        info!("  Export directory: {}", config.export_dir.display());
        config
    }

    /// Build from any key lookup; missing or unparsable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("EXTRACTION_BASE_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let request_timeout = lookup("EXTRACTION_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        let allow_cancel = lookup("EXTRACTION_ALLOW_CANCEL")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        let export_dir = lookup("EXPORT_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            base_url,
            request_timeout,
            allow_cancel,
            export_dir,
        }
    }
}
