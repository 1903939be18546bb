use chrono::Utc;
use log::info;
use std::env;
use std::io::Write;

pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Logger setup shared by the GUI and the CLI.
pub struct FacturaLogger;

impl FacturaLogger {
    /// Initialise with the level from `LOG_LEVEL`.
    pub fn init_from_env() -> anyhow::Result<()> {
        Self::init(&Self::level_from_lookup(|key| env::var(key).ok()))
    }

    pub fn level_from_lookup<F>(lookup: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(LOG_LEVEL_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
    }

    /// Initialise `env_logger`. `RUST_LOG` wins; otherwise `default_level` is used.
    pub fn init(default_level: &str) -> anyhow::Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .format(|buf, record| {
                writeln!(
                    buf,
                    "[{}] [{}] [{}:{}] {}",
                    Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
                    record.level(),
                    record.file().unwrap_or("unknown"),
                    record.line().unwrap_or(0),
                    record.args()
                )
            })
            .try_init()?;

        info!("Factura client logger initialized");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_defaults_to_info() {
        assert_eq!(FacturaLogger::level_from_lookup(|_| None), "info");
        assert_eq!(FacturaLogger::level_from_lookup(|_| Some("  ".to_string())), "info");
    }

    #[test]
    fn level_is_read_from_log_level() {
        let level = FacturaLogger::level_from_lookup(|key| {
            (key == LOG_LEVEL_VAR).then(|| "debug".to_string())
        });
        assert_eq!(level, "debug");
    }
}
