use std::time::Duration;

use doctext_core::config_file::{self, ConfigFile};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 100;
pub const DEFAULT_EXTRACTION_TIMEOUT_SECS: u64 = 60;

/// Resolved server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub extraction_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self::resolve(&ConfigFile::default(), |_| None)
    }
}

impl Settings {
    /// Resolve configuration: env vars > config file > defaults.
    pub fn load() -> Self {
        Self::resolve(&config_file::load_config(), |key| std::env::var(key).ok())
    }

    /// Resolve against an explicit config file and environment lookup.
    /// Unparseable environment values are ignored.
    pub fn resolve(file: &ConfigFile, env: impl Fn(&str) -> Option<String>) -> Self {
        let server = file.server.clone().unwrap_or_default();
        let limits = file.limits.clone().unwrap_or_default();

        let host = env("DOCTEXT_HOST")
            .or(server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = env_parsed::<u16>(&env, "DOCTEXT_PORT")
            .or_else(|| env_parsed(&env, "PORT"))
            .or(server.port)
            .unwrap_or(DEFAULT_PORT);
        let max_upload_mb = env_parsed::<u64>(&env, "DOCTEXT_MAX_UPLOAD_MB")
            .or(limits.max_upload_mb)
            .unwrap_or(DEFAULT_MAX_UPLOAD_MB);
        let timeout_secs = env_parsed::<u64>(&env, "DOCTEXT_EXTRACTION_TIMEOUT")
            .or(limits.extraction_timeout_secs)
            .unwrap_or(DEFAULT_EXTRACTION_TIMEOUT_SECS);

        Self {
            host,
            port,
            max_upload_bytes: usize::try_from(max_upload_mb.saturating_mul(1024 * 1024))
                .unwrap_or(usize::MAX),
            extraction_timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_parsed<T: std::str::FromStr>(env: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    env(key).and_then(|v| v.trim().parse().ok())
}
