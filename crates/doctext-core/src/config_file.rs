use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub server: Option<ServerConfig>,
    pub limits: Option<LimitsConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LimitsConfig {
    pub max_upload_mb: Option<u64>,
    pub extraction_timeout_secs: Option<u64>,
}

/// Platform config directory path: `<config_dir>/doctext/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("doctext").join("config.toml"))
}

/// Load config by cascading CWD `.doctext.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".doctext.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        server: Some(ServerConfig {
            host: overlay
                .server
                .as_ref()
                .and_then(|s| s.host.clone())
                .or_else(|| base.server.as_ref().and_then(|s| s.host.clone())),
            port: overlay
                .server
                .as_ref()
                .and_then(|s| s.port)
                .or_else(|| base.server.as_ref().and_then(|s| s.port)),
        }),
        limits: Some(LimitsConfig {
            max_upload_mb: overlay
                .limits
                .as_ref()
                .and_then(|l| l.max_upload_mb)
                .or_else(|| base.limits.as_ref().and_then(|l| l.max_upload_mb)),
            extraction_timeout_secs: overlay
                .limits
                .as_ref()
                .and_then(|l| l.extraction_timeout_secs)
                .or_else(|| {
                    base.limits
                        .as_ref()
                        .and_then(|l| l.extraction_timeout_secs)
                }),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_parses() {
        let toml_str = "[server]\nport = 9000\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        let server = parsed.server.unwrap();
        assert_eq!(server.port, Some(9000));
        assert!(server.host.is_none());
        assert!(parsed.limits.is_none());
    }

    #[test]
    fn limits_round_trip_toml() {
        let config = ConfigFile {
            limits: Some(LimitsConfig {
                max_upload_mb: Some(25),
                extraction_timeout_secs: Some(5),
            }),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ConfigFile = toml::from_str(&toml_str).unwrap();
        let limits = parsed.limits.unwrap();
        assert_eq!(limits.max_upload_mb, Some(25));
        assert_eq!(limits.extraction_timeout_secs, Some(5));
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            server: Some(ServerConfig {
                host: Some("127.0.0.1".to_string()),
                port: Some(8000),
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            server: Some(ServerConfig {
                port: Some(9000),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay);
        let server = merged.server.unwrap();
        assert_eq!(server.port, Some(9000));
        // Base host survives when the overlay leaves it unset
        assert_eq!(server.host.as_deref(), Some("127.0.0.1"));
    }

    #[test]
    fn merge_base_preserved_when_overlay_section_absent() {
        let base = ConfigFile {
            limits: Some(LimitsConfig {
                max_upload_mb: Some(10),
                extraction_timeout_secs: None,
            }),
            ..Default::default()
        };
        let merged = merge(base, ConfigFile::default());
        let limits = merged.limits.unwrap();
        assert_eq!(limits.max_upload_mb, Some(10));
        assert!(limits.extraction_timeout_secs.is_none());
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = std::env::temp_dir().join("doctext-config-test-does-not-exist");
        assert!(load_from_path(&dir.join("config.toml")).is_none());
    }
}
