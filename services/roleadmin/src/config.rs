use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "0.0.0.0:8081";
pub const DEFAULT_METRICS_BIND: &str = "0.0.0.0:9081";
pub const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60;

// Role-admin configuration sourced from environment variables.
#[derive(Debug, Clone)]
pub struct RoleAdminConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    /// YAML directory snapshot loaded into the in-memory directory at startup.
    pub directory_seed: Option<PathBuf>,
    /// Re-normalize persisted grant sets when an editing session opens.
    pub normalize_on_load: bool,
    /// Idle time after which an open editing session is discarded.
    pub session_ttl: Duration,
}

#[derive(Debug, Deserialize)]
struct RoleAdminConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    directory_seed: Option<PathBuf>,
    normalize_on_load: Option<bool>,
    session_ttl_secs: Option<u64>,
}

impl RoleAdminConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = std::env::var("ROLEADMIN_BIND")
            .unwrap_or_else(|_| DEFAULT_BIND.to_string())
            .parse()
            .with_context(|| "parse ROLEADMIN_BIND")?;
        let metrics_bind = std::env::var("ROLEADMIN_METRICS_BIND")
            .unwrap_or_else(|_| DEFAULT_METRICS_BIND.to_string())
            .parse()
            .with_context(|| "parse ROLEADMIN_METRICS_BIND")?;
        let directory_seed = std::env::var("ROLEADMIN_DIRECTORY_SEED")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let normalize_on_load = match std::env::var("ROLEADMIN_NORMALIZE_ON_LOAD") {
            Ok(value) => parse_bool(&value).with_context(|| "parse ROLEADMIN_NORMALIZE_ON_LOAD")?,
            Err(_) => true,
        };
        let session_ttl = match std::env::var("ROLEADMIN_SESSION_TTL") {
            Ok(value) => parse_ttl_secs(
                value
                    .trim()
                    .parse::<u64>()
                    .with_context(|| "parse ROLEADMIN_SESSION_TTL")?,
            )?,
            Err(_) => Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
        };
        Ok(Self {
            bind_addr,
            metrics_bind,
            directory_seed,
            normalize_on_load,
            session_ttl,
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("ROLEADMIN_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read ROLEADMIN_CONFIG: {path}"))?;
            let override_cfg: RoleAdminConfigOverride = serde_yaml::from_str(&contents)
                .with_context(|| "parse roleadmin config yaml")?;
            if let Some(value) = override_cfg.bind_addr {
                config.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
            }
            if let Some(value) = override_cfg.metrics_bind {
                config.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
            }
            if let Some(value) = override_cfg.directory_seed {
                config.directory_seed = Some(value);
            }
            if let Some(value) = override_cfg.normalize_on_load {
                config.normalize_on_load = value;
            }
            if let Some(value) = override_cfg.session_ttl_secs {
                config.session_ttl = parse_ttl_secs(value)?;
            }
        }
        Ok(config)
    }
}

fn parse_ttl_secs(secs: u64) -> Result<Duration> {
    if secs == 0 {
        anyhow::bail!("session ttl must be at least one second");
    }
    Ok(Duration::from_secs(secs))
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("invalid boolean: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    const KEYS: [&str; 6] = [
        "ROLEADMIN_BIND",
        "ROLEADMIN_METRICS_BIND",
        "ROLEADMIN_DIRECTORY_SEED",
        "ROLEADMIN_NORMALIZE_ON_LOAD",
        "ROLEADMIN_SESSION_TTL",
        "ROLEADMIN_CONFIG",
    ];

    struct EnvGuard {
        saved: Vec<(&'static str, Option<String>)>,
    }

    impl EnvGuard {
        fn clear() -> Self {
            let saved = KEYS
                .iter()
                .map(|key| (*key, std::env::var(key).ok()))
                .collect();
            for key in KEYS {
                unsafe {
                    std::env::remove_var(key);
                }
            }
            Self { saved }
        }

        fn set(&self, key: &str, value: &str) {
            unsafe {
                std::env::set_var(key, value);
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, prev) in &self.saved {
                match prev {
                    Some(value) => unsafe {
                        std::env::set_var(key, value);
                    },
                    None => unsafe {
                        std::env::remove_var(key);
                    },
                }
            }
        }
    }

    #[test]
    #[serial]
    fn defaults_apply_without_env() {
        let _guard = EnvGuard::clear();
        let config = RoleAdminConfig::from_env().expect("config");
        assert_eq!(config.bind_addr, DEFAULT_BIND.parse().unwrap());
        assert_eq!(config.metrics_bind, DEFAULT_METRICS_BIND.parse().unwrap());
        assert!(config.directory_seed.is_none());
        assert!(config.normalize_on_load);
        assert_eq!(
            config.session_ttl,
            Duration::from_secs(DEFAULT_SESSION_TTL_SECS)
        );
    }

    #[test]
    #[serial]
    fn env_values_are_parsed() {
        let guard = EnvGuard::clear();
        guard.set("ROLEADMIN_BIND", "127.0.0.1:7000");
        guard.set("ROLEADMIN_DIRECTORY_SEED", "/tmp/directory.yaml");
        guard.set("ROLEADMIN_NORMALIZE_ON_LOAD", "off");
        guard.set("ROLEADMIN_SESSION_TTL", "90");
        let config = RoleAdminConfig::from_env().expect("config");
        assert_eq!(config.session_ttl, Duration::from_secs(90));
        assert_eq!(config.bind_addr, "127.0.0.1:7000".parse().unwrap());
        assert_eq!(
            config.directory_seed,
            Some(PathBuf::from("/tmp/directory.yaml"))
        );
        assert!(!config.normalize_on_load);
    }

    #[test]
    #[serial]
    fn invalid_values_are_rejected() {
        let guard = EnvGuard::clear();
        guard.set("ROLEADMIN_BIND", "not-an-addr");
        assert!(RoleAdminConfig::from_env().is_err());

        let guard = EnvGuard::clear();
        guard.set("ROLEADMIN_NORMALIZE_ON_LOAD", "maybe");
        assert!(RoleAdminConfig::from_env().is_err());

        let guard = EnvGuard::clear();
        guard.set("ROLEADMIN_SESSION_TTL", "0");
        assert!(RoleAdminConfig::from_env().is_err());
    }

    #[test]
    #[serial]
    fn yaml_overrides_env() {
        let guard = EnvGuard::clear();
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(
            file,
            "bind_addr: \"127.0.0.1:7100\"\ndirectory_seed: /srv/seed.yaml\nnormalize_on_load: false\nsession_ttl_secs: 120"
        )
        .expect("write");
        guard.set("ROLEADMIN_METRICS_BIND", "127.0.0.1:7200");
        guard.set("ROLEADMIN_CONFIG", file.path().to_str().expect("path"));

        let config = RoleAdminConfig::from_env_or_yaml().expect("config");
        assert_eq!(config.bind_addr, "127.0.0.1:7100".parse().unwrap());
        assert_eq!(config.metrics_bind, "127.0.0.1:7200".parse().unwrap());
        assert_eq!(config.directory_seed, Some(PathBuf::from("/srv/seed.yaml")));
        assert!(!config.normalize_on_load);
        assert_eq!(config.session_ttl, Duration::from_secs(120));
    }

    #[test]
    #[serial]
    fn missing_yaml_file_is_an_error() {
        let guard = EnvGuard::clear();
        guard.set("ROLEADMIN_CONFIG", "/nonexistent/roleadmin.yaml");
        assert!(RoleAdminConfig::from_env_or_yaml().is_err());
    }
}
