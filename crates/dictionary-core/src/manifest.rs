use log::LevelFilter;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use url::Url;
use validator::Validate;

use crate::lookup::{LookupSettings, DEFAULT_REDIRECT_TARGET, DEFAULT_UPSTREAM_BASE};

pub const DEFAULT_APP_NAME: &str = "Dictionary";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("manifest is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("manifest failed validation: {0}")]
    Invalid(#[from] validator::ValidationErrors),
    #[error("`{field}` is not a valid URL: {source}")]
    InvalidUrl {
        field: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("`{value}` is not a valid listen host: {source}")]
    InvalidHost {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

#[derive(Clone)]
pub struct ManifestLoader {
    manifest: Arc<Manifest>,
}

impl ManifestLoader {
    pub fn load_from_str(contents: &str) -> Result<Self, ManifestError> {
        let mut manifest: Manifest = toml::from_str(contents)?;
        manifest.validate()?;
        manifest.finalize();
        Ok(Self {
            manifest: Arc::new(manifest),
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, ManifestError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_from_str(&contents)
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }
}

impl Default for ManifestLoader {
    /// A manifest with every section omitted.
    fn default() -> Self {
        let mut manifest = Manifest::default();
        manifest.finalize();
        Self {
            manifest: Arc::new(manifest),
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct Manifest {
    #[serde(default)]
    #[validate(nested)]
    pub app: ManifestApp,
    #[serde(default)]
    #[validate(nested)]
    pub lookup: ManifestLookup,
    #[serde(default)]
    #[validate(nested)]
    pub server: ManifestServer,
    #[serde(default)]
    #[validate(nested)]
    pub logging: ManifestLogging,
    #[serde(skip)]
    pub(crate) logging_resolved: BTreeMap<String, ResolvedLoggingConfig>,
}

impl Manifest {
    pub fn app_name(&self) -> &str {
        self.app.name.as_deref().unwrap_or(DEFAULT_APP_NAME)
    }

    pub fn logging_for(&self, adapter: &str) -> Option<&ResolvedLoggingConfig> {
        self.logging_resolved.get(&adapter.to_ascii_lowercase())
    }

    pub fn logging_or_default(&self, adapter: &str) -> ResolvedLoggingConfig {
        self.logging_for(adapter).cloned().unwrap_or_default()
    }

    pub fn lookup_settings(&self) -> Result<LookupSettings, ManifestError> {
        let upstream_base = self
            .lookup
            .upstream_base
            .as_deref()
            .unwrap_or(DEFAULT_UPSTREAM_BASE);
        let redirect_target = self
            .lookup
            .redirect_target
            .as_deref()
            .unwrap_or(DEFAULT_REDIRECT_TARGET);
        let redirect_target =
            Url::parse(redirect_target).map_err(|source| ManifestError::InvalidUrl {
                field: "lookup.redirect_target",
                source,
            })?;
        Ok(LookupSettings::new(upstream_base, redirect_target))
    }

    /// Listen address for the HTTP server. `port_override` (normally from `PORT`) wins over
    /// `[server] port`.
    pub fn server_addr(&self, port_override: Option<u16>) -> Result<SocketAddr, ManifestError> {
        let host = self.server.host.as_deref().unwrap_or(DEFAULT_HOST);
        let ip = host
            .parse::<IpAddr>()
            .map_err(|source| ManifestError::InvalidHost {
                value: host.to_string(),
                source,
            })?;
        let port = port_override
            .or(self.server.port)
            .unwrap_or(DEFAULT_PORT);
        Ok(SocketAddr::new(ip, port))
    }

    fn finalize(&mut self) {
        self.logging_resolved = self
            .logging
            .adapters
            .iter()
            .map(|(adapter, cfg)| {
                (
                    adapter.to_ascii_lowercase(),
                    ResolvedLoggingConfig::from_manifest(cfg),
                )
            })
            .collect();
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ManifestApp {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ManifestLookup {
    #[serde(default)]
    #[validate(url)]
    pub upstream_base: Option<String>,
    #[serde(default)]
    #[validate(url)]
    pub redirect_target: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ManifestServer {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ManifestLogging {
    #[serde(flatten)]
    #[validate(nested)]
    pub adapters: BTreeMap<String, ManifestLoggingConfig>,
}

#[derive(Debug, Default, Deserialize, Clone, Validate)]
pub struct ManifestLoggingConfig {
    #[serde(default)]
    pub level: Option<LogLevel>,
    #[serde(default)]
    pub echo_stdout: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLoggingConfig {
    pub level: LogLevel,
    pub echo_stdout: bool,
}

impl Default for ResolvedLoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            echo_stdout: true,
        }
    }
}

impl ResolvedLoggingConfig {
    fn from_manifest(cfg: &ManifestLoggingConfig) -> Self {
        let mut resolved = Self::default();
        if let Some(level) = cfg.level {
            resolved.level = level;
        }
        if let Some(echo_stdout) = cfg.echo_stdout {
            resolved.echo_stdout = echo_stdout;
        }
        resolved
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Off => LevelFilter::Off,
        }
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "off" => Ok(Self::Off),
            other => Err(serde::de::Error::custom(format!(
                "logging level must be trace, debug, info, warn, error, or off (got `{}`)",
                other
            ))),
        }
    }
}
