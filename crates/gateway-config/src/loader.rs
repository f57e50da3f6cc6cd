//! Configuration loading.

use crate::config::GatewayConfig;
use crate::error::ConfigError;
use gateway_core::ProviderId;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use validator::Validate;

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "GATEWAY_CONFIG";

/// File read when no path is given and it exists
pub const DEFAULT_CONFIG_PATH: &str = "config/gateway.yaml";

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML (`.yaml`, `.yml`)
    Yaml,
    /// TOML (`.toml`)
    Toml,
    /// JSON (`.json`)
    Json,
}

impl ConfigFormat {
    /// Format implied by a file extension
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Parse configuration text in this format
    ///
    /// # Errors
    /// Returns the parser's message on malformed input
    pub fn parse(self, content: &str) -> Result<GatewayConfig, String> {
        match self {
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            Self::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

/// Builder for loading a [`GatewayConfig`]
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    use_env: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader that discovers the file and applies environment overrides
    #[must_use]
    pub fn new() -> Self {
        Self {
            file: None,
            use_env: true,
        }
    }

    /// Read this file instead of discovering one
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Ignore `GATEWAY_*` environment variables
    #[must_use]
    pub fn without_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    /// Load, overlay and validate the configuration
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed, an override is
    /// malformed, or the result fails validation
    pub async fn load(&self) -> Result<GatewayConfig, ConfigError> {
        let mut config = match self.resolve_path() {
            Some(path) => read_file(&path).await?,
            None => {
                debug!("No config file found, using defaults");
                GatewayConfig::default()
            }
        };

        if self.use_env {
            apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;
        }

        config.validate()?;
        Ok(config)
    }

    fn resolve_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.file {
            return Some(path.clone());
        }
        if self.use_env {
            if let Some(path) = std::env::var(CONFIG_PATH_ENV)
                .ok()
                .filter(|p| !p.trim().is_empty())
            {
                return Some(PathBuf::from(path));
            }
        }
        let default = PathBuf::from(DEFAULT_CONFIG_PATH);
        default.is_file().then_some(default)
    }
}

/// Load configuration the standard way: `GATEWAY_CONFIG` or
/// `config/gateway.yaml` if present, then environment overrides
///
/// # Errors
/// See [`ConfigLoader::load`]
pub async fn load_config() -> Result<GatewayConfig, ConfigError> {
    ConfigLoader::new().load().await
}

async fn read_file(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let config = format.parse(&content).map_err(|message| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    })?;

    info!(path = %path.display(), format = ?format, "Loaded configuration file");
    Ok(config)
}

/// Overlay `GATEWAY_HOST`, `GATEWAY_PORT`, `GATEWAY_LOG_LEVEL` and
/// `GATEWAY_DEFAULT_PROVIDER` read through `lookup`
///
/// # Errors
/// Returns error if a port or provider value does not parse
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

    if let Some(host) = get("GATEWAY_HOST") {
        config.server.host = host.trim().to_string();
    }

    if let Some(port) = get("GATEWAY_PORT") {
        config.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidEnv {
            var: "GATEWAY_PORT".to_string(),
            message: format!("'{port}' is not a valid port"),
        })?;
    }

    if let Some(level) = get("GATEWAY_LOG_LEVEL") {
        config.telemetry.log_level = level.trim().to_string();
    }

    if let Some(provider) = get("GATEWAY_DEFAULT_PROVIDER") {
        config.routing.default_provider =
            provider
                .parse::<ProviderId>()
                .map_err(|e| ConfigError::InvalidEnv {
                    var: "GATEWAY_DEFAULT_PROVIDER".to_string(),
                    message: e.to_string(),
                })?;
    }

    Ok(())
}
