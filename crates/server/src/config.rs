//! Configuration loading.

use anyhow::{Context, Result, bail};
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use objbroker_core::config::AppConfig;
use std::path::Path;

/// Prefix of environment variables overriding configuration values.
pub const ENV_PREFIX: &str = "OBJBROKER_";

/// Variable naming the configuration file; not a configuration value itself.
pub const CONFIG_PATH_VAR: &str = "OBJBROKER_CONFIG";

/// Build the configuration provider chain: the TOML file when present, then
/// environment variables split on `__` (`OBJBROKER_BROKER__NAMESPACE`).
pub fn provider_chain(path: &Path, env_prefix: &str) -> Figment {
    let mut figment = Figment::new();
    if path.exists() {
        tracing::info!(config_path = %path.display(), "Loading configuration from file");
        figment = figment.merge(Toml::file(path));
    } else {
        tracing::debug!("No config file found at {}", path.display());
    }
    figment.merge(Env::prefixed(env_prefix).split("__"))
}

/// Load the application configuration.
///
/// Fails when neither the file nor any `OBJBROKER_` variable is present.
pub fn load(path: &Path) -> Result<AppConfig> {
    let has_env_config = std::env::vars()
        .any(|(key, _)| key.starts_with(ENV_PREFIX) && key != CONFIG_PATH_VAR);

    if !path.exists() && !has_env_config {
        bail!(
            "No configuration provided.\n\n\
             Provide configuration via one of:\n  \
             1. Config file: objbrokerd --config /path/to/config.toml\n  \
             2. Environment variables: OBJBROKER_BROKER__NAMESPACE=ns1 \
             OBJBROKER_BROKER__REPLICATION_GROUP=rg1 objbrokerd\n\n\
             See config/server.example.toml for example configuration.\n\
             Set OBJBROKER_CONFIG env var to specify a default config file path."
        );
    }

    extract(provider_chain(path, ENV_PREFIX))
}

/// Extract the configuration from a provider chain.
pub fn extract(figment: Figment) -> Result<AppConfig> {
    figment
        .extract()
        .context("failed to load configuration")
}
