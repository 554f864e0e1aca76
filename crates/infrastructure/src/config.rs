//! Configuration loading.
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. `sentinel.{toml,json,yaml}` in the working directory, or an explicit file
//! 3. `SENTINEL_*` environment variables, nested keys separated by `__`
//!    (e.g. `SENTINEL_ENDPOINTS__REFRESH=/v2/refresh`)

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use sentinel_domain::{ClientConfig, DomainError};

const ENV_PREFIX: &str = "SENTINEL";
const DEFAULT_FILE: &str = "sentinel";
const DATA_DIR: &str = "sentinel";
const ACCOUNT_FILE: &str = "account.json";

/// Errors raised while assembling the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A source could not be read or did not match the expected shape.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// The merged configuration is inconsistent.
    #[error(transparent)]
    Invalid(#[from] DomainError),

    /// No account file was configured and the platform has no data directory.
    #[error("no data directory available; set SENTINEL_ACCOUNT_FILE")]
    NoDataDir,
}

/// Loads the client configuration.
///
/// With `file` set, that file must exist. Without it, `sentinel.*` in the
/// working directory is used when present.
///
/// # Errors
///
/// Returns an error if a source is malformed or the result fails validation.
pub fn load_config(file: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    load_from(file, Environment::with_prefix(ENV_PREFIX))
}

fn load_from(file: Option<&Path>, environment: Environment) -> Result<ClientConfig, ConfigError> {
    let builder = match file {
        Some(path) => Config::builder().add_source(File::from(path).required(true)),
        None => Config::builder().add_source(File::with_name(DEFAULT_FILE).required(false)),
    };

    let config: ClientConfig = builder
        .add_source(
            environment
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("auth_failure_statuses"),
        )
        .build()?
        .try_deserialize()?;

    config.validate()?;
    tracing::debug!(base_url = %config.base_url, "configuration loaded");
    Ok(config)
}

/// Where the account record lives: the configured file, or
/// `<data dir>/sentinel/account.json`.
///
/// # Errors
///
/// Returns `NoDataDir` if nothing is configured and the platform has no
/// data directory.
pub fn account_path(config: &ClientConfig) -> Result<PathBuf, ConfigError> {
    if let Some(path) = &config.account_file {
        return Ok(path.clone());
    }
    dirs::data_dir()
        .map(|dir| dir.join(DATA_DIR).join(ACCOUNT_FILE))
        .ok_or(ConfigError::NoDataDir)
}
