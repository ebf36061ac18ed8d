//! CLI configuration resolution.
//!
//! A flat TOML file provides defaults; CLI flags and env vars (wired
//! through clap's `env` attributes) override it. Flag > env > file.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

use latchkey_core::AccountConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// On-disk config file shape.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub api_token: Option<String>,
    pub base_url: Option<String>,
}

/// Platform config path, e.g. `~/.config/latchkey/config.toml` on Linux.
pub fn config_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "latchkey").map_or_else(
        || PathBuf::from("latchkey.toml"),
        |d| d.config_dir().join("config.toml"),
    )
}

/// Load the config file, treating a missing file as empty config.
pub fn load_file_config() -> FileConfig {
    let path = config_path();
    let Ok(raw) = std::fs::read_to_string(&path) else {
        return FileConfig::default();
    };

    match toml::from_str(&raw) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config file");
            FileConfig::default()
        }
    }
}

/// Build an `AccountConfig` from flags, env vars, and the config file.
pub fn resolve(global: &GlobalOpts) -> Result<AccountConfig, CliError> {
    resolve_with(global, load_file_config())
}

fn resolve_with(global: &GlobalOpts, file: FileConfig) -> Result<AccountConfig, CliError> {
    let token = global
        .api_token
        .clone()
        .or(file.api_token)
        .ok_or_else(|| CliError::NoCredentials {
            path: config_path().display().to_string(),
        })?;

    let mut config = AccountConfig::new(SecretString::from(token));

    if let Some(raw) = global.base_url.as_deref().or(file.base_url.as_deref()) {
        config.base_url = raw.parse().map_err(|_| CliError::Validation {
            field: "base_url".into(),
            reason: format!("invalid URL: {raw}"),
        })?;
    }

    config.timeout = Duration::from_secs(global.timeout);

    Ok(config)
}
