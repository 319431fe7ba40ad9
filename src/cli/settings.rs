//! `parley set` / `parley unset` key handling.

use thiserror::Error;

use crate::core::config::Config;
use crate::utils::tracing_setup::parse_level;
use crate::utils::url::validate_base_url;

pub const SETTING_KEYS: [&str; 2] = ["base-url", "log-level"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingError {
    #[error("Unknown config key: {key} (expected one of: {})", SETTING_KEYS.join(", "))]
    UnknownKey { key: String },

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Validate and store `value` under `key`, returning a confirmation line.
pub fn apply_set(config: &mut Config, key: &str, value: &str) -> Result<String, SettingError> {
    let invalid = |reason: String| SettingError::InvalidValue {
        key: key.to_string(),
        reason,
    };

    match key {
        "base-url" => {
            let url = validate_base_url(value).map_err(invalid)?;
            config.base_url = Some(url.clone());
            Ok(format!("Set base-url to: {url}"))
        }
        "log-level" => {
            let level = parse_level(value).map_err(invalid)?;
            let level = level.to_string().to_lowercase();
            config.log_level = Some(level.clone());
            Ok(format!("Set log-level to: {level}"))
        }
        _ => Err(SettingError::UnknownKey {
            key: key.to_string(),
        }),
    }
}

pub fn apply_unset(config: &mut Config, key: &str) -> Result<String, SettingError> {
    match key {
        "base-url" => config.base_url = None,
        "log-level" => config.log_level = None,
        _ => {
            return Err(SettingError::UnknownKey {
                key: key.to_string(),
            })
        }
    }
    Ok(format!("Unset {key}"))
}
