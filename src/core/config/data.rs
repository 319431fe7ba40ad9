use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::constants::{BASE_URL_ENV_VAR, DEFAULT_BASE_URL};
use crate::utils::url::normalize_base_url;

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the chat service (e.g., "http://localhost:8000")
    pub base_url: Option<String>,
    /// Diagnostics level used when RUST_LOG is unset (e.g., "info")
    pub log_level: Option<String>,
}

impl Config {
    /// Resolve the base URL: CLI flag, then `PARLEY_BASE_URL`, then the config
    /// file, then the built-in default.
    pub fn resolve_base_url(&self, cli_override: Option<&str>) -> String {
        let env_value = std::env::var(BASE_URL_ENV_VAR).ok();
        self.resolve_base_url_with_env(cli_override, env_value.as_deref())
    }

    pub(crate) fn resolve_base_url_with_env(
        &self,
        cli_override: Option<&str>,
        env_value: Option<&str>,
    ) -> String {
        [cli_override, env_value, self.base_url.as_deref()]
            .into_iter()
            .flatten()
            .map(normalize_base_url)
            .find(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }
}

/// Get a user-friendly display string for a path, using `~` for the home
/// directory on Unix-like systems.
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
