use crate::core::config::data::Config;
use crate::core::constants::DEFAULT_BASE_URL;
use crate::utils::tracing_setup::DEFAULT_LOG_LEVEL;

impl Config {
    pub fn summary_lines(&self) -> Vec<String> {
        let base_url = match &self.base_url {
            Some(url) => format!("  base-url: {url}"),
            None => format!("  base-url: (unset, default {DEFAULT_BASE_URL})"),
        };
        let log_level = match &self.log_level {
            Some(level) => format!("  log-level: {level}"),
            None => format!("  log-level: (unset, default {DEFAULT_LOG_LEVEL})"),
        };
        vec!["Current configuration:".to_string(), base_url, log_level]
    }

    pub fn print_all(&self) {
        for line in self.summary_lines() {
            println!("{line}");
        }
    }
}
