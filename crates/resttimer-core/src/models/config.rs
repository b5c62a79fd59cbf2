//! Application configuration

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

use super::RestDuration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Duration preselected when the session starts
    pub default_duration: Option<RestDuration>,
    pub alerts: AlertConfig,
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertConfig {
    pub terminal_bell: bool,
    pub desktop: bool,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(Error::Validation(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.log_level,
                valid_log_levels.join(", ")
            )));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_duration: None,
            alerts: AlertConfig::default(),
            log_level: "warn".to_string(),
        }
    }
}

impl AlertConfig {
    pub fn any_enabled(&self) -> bool {
        self.terminal_bell || self.desktop
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            terminal_bell: true,
            desktop: false,
        }
    }
}
