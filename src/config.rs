//! Dashboard settings.
//!
//! Defaults match the gateway export workflow; a JSON file named by
//! `MODBUS_DASHBOARD_CONFIG` can override any subset of them.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::filter::clamp_minutes;

/// Environment variable holding the path of an optional config file.
pub const CONFIG_ENV_VAR: &str = "MODBUS_DASHBOARD_CONFIG";

/// UI language. Only the shell's strings change; data and titles do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Vi,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Rows shown in the table preview unless "show all" is ticked.
    pub preview_rows: usize,
    /// Initial window length in minutes.
    pub default_minutes: i32,
    /// Step of the minutes spinner.
    pub minutes_step: i32,
    pub language: Language,
    /// Initial window size in points.
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            preview_rows: 1000,
            default_minutes: 200,
            minutes_step: 100,
            language: Language::En,
            window_size: [1200.0, 800.0],
        }
    }
}

impl DashboardConfig {
    /// Parse a config file. Out-of-range values are pulled back into range.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let mut config: DashboardConfig =
            serde_json::from_str(text).context("parsing dashboard config")?;
        config.default_minutes = clamp_minutes(config.default_minutes.into());
        config.minutes_step = config.minutes_step.max(1);
        Ok(config)
    }

    /// Config from `MODBUS_DASHBOARD_CONFIG`, or defaults. A broken file is
    /// logged and ignored.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
            return Self::default();
        };
        match Self::from_file(Path::new(&path)) {
            Ok(config) => {
                log::info!("Using dashboard config from {}", Path::new(&path).display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring dashboard config: {e:#}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = DashboardConfig::from_json(r#"{"language": "vi", "preview_rows": 50}"#).unwrap();
        assert_eq!(config.language, Language::Vi);
        assert_eq!(config.preview_rows, 50);
        assert_eq!(config.default_minutes, 200);
    }

    #[test]
    fn minutes_are_pulled_into_range() {
        let config =
            DashboardConfig::from_json(r#"{"default_minutes": 99999, "minutes_step": 0}"#).unwrap();
        assert_eq!(config.default_minutes, 10_000);
        assert_eq!(config.minutes_step, 1);
    }

    #[test]
    fn bad_json_is_an_error() {
        assert!(DashboardConfig::from_json("{language: }").is_err());
    }
}
