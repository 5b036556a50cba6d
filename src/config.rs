use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::graph::builder::SizeScale;
use crate::graph::controller::InteractionSettings;
use crate::graph::theme::ThemePreference;
use crate::render::FocusOptions;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Read artefacts from this directory instead of the API
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub theme: ThemePreference,
    #[serde(default)]
    pub interaction: InteractionConfig,
    #[serde(default)]
    pub sizing: SizingConfig,
}

fn default_api_url() -> String {
    "https://simppl-python.onrender.com".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionConfig {
    #[serde(default = "default_click_delay_ms")]
    pub click_delay_ms: u64,
    #[serde(default = "default_focus_scale")]
    pub focus_scale: f64,
    #[serde(default = "default_true")]
    pub animate_focus: bool,
}

fn default_click_delay_ms() -> u64 {
    300
}

fn default_focus_scale() -> f64 {
    1.2
}

fn default_true() -> bool {
    true
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            click_delay_ms: default_click_delay_ms(),
            focus_scale: default_focus_scale(),
            animate_focus: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizingConfig {
    #[serde(default = "default_min_size")]
    pub min: f64,
    #[serde(default = "default_max_size")]
    pub max: f64,
}

fn default_min_size() -> f64 {
    3.0
}

fn default_max_size() -> f64 {
    10.0
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            min: default_min_size(),
            max: default_max_size(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            data_dir: None,
            theme: ThemePreference::default(),
            interaction: InteractionConfig::default(),
            sizing: SizingConfig::default(),
        }
    }
}

impl Config {
    /// Get the configuration directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("crossnet");
        Ok(config_dir)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default location, falling back to the
    /// built-in defaults when no file exists yet.
    pub fn load_or_default() -> Result<Self> {
        let config_path = match Self::config_path() {
            Ok(path) => path,
            Err(e) => {
                tracing::debug!("{}; using default configuration", e);
                return Ok(Self::default());
            }
        };

        if !config_path.exists() {
            tracing::debug!(
                "No configuration at {}; using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        config.expand_env_vars();
        config.validate()?;

        Ok(config)
    }

    /// Expand environment variables in configuration values
    fn expand_env_vars(&mut self) {
        self.api_url = expand_env_var(&self.api_url);
        if let Some(dir) = &self.data_dir {
            let expanded = expand_env_var(&dir.to_string_lossy());
            self.data_dir = if expanded.is_empty() {
                None
            } else {
                Some(PathBuf::from(expanded))
            };
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.sizing.min > 0.0 && self.sizing.min <= self.sizing.max) {
            anyhow::bail!(
                "Invalid sizing range [{}, {}]: min must be positive and not above max",
                self.sizing.min,
                self.sizing.max
            );
        }
        if self.interaction.focus_scale <= 0.0 {
            anyhow::bail!("focus_scale must be positive");
        }
        Ok(())
    }

    pub fn size_scale(&self) -> SizeScale {
        SizeScale {
            min: self.sizing.min,
            max: self.sizing.max,
        }
    }

    pub fn interaction_settings(&self) -> InteractionSettings {
        InteractionSettings {
            click_delay: Duration::from_millis(self.interaction.click_delay_ms),
            focus: FocusOptions {
                scale: self.interaction.focus_scale,
                animation: self.interaction.animate_focus,
            },
        }
    }
}

/// Expand environment variable references like ${VAR_NAME}
fn expand_env_var(value: &str) -> String {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).unwrap_or_default()
    } else if let Some(var_name) = value.strip_prefix('$') {
        std::env::var(var_name).unwrap_or_default()
    } else {
        value.to_string()
    }
}
