//! Output and chart configuration
//!
//! Every field has a default, so an empty (or absent) config file
//! reproduces the standard output layout.
//!
//! # Example TOML
//! ```toml
//! csv_file = "all_result.csv"
//! width = 1024
//! height = 768
//!
//! [guides]
//! time_linear = 0.02
//! ```

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Smallest accepted chart dimension in pixels
pub const MIN_CHART_DIMENSION: u32 = 100;

/// Coefficients of the dashed reference lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuideConfig {
    /// `y = k * x` on the time chart
    pub time_linear: f64,
    /// `y = k * x^2` on the time chart
    pub time_quadratic: f64,
    /// `y = k * x` on the attempts chart
    pub attempts_linear: f64,
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            time_linear: 0.01,
            time_quadratic: 0.0001,
            attempts_linear: 0.5,
        }
    }
}

/// Output file names and chart geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotConfig {
    pub csv_file: String,
    pub time_chart_file: String,
    pub attempts_chart_file: String,
    /// Chart width in pixels
    pub width: u32,
    /// Chart height in pixels
    pub height: u32,
    pub guides: GuideConfig,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            csv_file: "all_result.csv".to_string(),
            time_chart_file: "cas_scaling_time_all.png".to_string(),
            attempts_chart_file: "cas_scaling_attempts_all.png".to_string(),
            width: 800,
            height: 600,
            guides: GuideConfig::default(),
        }
    }
}

impl PlotConfig {
    /// Load and validate a configuration file
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML config")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would produce unusable output
    pub fn validate(&self) -> Result<()> {
        for (key, name) in [
            ("csv_file", &self.csv_file),
            ("time_chart_file", &self.time_chart_file),
            ("attempts_chart_file", &self.attempts_chart_file),
        ] {
            if name.trim().is_empty() {
                bail!("{key} must not be empty");
            }
        }

        if self.width < MIN_CHART_DIMENSION || self.height < MIN_CHART_DIMENSION {
            bail!(
                "chart size {}x{} is too small (minimum {}x{})",
                self.width,
                self.height,
                MIN_CHART_DIMENSION,
                MIN_CHART_DIMENSION
            );
        }

        for (key, value) in [
            ("guides.time_linear", self.guides.time_linear),
            ("guides.time_quadratic", self.guides.time_quadratic),
            ("guides.attempts_linear", self.guides.attempts_linear),
        ] {
            if !(value.is_finite() && value > 0.0) {
                bail!("{key} must be a positive number, got {value}");
            }
        }

        Ok(())
    }
}
