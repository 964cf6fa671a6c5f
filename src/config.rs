use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::discovery::MatchingOptions;
use crate::engine::EngineOptions;
use crate::profile::CssOptions;
use crate::scoring::ScoreWeights;
use crate::visual::VisualOptions;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Tunables read from an optional TOML file.
///
/// ```toml
/// [weights]
/// layout = 0.35
/// css = 0.35
/// html = 0.25
///
/// [visual]
/// histogram_bins = 8
/// canny_low = 100
/// canny_high = 200
/// max_height_divergence = 2.0
///
/// [matching]
/// fuzzy_threshold = 0.5
///
/// [css]
/// breakpoint_tolerance = 20
/// common_breakpoints = [480, 768, 992, 1200]
/// ```
///
/// Every section and key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub weights: ScoreWeights,
    pub visual: VisualOptions,
    pub matching: MatchingOptions,
    pub css: CssOptions,
}

impl Config {
    /// Read `path` when given; otherwise return the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.weights;
        for (name, value) in [("layout", w.layout), ("css", w.css), ("html", w.html)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "weight '{name}' must be a non-negative number (got {value})"
                )));
            }
        }
        if w.sum() > 1.0 + 1e-9 {
            return Err(ConfigError::Invalid(format!(
                "weights sum to {:.3}; they must sum to at most 1.0",
                w.sum()
            )));
        }

        let v = &self.visual;
        if v.histogram_bins == 0 || v.histogram_bins > 256 {
            return Err(ConfigError::Invalid(format!(
                "visual.histogram_bins must be between 1 and 256 (got {})",
                v.histogram_bins
            )));
        }
        if !(v.canny_low >= 0.0 && v.canny_low < v.canny_high) {
            return Err(ConfigError::Invalid(format!(
                "canny_low ({}) must be non-negative and below canny_high ({})",
                v.canny_low, v.canny_high
            )));
        }
        if !(v.max_height_divergence.is_finite() && v.max_height_divergence >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "visual.max_height_divergence must be non-negative (got {})",
                v.max_height_divergence
            )));
        }

        validate_unit_interval("matching.fuzzy_threshold", self.matching.fuzzy_threshold)?;

        if self.css.common_breakpoints.is_empty() {
            return Err(ConfigError::Invalid(
                "css.common_breakpoints must list at least one width".to_string(),
            ));
        }
        Ok(())
    }

    pub fn engine_options(&self, visuals_dir: Option<PathBuf>) -> EngineOptions {
        EngineOptions {
            weights: self.weights,
            visual: self.visual,
            matching: self.matching,
            css: self.css.clone(),
            visuals_dir,
        }
    }
}

fn validate_unit_interval(name: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{name} must be within [0, 1] (got {value})"
        )))
    }
}
