#![forbid(unsafe_code)]

//! Engine tuning constants.
//!
//! Captures every tunable parameter of the glow engine as a single
//! [`EngineConfig`] that can be built in code or, with the `config-file`
//! feature, loaded from TOML or JSON at startup.
//!
//! # Loading
//!
//! ```toml
//! # edgeglow.toml
//! proximity_threshold = 80.0
//! spring_factor = 0.2
//!
//! [render]
//! segment_base_length = 16.0
//! ```
//!
//! ```rust,ignore
//! let config = EngineConfig::from_toml_file("edgeglow.toml")?;
//! let config = EngineConfig::from_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! `EngineConfig::default()` is the tuned set the engine ships with. Partial
//! files override only the keys they name; everything else keeps its default.
//!
//! # Invariants
//!
//! A config accepted by [`EngineConfig::validated`] satisfies
//! `0 < spring_factor <= 1`, `0 < velocity_boost_decay < 1`,
//! `proximity_threshold > 0`, and every other field finite and non-negative.

#[cfg(feature = "config-file")]
use std::path::Path;

#[cfg(feature = "config-file")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::velocity::BoostPolicy;

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

/// Process-wide tuning constants for the glow engine.
///
/// Shared read-only by every tile. Cheap to clone, but hosts usually keep a
/// single instance behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct EngineConfig {
    /// Distance (px) at which a tile starts reacting. Default: 60.
    pub proximity_threshold: f64,
    /// Exponential smoothing coefficient in (0, 1]. Default: 0.15.
    pub spring_factor: f64,
    /// Intensity below which nothing is drawn. Default: 0.01.
    pub min_intensity_for_render: f64,
    /// Boost gained per px/ms of pointer speed. Default: 0.005.
    pub velocity_sensitivity: f64,
    /// Per-frame multiplicative boost decay in (0, 1). Default: 0.9.
    pub velocity_boost_decay: f64,
    /// Upper bound for the velocity boost. Default: 0.5.
    pub max_velocity_boost: f64,
    /// Border stroke width (px) the host paints with. Default: 2.
    pub border_width: f64,
    /// Minimum gap (ms) between samples for a speed estimate. Default: 1.
    pub min_sample_interval_ms: f64,
    /// Movement below which a step does not report a change. Default: 1e-4.
    pub change_epsilon: f64,
    /// How new velocity contributions merge into the shared boost.
    pub boost_policy: BoostPolicy,
    /// Render mapper constants.
    pub render: RenderTuning,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            proximity_threshold: 60.0,
            spring_factor: 0.15,
            min_intensity_for_render: 0.01,
            velocity_sensitivity: 0.005,
            velocity_boost_decay: 0.9,
            max_velocity_boost: 0.5,
            border_width: 2.0,
            min_sample_interval_ms: 1.0,
            change_epsilon: 1e-4,
            boost_policy: BoostPolicy::default(),
            render: RenderTuning::default(),
        }
    }
}

impl EngineConfig {
    /// Upper bound of the integrated intensity: `1 + max_velocity_boost`.
    #[inline]
    #[must_use]
    pub fn max_intensity(&self) -> f64 {
        1.0 + self.max_velocity_boost
    }

    /// Load from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] on malformed input and
    /// [`ConfigError::Validation`] when a value is out of range.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    ///
    /// # Errors
    ///
    /// See [`from_toml_str`](Self::from_toml_str); also fails on I/O errors.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] on malformed input and
    /// [`ConfigError::Validation`] when a value is out of range.
    #[cfg(feature = "config-file")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validated()
    }

    /// Load from a JSON file on disk.
    ///
    /// # Errors
    ///
    /// See [`from_json_str`](Self::from_json_str); also fails on I/O errors.
    #[cfg(feature = "config-file")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !(self.proximity_threshold.is_finite() && self.proximity_threshold > 0.0) {
            errors.push(format!(
                "proximity_threshold must be > 0, got {}",
                self.proximity_threshold
            ));
        }

        // Spring factor 0 would freeze the tile; above 1 overshoots.
        if !(self.spring_factor > 0.0 && self.spring_factor <= 1.0) {
            errors.push(format!(
                "spring_factor must be in (0, 1], got {}",
                self.spring_factor
            ));
        }

        if !(self.min_intensity_for_render >= 0.0 && self.min_intensity_for_render < 1.0) {
            errors.push(format!(
                "min_intensity_for_render must be in [0, 1), got {}",
                self.min_intensity_for_render
            ));
        }

        if !(self.velocity_boost_decay > 0.0 && self.velocity_boost_decay < 1.0) {
            errors.push(format!(
                "velocity_boost_decay must be in (0, 1), got {}",
                self.velocity_boost_decay
            ));
        }

        if !(self.change_epsilon.is_finite() && self.change_epsilon > 0.0) {
            errors.push(format!(
                "change_epsilon must be > 0, got {}",
                self.change_epsilon
            ));
        }

        for (name, value) in [
            ("velocity_sensitivity", self.velocity_sensitivity),
            ("max_velocity_boost", self.max_velocity_boost),
            ("border_width", self.border_width),
            ("min_sample_interval_ms", self.min_sample_interval_ms),
        ] {
            check_non_negative(&mut errors, name, value);
        }

        self.render.validate_into(&mut errors);
        errors
    }

    /// Consume the config, returning it only if [`validate`](Self::validate)
    /// finds nothing wrong.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] with every violation found.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            #[cfg(feature = "tracing")]
            tracing::warn!(count = errors.len(), "engine config rejected");
            Err(ConfigError::Validation(errors))
        }
    }

    /// Format as a JSONL line for structured logging.
    #[must_use]
    pub fn to_jsonl(&self) -> String {
        format!(
            r#"{{"schema":"edgeglow-config-v1","proximity_threshold":{},"spring_factor":{},"min_intensity_for_render":{},"velocity_sensitivity":{},"velocity_boost_decay":{},"max_velocity_boost":{},"border_width":{},"boost_policy":"{}"}}"#,
            self.proximity_threshold,
            self.spring_factor,
            self.min_intensity_for_render,
            self.velocity_sensitivity,
            self.velocity_boost_decay,
            self.max_velocity_boost,
            self.border_width,
            self.boost_policy.as_str(),
        )
    }
}

fn check_non_negative(errors: &mut Vec<String>, name: &str, value: f64) {
    if !(value.is_finite() && value >= 0.0) {
        errors.push(format!("{name} must be finite and >= 0, got {value}"));
    }
}

// ---------------------------------------------------------------------------
// RenderTuning
// ---------------------------------------------------------------------------

/// Constants used by the render mapper.
///
/// Lengths are percentages of the active edge; scales multiply
/// [`EngineConfig::border_width`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct RenderTuning {
    /// Segment length floor at full steady-state intensity. Default: 20.
    pub segment_base_length: f64,
    /// Extra length at zero intensity, shrinking as intensity rises. Default: 25.
    pub segment_shrink: f64,
    /// Extra length per unit of velocity overshoot above 1. Default: 30.
    pub overshoot_growth: f64,
    /// Corner wedge size at zero intensity, in border widths. Default: 3.
    pub corner_base_scale: f64,
    /// Corner wedge growth per unit intensity, in border widths. Default: 5.
    pub corner_growth_scale: f64,
    /// Glow radius (px) at zero intensity. Default: 2.
    pub glow_base_radius: f64,
    /// Glow radius (px) gained per unit intensity. Default: 12.
    pub glow_gain: f64,
}

impl Default for RenderTuning {
    fn default() -> Self {
        Self {
            segment_base_length: 20.0,
            segment_shrink: 25.0,
            overshoot_growth: 30.0,
            corner_base_scale: 3.0,
            corner_growth_scale: 5.0,
            glow_base_radius: 2.0,
            glow_gain: 12.0,
        }
    }
}

impl RenderTuning {
    fn validate_into(&self, errors: &mut Vec<String>) {
        for (name, value) in [
            ("render.segment_base_length", self.segment_base_length),
            ("render.segment_shrink", self.segment_shrink),
            ("render.overshoot_growth", self.overshoot_growth),
            ("render.corner_base_scale", self.corner_base_scale),
            ("render.corner_growth_scale", self.corner_growth_scale),
            ("render.glow_base_radius", self.glow_base_radius),
            ("render.glow_gain", self.glow_gain),
        ] {
            check_non_negative(errors, name, value);
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading an engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config-file")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config-file")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// Validation errors.
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
