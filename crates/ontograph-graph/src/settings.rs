//! Graph settings loaded from YAML
//!
//! Every section has defaults, so a settings file only needs the keys it
//! overrides. The process-wide instance is read once from the path in
//! `ONTOGRAPH_SETTINGS` (see `config/graph_settings.yaml`); without it the
//! built-in defaults apply.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

use crate::graph::adapter::EdgeLabels;
use crate::graph::camera::ViewportLimits;
use crate::graph::force_sim::ForceConfig;
use crate::graph::render::RenderStyle;

/// Environment variable naming the settings file
pub const SETTINGS_ENV: &str = "ONTOGRAPH_SETTINGS";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> SettingsError {
    SettingsError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// All tunables of the graph view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    pub layout: ForceConfig,
    pub viewport: ViewportLimits,
    pub labels: EdgeLabels,
    pub render: RenderStyle,
}

impl GraphSettings {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the viewport or the layout cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let viewport = &self.viewport;
        if !(viewport.min_scale.is_finite() && viewport.min_scale > 0.0) {
            return Err(invalid(
                "viewport.min_scale",
                format!("{} is not a positive number", viewport.min_scale),
            ));
        }
        if !viewport.max_scale.is_finite() || viewport.max_scale < viewport.min_scale {
            return Err(invalid(
                "viewport.max_scale",
                format!("{} is below min_scale {}", viewport.max_scale, viewport.min_scale),
            ));
        }
        if !(viewport.zoom_step.is_finite() && viewport.zoom_step > 0.0) {
            return Err(invalid(
                "viewport.zoom_step",
                format!("{} is not a positive number", viewport.zoom_step),
            ));
        }
        if !viewport.scroll_sensitivity.is_finite() {
            return Err(invalid("viewport.scroll_sensitivity", "must be finite"));
        }

        let layout = &self.layout;
        if !(layout.alpha_decay > 0.0 && layout.alpha_decay < 1.0) {
            return Err(invalid(
                "layout.alpha_decay",
                format!("{} is outside (0, 1)", layout.alpha_decay),
            ));
        }
        if !(layout.alpha_min > 0.0 && layout.alpha_min.is_finite()) {
            return Err(invalid(
                "layout.alpha_min",
                format!("{} is not a positive number", layout.alpha_min),
            ));
        }
        if !(layout.alpha_target < layout.alpha_min) {
            return Err(invalid(
                "layout.alpha_target",
                format!("{} must be below alpha_min {}", layout.alpha_target, layout.alpha_min),
            ));
        }
        if !(0.0..=1.0).contains(&layout.velocity_decay) {
            return Err(invalid(
                "layout.velocity_decay",
                format!("{} is outside [0, 1]", layout.velocity_decay),
            ));
        }
        let finite = [
            ("layout.charge_strength", layout.charge_strength),
            ("layout.min_distance", layout.min_distance),
            ("layout.link_distance", layout.link_distance),
            ("layout.link_strength", layout.link_strength),
            ("layout.center_strength", layout.center_strength),
            ("layout.alpha_start", layout.alpha_start),
            ("layout.max_velocity", layout.max_velocity),
            ("layout.initial_radius", layout.initial_radius),
            ("layout.jitter", layout.jitter),
        ];
        if let Some((field, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(*field, "must be finite"));
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Settings from `ONTOGRAPH_SETTINGS`, falling back to defaults
    pub fn from_env() -> Self {
        let Ok(path) = std::env::var(SETTINGS_ENV) else {
            return Self::default();
        };
        match Self::load(&path) {
            Ok(settings) => {
                tracing::info!("loaded graph settings from {}", path);
                settings
            }
            Err(e) => {
                tracing::warn!("{}; using default graph settings", e);
                Self::default()
            }
        }
    }
}

static GLOBAL_SETTINGS: OnceLock<GraphSettings> = OnceLock::new();

/// Process-wide settings, resolved on first use
pub fn global_settings() -> &'static GraphSettings {
    GLOBAL_SETTINGS.get_or_init(GraphSettings::from_env)
}
