use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BUBBLE_DISTANCE: f64 = 120.0;
pub const DEFAULT_BUBBLE_SIZE: f64 = 100.0;
pub const DEFAULT_SPHERE_RADIUS: f64 = 500.0;
pub const DEFAULT_FOCUS_ZOOM_SCALE: f64 = 1.6;
pub const DEFAULT_NATURAL_SIZE: f64 = 200.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub bubble_distance: f64,
    pub bubble_size: f64,
    pub sphere_radius: f64,
    pub focus_zoom_scale: f64,
    pub initial_focus: bool,
    pub natural_size: f64,
    pub snap_to_bubbles: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            bubble_distance: DEFAULT_BUBBLE_DISTANCE,
            bubble_size: DEFAULT_BUBBLE_SIZE,
            sphere_radius: DEFAULT_SPHERE_RADIUS,
            focus_zoom_scale: DEFAULT_FOCUS_ZOOM_SCALE,
            initial_focus: false,
            natural_size: DEFAULT_NATURAL_SIZE,
            snap_to_bubbles: true,
        }
    }
}

impl LayoutConfig {
    pub fn for_bubble_size(bubble_size: f64) -> Self {
        Self {
            bubble_distance: bubble_size * 1.2,
            bubble_size,
            sphere_radius: bubble_size * 5.0,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("bubble_distance", self.bubble_distance)?;
        ensure_positive("bubble_size", self.bubble_size)?;
        ensure_positive("sphere_radius", self.sphere_radius)?;
        ensure_positive("focus_zoom_scale", self.focus_zoom_scale)?;
        ensure_positive("natural_size", self.natural_size)?;
        Ok(())
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

fn ensure_positive(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::InvalidParameter(format!(
            "{name} must be a finite value > 0"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() -> Result<()> {
        let config = LayoutConfig::from_json(r#"{ "bubble_size": 80, "initial_focus": true }"#)?;
        assert_eq!(config.bubble_size, 80.0);
        assert!(config.initial_focus);
        assert_eq!(config.bubble_distance, DEFAULT_BUBBLE_DISTANCE);
        assert_eq!(config.focus_zoom_scale, DEFAULT_FOCUS_ZOOM_SCALE);
        Ok(())
    }

    #[test]
    fn non_positive_radius_is_rejected() {
        let config = LayoutConfig {
            sphere_radius: 0.0,
            ..LayoutConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidParameter(message)) if message.contains("sphere_radius")
        ));
    }

    #[test]
    fn bubble_size_preset_scales_spacing() {
        let config = LayoutConfig::for_bubble_size(100.0);
        assert_eq!(config.bubble_distance, 120.0);
        assert_eq!(config.sphere_radius, 500.0);
    }
}
