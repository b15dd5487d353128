//! Preview tunables.
//!
//! Every field has a default, so hosts may pass a partial options object
//! (`{ "margin": 16 }`) or nothing at all.

use serde::{Deserialize, Serialize};

use crate::error::{CellZoomError, Result};

/// Gap between anchor, preview and viewport edges (CSS px)
pub const DEFAULT_MARGIN: f64 = 10.0;
/// Width of the box an image is fitted into before viewport capping
pub const DEFAULT_BASE_WIDTH: f64 = 400.0;
/// Height of the box an image is fitted into before viewport capping
pub const DEFAULT_BASE_HEIGHT: f64 = 400.0;
/// Largest share of the viewport a preview may cover on either axis
pub const DEFAULT_MAX_VIEWPORT_FRACTION: f64 = 0.8;
/// Delay before the outside-click capture arms after an open
pub const DEFAULT_DISMISS_ARM_DELAY_MS: u32 = 100;

/// Configuration for the magnified preview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ZoomConfig {
    /// Gap in pixels between the anchor, the preview and the viewport edges
    pub margin: f64,
    /// Fitting box width for the preview
    pub base_width: f64,
    /// Fitting box height for the preview
    pub base_height: f64,
    /// Cap on preview size as a fraction of the viewport
    pub max_viewport_fraction: f64,
    /// Milliseconds to wait after opening before outside clicks count
    pub dismiss_arm_delay_ms: u32,
    /// Close when the pointer goes down outside the preview and anchor
    pub close_on_outside_click: bool,
    /// Close on the Escape key
    pub close_on_escape: bool,
    /// Render an explicit close control inside the preview
    pub show_close_button: bool,
    /// Stacking order of the overlay element
    pub z_index: i32,
    /// Background color behind the magnified image
    pub background_color: String,
    /// Border color of the preview box
    pub border_color: String,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
            base_width: DEFAULT_BASE_WIDTH,
            base_height: DEFAULT_BASE_HEIGHT,
            max_viewport_fraction: DEFAULT_MAX_VIEWPORT_FRACTION,
            dismiss_arm_delay_ms: DEFAULT_DISMISS_ARM_DELAY_MS,
            close_on_outside_click: true,
            close_on_escape: true,
            show_close_button: false,
            z_index: 10_000,
            background_color: "#FFFFFF".to_string(),
            border_color: "#CCCCCC".to_string(),
        }
    }
}

impl ZoomConfig {
    /// Parse options from a JSON string, filling unspecified fields with defaults.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or a field has the wrong type,
    /// or if the resulting values fail [`ZoomConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the geometry meaningless.
    ///
    /// # Errors
    /// Returns [`CellZoomError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(CellZoomError::Config(format!(
                "margin must be a non-negative number, got {}",
                self.margin
            )));
        }
        if !self.base_width.is_finite() || self.base_width <= 0.0 {
            return Err(CellZoomError::Config(format!(
                "baseWidth must be positive, got {}",
                self.base_width
            )));
        }
        if !self.base_height.is_finite() || self.base_height <= 0.0 {
            return Err(CellZoomError::Config(format!(
                "baseHeight must be positive, got {}",
                self.base_height
            )));
        }
        if !(self.max_viewport_fraction > 0.0 && self.max_viewport_fraction <= 1.0) {
            return Err(CellZoomError::Config(format!(
                "maxViewportFraction must be in (0, 1], got {}",
                self.max_viewport_fraction
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(ZoomConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ZoomConfig::from_json(r#"{"margin": 16, "showCloseButton": true}"#).unwrap();
        assert_eq!(config.margin, 16.0);
        assert!(config.show_close_button);
        assert_eq!(config.base_width, DEFAULT_BASE_WIDTH);
        assert_eq!(config.dismiss_arm_delay_ms, DEFAULT_DISMISS_ARM_DELAY_MS);
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(ZoomConfig::from_json("{}").unwrap(), ZoomConfig::default());
    }

    #[test]
    fn test_wrong_type_is_json_error() {
        let err = ZoomConfig::from_json(r#"{"margin": "wide"}"#).unwrap_err();
        assert!(matches!(err, CellZoomError::Json(_)));
    }

    #[test]
    fn test_fraction_out_of_range_rejected() {
        let err = ZoomConfig::from_json(r#"{"maxViewportFraction": 1.5}"#).unwrap_err();
        assert!(matches!(err, CellZoomError::Config(_)));
        assert!(err.to_string().contains("maxViewportFraction"));
    }

    #[test]
    fn test_negative_margin_rejected() {
        let err = ZoomConfig::from_json(r#"{"margin": -1}"#).unwrap_err();
        assert!(matches!(err, CellZoomError::Config(_)));
    }
}
