//! Viewport size as read from the host page.

use serde::{Deserialize, Serialize};

use crate::types::Size;

/// Viewport state - the visible area previews must stay inside
///
/// Callers re-query this on every resize; nothing in the crate caches it
/// across resizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    /// Viewport width in CSS pixels
    pub width: f64,
    /// Viewport height in CSS pixels
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl Viewport {
    /// Create a viewport with the given dimensions
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Largest box a preview may occupy: `fraction` of each axis.
    pub fn capped(&self, fraction: f64) -> Size {
        Size::new(
            (self.width * fraction).max(0.0),
            (self.height * fraction).max(0.0),
        )
    }

    /// Read the current window inner size (wasm32 only).
    #[cfg(target_arch = "wasm32")]
    pub fn from_window() -> Option<Self> {
        let window = web_sys::window()?;
        let width = window.inner_width().ok()?.as_f64()?;
        let height = window.inner_height().ok()?.as_f64()?;
        Some(Self::new(width, height))
    }
}
