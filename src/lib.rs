//! cellzoom - click-to-zoom previews for image cells in data grids
//!
//! Magnifies grid thumbnails in a floating preview, via WebAssembly:
//! - One preview open at a time across any number of image cells
//! - Preview placed beside its cell, flipped and clamped to stay on screen
//! - Aspect-preserving sizing once the image's natural size is known
//! - Closes on re-click, outside click, Escape, or an optional close button
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { CellZoom } from 'cellzoom';
//! await init();
//! const zoom = new CellZoom({ showCloseButton: true });
//! const cell = zoom.bind(url, thumbnail);
//! ```

// Core (all targets)
pub mod anchor;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod layout;
pub mod logging;
pub mod types;

// Browser surface
#[cfg(target_arch = "wasm32")]
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use anchor::ZoomAnchor;
pub use config::ZoomConfig;
pub use coordinator::{OverlayTarget, ZoomCoordinator, ZoomHandle};
pub use layout::{compute_placement, compute_preview_dimensions, Viewport};
#[cfg(target_arch = "wasm32")]
pub use viewer::{CellZoom, ZoomCell};

pub use types::*;

/// Placement of a preview beside its anchor
///
/// # Arguments
/// * `anchor` - `{ top, left, width, height }` of the thumbnail
/// * `preview` - `{ width, height }` of the preview
/// * `viewport` - `{ width, height }` of the viewport
/// * `margin` - gap in pixels, defaults to 10
///
/// # Errors
/// Returns an error if an argument does not have the expected shape.
#[wasm_bindgen(js_name = "getPlacement")]
pub fn get_placement(
    anchor: JsValue,
    preview: JsValue,
    viewport: JsValue,
    margin: Option<f64>,
) -> Result<JsValue, JsValue> {
    let anchor: Rect = serde_wasm_bindgen::from_value(anchor).map_err(js_err)?;
    let preview: Size = serde_wasm_bindgen::from_value(preview).map_err(js_err)?;
    let viewport: Viewport = serde_wasm_bindgen::from_value(viewport).map_err(js_err)?;
    let margin = margin.unwrap_or(config::DEFAULT_MARGIN);

    let placement = compute_placement(anchor, preview, viewport, margin);
    serde_wasm_bindgen::to_value(&placement).map_err(js_err)
}

/// Preview size for an image, `{ width, height }`
///
/// `natural` may be `null`/`undefined` while the image is still loading, in
/// which case the base box is returned. `options` takes `ZoomConfig` fields.
///
/// # Errors
/// Returns an error if an argument does not have the expected shape.
#[wasm_bindgen(js_name = "getPreviewDimensions")]
pub fn get_preview_dimensions(
    natural: JsValue,
    viewport: JsValue,
    options: JsValue,
) -> Result<JsValue, JsValue> {
    let natural: Option<Size> = serde_wasm_bindgen::from_value(natural).map_err(js_err)?;
    let viewport: Viewport = serde_wasm_bindgen::from_value(viewport).map_err(js_err)?;
    let config: ZoomConfig = if options.is_undefined() || options.is_null() {
        ZoomConfig::default()
    } else {
        serde_wasm_bindgen::from_value(options).map_err(js_err)?
    };

    let size = layout::preview_dimensions(natural, viewport, &config);
    serde_wasm_bindgen::to_value(&size).map_err(js_err)
}

/// Route `cellzoom` log records to the browser console (`"debug"`, `"trace"`, ...)
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = "initLogging")]
pub fn init_logging(level: Option<String>) {
    logging::init(logging::parse_level(level.as_deref().unwrap_or("warn")));
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn js_err(e: serde_wasm_bindgen::Error) -> JsValue {
    JsValue::from_str(&format!("Serialization error: {e}"))
}
