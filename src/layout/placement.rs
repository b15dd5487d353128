//! Preview placement and sizing.
//!
//! Pure functions: the same inputs always give the same box. Callers run them
//! once with an estimated preview size before the overlay has laid out, then
//! again with the measured size; the box may shift slightly between the two.

use super::Viewport;
use crate::config::ZoomConfig;
use crate::types::{PlacementResult, PreviewFrame, Rect, Size};

/// Position the preview next to its anchor, inside the viewport.
///
/// Prefers the right-hand side of the anchor, top-aligned with it. Bottom
/// overflow pulls the preview up; right overflow flips it to the left of the
/// anchor when it fits there, otherwise it is right-aligned against the
/// viewport edge.
pub fn compute_placement(
    anchor: Rect,
    preview: Size,
    viewport: Viewport,
    margin: f64,
) -> PlacementResult {
    let mut top = anchor.top;
    let mut left = anchor.right() + margin;

    if top + preview.height > viewport.height {
        top = margin.max(viewport.height - preview.height - margin);
    }
    // Anchor scrolled partly above the viewport
    if top < 0.0 {
        top = margin;
    }

    if left + preview.width > viewport.width {
        if anchor.left > preview.width + margin {
            left = anchor.left - preview.width - margin;
        } else {
            left = margin.max(viewport.width - preview.width - margin);
        }
    }

    PlacementResult { top, left }
}

/// Size of the preview for an image with the given natural size.
///
/// The image is fitted into `base_width x base_height` keeping its aspect
/// ratio, then each side is capped to `max_viewport_fraction` of the
/// matching viewport side. The overlay letterboxes the image inside the
/// capped box. Unknown or degenerate natural sizes yield the base box as-is.
pub fn compute_preview_dimensions(
    natural: Option<Size>,
    viewport: Viewport,
    base_width: f64,
    base_height: f64,
    max_viewport_fraction: f64,
) -> Size {
    let Some(natural) = natural.filter(Size::is_usable) else {
        return Size::new(base_width, base_height);
    };

    let fit = (base_width / natural.width).min(base_height / natural.height);
    let fitted = Size::new(natural.width * fit, natural.height * fit);

    let cap = viewport.capped(max_viewport_fraction);
    Size::new(fitted.width.min(cap.width), fitted.height.min(cap.height))
}

/// [`compute_preview_dimensions`] with the sizes taken from `config`.
pub fn preview_dimensions(natural: Option<Size>, viewport: Viewport, config: &ZoomConfig) -> Size {
    compute_preview_dimensions(
        natural,
        viewport,
        config.base_width,
        config.base_height,
        config.max_viewport_fraction,
    )
}

/// Full preview box for an anchor.
///
/// `measured` is the preview's laid-out size when the caller has one; before
/// the first layout it is `None` and the computed dimensions stand in.
pub fn frame_preview(
    anchor: Rect,
    natural: Option<Size>,
    measured: Option<Size>,
    viewport: Viewport,
    config: &ZoomConfig,
) -> PreviewFrame {
    let size = measured
        .filter(Size::is_usable)
        .unwrap_or_else(|| preview_dimensions(natural, viewport, config));
    let placement = compute_placement(anchor, size, viewport, config.margin);
    PreviewFrame::new(placement, size)
}
