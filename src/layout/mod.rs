//! Geometry for the magnified preview.
//!
//! This module handles:
//! - Viewport dimensions as read from the host page
//! - Placing the preview beside its anchor without leaving the viewport
//! - Sizing the preview from the image's natural aspect ratio

mod placement;
mod viewport;

pub use placement::{
    compute_placement, compute_preview_dimensions, frame_preview, preview_dimensions,
};
pub use viewport::Viewport;
