use serde::{Deserialize, Serialize};

use super::{PreviewFrame, Rect, Size};

/// A request to magnify one image, created when its anchor is interacted with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoomRequest {
    /// Identifies the image instance (its source locator)
    pub image_key: String,
    /// Last measured bounding box of the triggering thumbnail
    pub anchor_rect: Rect,
    /// Intrinsic pixel size, known only once the image has loaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub natural_size: Option<Size>,
}

impl ZoomRequest {
    pub fn new(image_key: impl Into<String>, anchor_rect: Rect) -> Self {
        Self {
            image_key: image_key.into(),
            anchor_rect,
            natural_size: None,
        }
    }
}

/// What the overlay target is asked to draw
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewContent {
    /// Key (source locator) of the image being magnified
    pub image_key: String,
    /// Where and how large to draw it
    pub frame: PreviewFrame,
}

/// Opaque identity of one `request_show` call.
///
/// Tokens increase monotonically per coordinator, so a stale handle can never
/// match a newer preview even when both share the same image key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandleToken(pub(crate) u64);

impl HandleToken {
    pub fn value(self) -> u64 {
        self.0
    }
}
