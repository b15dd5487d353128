//! Per-cell zoom state.
//!
//! A `ZoomAnchor` is the model behind one image thumbnail in the grid. It
//! toggles its preview on interaction, keeps the preview placed as the anchor
//! is remeasured, the viewport resizes or the image finishes loading, and
//! hides it again when the anchor is dropped or its source changes.
//!
//! Whether the anchor is open is read from its coordinator handle, never
//! stored separately, so an anchor superseded by another one reports closed
//! without having to be told.

use std::rc::Rc;

use crate::config::ZoomConfig;
use crate::coordinator::{ZoomCoordinator, ZoomHandle};
use crate::layout::{frame_preview, Viewport};
use crate::types::{PreviewFrame, Rect, Size, ZoomRequest};

/// Hook run when the coordinator force-closes this anchor's preview
pub type CloseHook = Rc<dyn Fn()>;

pub struct ZoomAnchor {
    coordinator: ZoomCoordinator,
    config: Rc<ZoomConfig>,
    request: ZoomRequest,
    /// Size the overlay actually laid out at, for the second placement pass
    measured: Option<Size>,
    handle: Option<ZoomHandle>,
    on_close: Option<CloseHook>,
}

impl ZoomAnchor {
    pub fn new(coordinator: ZoomCoordinator, config: Rc<ZoomConfig>, key: &str) -> Self {
        Self {
            coordinator,
            config,
            request: ZoomRequest::new(key, Rect::default()),
            measured: None,
            handle: None,
            on_close: None,
        }
    }

    /// Run `hook` whenever another preview, an outside click or Escape closes
    /// this anchor's preview.
    pub fn set_on_close(&mut self, hook: impl Fn() + 'static) {
        self.on_close = Some(Rc::new(hook));
    }

    pub fn key(&self) -> &str {
        &self.request.image_key
    }

    pub fn request(&self) -> &ZoomRequest {
        &self.request
    }

    pub fn is_open(&self) -> bool {
        self.handle.as_ref().is_some_and(ZoomHandle::is_current)
    }

    /// Click on the thumbnail: open the preview, or close it if already open.
    ///
    /// Returns whether the preview is open afterwards.
    pub fn interact(&mut self, anchor_rect: Rect, viewport: Viewport) -> bool {
        if self.is_open() {
            self.close();
            return false;
        }
        self.request.anchor_rect = anchor_rect;
        self.measured = None;

        let hook = self.on_close.clone();
        let handle = self.coordinator.request_show(&self.request.image_key, move || {
            if let Some(hook) = hook.as_ref() {
                hook();
            }
        });
        // Replacing a stale handle drops it; its hide is a no-op.
        self.handle = Some(handle);
        self.present(viewport);
        true
    }

    /// Close this anchor's preview, if it still owns it.
    pub fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.hide();
        }
    }

    /// The image finished loading with its natural size.
    pub fn image_loaded(&mut self, natural: Size, viewport: Viewport) {
        self.request.natural_size = Some(natural);
        self.measured = None;
        self.present(viewport);
    }

    /// The thumbnail's bounding box changed.
    pub fn remeasure(&mut self, anchor_rect: Rect, viewport: Viewport) {
        self.request.anchor_rect = anchor_rect;
        self.present(viewport);
    }

    /// The viewport was resized. The preview size depends on the viewport, so
    /// the previous measurement no longer applies.
    pub fn viewport_resized(&mut self, viewport: Viewport) {
        self.measured = None;
        self.present(viewport);
    }

    /// Window resize as the browser reports it: the anchor has moved and the
    /// viewport changed in one step. Size is recomputed from scratch; the
    /// caller measures the overlay again afterwards.
    pub fn relayout(&mut self, anchor_rect: Rect, viewport: Viewport) {
        self.request.anchor_rect = anchor_rect;
        self.viewport_resized(viewport);
    }

    /// The overlay has laid out at `size`; re-place it using the real size.
    pub fn preview_measured(&mut self, size: Size, viewport: Viewport) {
        self.measured = Some(size).filter(Size::is_usable);
        self.present(viewport);
    }

    /// Point the anchor at a different image. An open preview for the old
    /// image closes and the natural size is forgotten.
    pub fn set_source(&mut self, key: &str) {
        if key == self.request.image_key {
            return;
        }
        self.close();
        self.request.image_key = key.to_string();
        self.request.natural_size = None;
        self.measured = None;
    }

    /// Where the preview goes for the current request.
    pub fn frame(&self, viewport: Viewport) -> PreviewFrame {
        frame_preview(
            self.request.anchor_rect,
            self.request.natural_size,
            self.measured,
            viewport,
            &self.config,
        )
    }

    /// The handle this anchor holds, while it owns the open preview
    pub fn handle(&self) -> Option<&ZoomHandle> {
        self.handle.as_ref().filter(|h| h.is_current())
    }

    fn present(&mut self, viewport: Viewport) {
        let frame = self.frame(viewport);
        let anchor = self.request.anchor_rect;
        let still_open = self
            .handle
            .as_ref()
            .is_some_and(|handle| handle.present(frame, anchor));
        if !still_open {
            self.handle = None;
        }
    }
}
