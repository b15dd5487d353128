//! Browser surface for the zoom coordinator (wasm32 only).
//!
//! This module provides the WASM-exported `CellZoom` struct that:
//! - Creates the single overlay element all previews share
//! - Binds grid thumbnails (`ZoomCell`) to the shared coordinator
//! - Re-places the open preview when the window resizes
//!
//! Event handlers are registered automatically; the host only calls `bind`
//! for each image cell it renders and drops the returned cell on unmount.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! const zoom = new CellZoom({ margin: 12, showCloseButton: true });
//! const cell = zoom.bind(imageUrl, thumbnailElement);
//! // ... on unmount
//! cell.free();
//! ```

mod cell;
mod overlay;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlDivElement, HtmlElement};

pub use cell::ZoomCell;

use crate::anchor::ZoomAnchor;
use crate::config::ZoomConfig;
use crate::coordinator::ZoomCoordinator;
use crate::error::CellZoomError;
use crate::layout::Viewport;
use crate::types::Rect;
use cell::CellState;
use overlay::DomOverlay;

pub(crate) fn dom_err(e: JsValue) -> CellZoomError {
    CellZoomError::Dom(e.as_string().unwrap_or_else(|| format!("{e:?}")))
}

/// Bounding client rect of an element as a `Rect`
pub(crate) fn rect_of(element: &Element) -> Rect {
    let r = element.get_bounding_client_rect();
    Rect::new(r.top(), r.left(), r.width(), r.height())
}

type CellRegistry = Rc<RefCell<Vec<Weak<RefCell<CellState>>>>>;
pub(crate) type WeakCellRegistry = Weak<RefCell<Vec<Weak<RefCell<CellState>>>>>;

/// Cells still bound, pruning entries for freed ones.
fn live_cells(cells: &CellRegistry) -> Vec<Rc<RefCell<CellState>>> {
    let mut registry = cells.borrow_mut();
    registry.retain(|cell| cell.strong_count() > 0);
    registry.iter().filter_map(Weak::upgrade).collect()
}

/// Clear the open marker on every cell that no longer owns the preview.
///
/// A cell bound to the key of the open preview can take it over without
/// the previous owner being closed, so its marker is cleared here.
fn sync_open_markers(cells: &CellRegistry) {
    for cell in live_cells(cells) {
        if let Ok(s) = cell.try_borrow() {
            s.sync_open_marker();
        }
    }
}

/// Zoom previews for every image cell of a grid
#[wasm_bindgen]
pub struct CellZoom {
    coordinator: ZoomCoordinator,
    config: Rc<ZoomConfig>,
    overlay: HtmlDivElement,
    cells: CellRegistry,
    resize_closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl CellZoom {
    fn refresh_cells(cells: &CellRegistry) {
        let viewport = Viewport::from_window().unwrap_or_default();
        for cell in live_cells(cells) {
            if let Ok(mut s) = cell.try_borrow_mut() {
                s.refresh(viewport);
            }
        }
    }
}

#[wasm_bindgen]
impl CellZoom {
    /// Create the overlay and start listening for window resizes.
    ///
    /// `options` is an optional object with `ZoomConfig` fields in camelCase.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<CellZoom, JsValue> {
        console_error_panic_hook::set_once();

        let config: ZoomConfig = if options.is_undefined() || options.is_null() {
            ZoomConfig::default()
        } else {
            serde_wasm_bindgen::from_value(options).map_err(CellZoomError::from)?
        };
        config.validate()?;

        let window = web_sys::window()
            .ok_or_else(|| CellZoomError::Dom("no global window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| CellZoomError::Dom("window has no document".to_string()))?;

        let coordinator = ZoomCoordinator::new(&config);
        let dom_overlay = DomOverlay::new(&document, &config, &coordinator.downgrade())?;
        let overlay = dom_overlay.root().clone();
        coordinator.attach_target(Box::new(dom_overlay));

        let cells: CellRegistry = Rc::new(RefCell::new(Vec::new()));
        let resize_closure = {
            let cells = Rc::clone(&cells);
            Closure::wrap(Box::new(move |_event: web_sys::Event| {
                Self::refresh_cells(&cells);
            }) as Box<dyn FnMut(web_sys::Event)>)
        };
        window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())
            .ok();

        log::debug!(target: "cellzoom::viewer", "overlay created");

        Ok(CellZoom {
            coordinator,
            config: Rc::new(config),
            overlay,
            cells,
            resize_closure,
        })
    }

    /// Bind a thumbnail element showing the image at `key`.
    ///
    /// The returned cell must be kept alive while the thumbnail is mounted;
    /// freeing it removes its listeners and closes its preview. Cells bound
    /// to the same `key` share one preview: clicking either opens it for
    /// that cell.
    pub fn bind(&self, key: &str, thumbnail: HtmlElement) -> Result<ZoomCell, JsValue> {
        let anchor = ZoomAnchor::new(self.coordinator.clone(), Rc::clone(&self.config), key);
        let cell = ZoomCell::bind(
            anchor,
            thumbnail,
            self.overlay.clone(),
            self.config.dismiss_arm_delay_ms,
            Rc::downgrade(&self.cells),
        )?;
        self.cells.borrow_mut().push(Rc::downgrade(cell.state()));
        Ok(cell)
    }

    /// Re-place the open preview against the current viewport size.
    #[wasm_bindgen(js_name = "onResize")]
    pub fn on_resize(&self) {
        Self::refresh_cells(&self.cells);
    }

    /// Close whichever preview is open. Returns whether one was.
    #[wasm_bindgen(js_name = "closeAll")]
    pub fn close_all(&self) -> bool {
        self.coordinator.dismiss_active()
    }

    /// Key of the open preview, if any
    #[wasm_bindgen(js_name = "activeKey")]
    pub fn active_key(&self) -> Option<String> {
        self.coordinator.active_key()
    }
}

impl Drop for CellZoom {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            let _ = window.remove_event_listener_with_callback(
                "resize",
                self.resize_closure.as_ref().unchecked_ref(),
            );
        }
        self.coordinator.dismiss_active();
    }
}
