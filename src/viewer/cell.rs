//! `ZoomCell`: one bound thumbnail.
//!
//! Wires the thumbnail's click to its [`ZoomAnchor`], learns the image's
//! natural size from an off-screen probe, re-places the open preview after
//! the overlay lays out, and arms the dismiss capture once the opening click
//! has finished propagating.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlDivElement, HtmlElement, HtmlImageElement, MouseEvent};

use super::{dom_err, rect_of, sync_open_markers, WeakCellRegistry};
use crate::anchor::ZoomAnchor;
use crate::error::Result;
use crate::layout::Viewport;
use crate::types::Size;

/// Attribute set on a thumbnail while its preview is open (for host styling)
const OPEN_ATTRIBUTE: &str = "data-zoom-open";

/// Shared state behind a `ZoomCell`; listeners hold it weakly.
pub(crate) struct CellState {
    pub(crate) anchor: ZoomAnchor,
    pub(crate) thumbnail: HtmlElement,
    overlay: HtmlDivElement,
    probe: HtmlImageElement,
    arm_delay_ms: u32,
    arm_timer: Option<i32>,
    arm_closure: Option<Closure<dyn FnMut()>>,
}

impl CellState {
    /// Re-size and re-place an open preview after the viewport changed.
    pub(crate) fn refresh(&mut self, viewport: Viewport) {
        if !self.anchor.is_open() {
            return;
        }
        let rect = rect_of(&self.thumbnail);
        // Drops the old measurement so the viewport cap applies again.
        self.anchor.relayout(rect, viewport);
        self.measure_overlay(viewport);
    }

    /// Second placement pass with the overlay's laid-out size.
    fn measure_overlay(&mut self, viewport: Viewport) {
        if !self.anchor.is_open() {
            return;
        }
        let measured = rect_of(&self.overlay);
        self.anchor
            .preview_measured(Size::new(measured.width, measured.height), viewport);
    }

    /// Drop the open marker if this cell no longer owns the preview.
    pub(crate) fn sync_open_marker(&self) {
        if !self.anchor.is_open() {
            let _ = self.thumbnail.remove_attribute(OPEN_ATTRIBUTE);
        }
    }

    fn clear_arm_timer(&mut self) {
        if let Some(timer_id) = self.arm_timer.take() {
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(timer_id);
            }
        }
    }
}

/// A thumbnail bound to the page's zoom coordinator
#[wasm_bindgen]
pub struct ZoomCell {
    state: Rc<RefCell<CellState>>,
    thumbnail: HtmlElement,
    click_closure: Closure<dyn FnMut(MouseEvent)>,
    #[allow(dead_code)]
    load_closure: Closure<dyn FnMut()>,
}

impl ZoomCell {
    pub(crate) fn bind(
        anchor: ZoomAnchor,
        thumbnail: HtmlElement,
        overlay: HtmlDivElement,
        arm_delay_ms: u32,
        cells: WeakCellRegistry,
    ) -> Result<Self> {
        let probe = HtmlImageElement::new().map_err(dom_err)?;

        let mut anchor = anchor;
        {
            let thumbnail = thumbnail.clone();
            anchor.set_on_close(move || {
                let _ = thumbnail.remove_attribute(OPEN_ATTRIBUTE);
            });
        }

        let state = Rc::new(RefCell::new(CellState {
            anchor,
            thumbnail: thumbnail.clone(),
            overlay,
            probe: probe.clone(),
            arm_delay_ms,
            arm_timer: None,
            arm_closure: None,
        }));

        let click_closure = {
            let weak_state = Rc::downgrade(&state);
            Closure::wrap(Box::new(move |_event: MouseEvent| {
                if let Some(state) = weak_state.upgrade() {
                    Self::handle_click(&state);
                }
                if let Some(cells) = cells.upgrade() {
                    sync_open_markers(&cells);
                }
            }) as Box<dyn FnMut(MouseEvent)>)
        };
        thumbnail
            .add_event_listener_with_callback("click", click_closure.as_ref().unchecked_ref())
            .map_err(dom_err)?;

        let load_closure = {
            let weak_state = Rc::downgrade(&state);
            Closure::wrap(Box::new(move || {
                if let Some(state) = weak_state.upgrade() {
                    Self::handle_image_load(&state);
                }
            }) as Box<dyn FnMut()>)
        };
        probe.set_onload(Some(load_closure.as_ref().unchecked_ref()));
        probe.set_src(state.borrow().anchor.key());

        Ok(Self {
            state,
            thumbnail,
            click_closure,
            load_closure,
        })
    }

    pub(crate) fn state(&self) -> &Rc<RefCell<CellState>> {
        &self.state
    }

    fn handle_click(state: &Rc<RefCell<CellState>>) {
        let viewport = Viewport::from_window().unwrap_or_default();
        let mut s = state.borrow_mut();
        let rect = rect_of(&s.thumbnail);
        if s.anchor.interact(rect, viewport) {
            let _ = s.thumbnail.set_attribute(OPEN_ATTRIBUTE, "true");
            s.measure_overlay(viewport);
            drop(s);
            Self::schedule_arm(state);
        } else {
            s.clear_arm_timer();
            let _ = s.thumbnail.remove_attribute(OPEN_ATTRIBUTE);
        }
    }

    fn handle_image_load(state: &Rc<RefCell<CellState>>) {
        let viewport = Viewport::from_window().unwrap_or_default();
        let mut s = state.borrow_mut();
        let natural = Size::new(
            f64::from(s.probe.natural_width()),
            f64::from(s.probe.natural_height()),
        );
        s.anchor.image_loaded(natural, viewport);
        s.measure_overlay(viewport);
    }

    /// Arm the dismiss capture after the opening click has finished
    /// propagating, so that click is never seen as an outside click.
    fn schedule_arm(state: &Rc<RefCell<CellState>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut s = state.borrow_mut();
        s.clear_arm_timer();
        if s.arm_closure.is_none() {
            let weak_state: Weak<RefCell<CellState>> = Rc::downgrade(state);
            let closure = Closure::wrap(Box::new(move || {
                if let Some(state) = weak_state.upgrade() {
                    let mut s = state.borrow_mut();
                    s.arm_timer = None;
                    if let Some(handle) = s.anchor.handle() {
                        handle.arm_dismiss();
                    }
                }
            }) as Box<dyn FnMut()>);
            s.arm_closure = Some(closure);
        }
        let Some(callback) = s.arm_closure.as_ref() else {
            return;
        };
        let delay = i32::try_from(s.arm_delay_ms).unwrap_or(i32::MAX);
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            delay,
        ) {
            Ok(id) => s.arm_timer = Some(id),
            Err(_) => s.arm_timer = None,
        }
    }
}

#[wasm_bindgen]
impl ZoomCell {
    /// Point the cell at a different image; an open preview closes.
    #[wasm_bindgen(js_name = "setSource")]
    pub fn set_source(&self, key: &str) {
        let mut s = self.state.borrow_mut();
        if s.anchor.key() == key {
            return;
        }
        s.clear_arm_timer();
        s.anchor.set_source(key);
        s.probe.set_src(key);
        let _ = s.thumbnail.remove_attribute(OPEN_ATTRIBUTE);
    }

    /// Close this cell's preview if it is the open one.
    pub fn close(&self) {
        let mut s = self.state.borrow_mut();
        s.clear_arm_timer();
        s.anchor.close();
        let _ = s.thumbnail.remove_attribute(OPEN_ATTRIBUTE);
    }

    #[wasm_bindgen(js_name = "isOpen")]
    pub fn is_open(&self) -> bool {
        self.state.borrow().anchor.is_open()
    }

    pub fn key(&self) -> String {
        self.state.borrow().anchor.key().to_string()
    }
}

impl Drop for ZoomCell {
    fn drop(&mut self) {
        let _ = self.thumbnail.remove_event_listener_with_callback(
            "click",
            self.click_closure.as_ref().unchecked_ref(),
        );
        if let Ok(mut s) = self.state.try_borrow_mut() {
            s.probe.set_onload(None);
            s.clear_arm_timer();
            // Unmounting the anchor hides its preview if still open.
            s.anchor.close();
            let _ = s.thumbnail.remove_attribute(OPEN_ATTRIBUTE);
        }
    }
}
