//! DOM overlay target: the single fixed-position element every preview is
//! drawn into, plus the document listeners of the dismiss capture.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, HtmlButtonElement, HtmlDivElement, HtmlImageElement, KeyboardEvent, MouseEvent,
};

use super::dom_err;
use crate::config::ZoomConfig;
use crate::coordinator::{DismissSignal, OverlayTarget, WeakCoordinator};
use crate::error::{CellZoomError, Result};
use crate::types::PreviewContent;

/// Document-level mousedown/keydown listeners, attached only while the
/// dismiss capture is armed.
struct DismissListeners {
    pointer: Closure<dyn FnMut(MouseEvent)>,
    key: Closure<dyn FnMut(KeyboardEvent)>,
    attached: bool,
}

impl DismissListeners {
    fn new(coordinator: &WeakCoordinator) -> Self {
        let pointer = {
            let coordinator = coordinator.clone();
            Closure::wrap(Box::new(move |event: MouseEvent| {
                if let Some(coordinator) = coordinator.upgrade() {
                    coordinator.handle_signal(DismissSignal::PointerDown {
                        x: f64::from(event.client_x()),
                        y: f64::from(event.client_y()),
                    });
                }
            }) as Box<dyn FnMut(MouseEvent)>)
        };
        let key = {
            let coordinator = coordinator.clone();
            Closure::wrap(Box::new(move |event: KeyboardEvent| {
                if event.key() != "Escape" {
                    return;
                }
                if let Some(coordinator) = coordinator.upgrade() {
                    coordinator.handle_signal(DismissSignal::Escape);
                }
            }) as Box<dyn FnMut(KeyboardEvent)>)
        };
        Self {
            pointer,
            key,
            attached: false,
        }
    }

    // Capture phase, so grid handlers that stop propagation cannot hide the
    // press from us.
    fn attach(&mut self, document: &Document) {
        if self.attached {
            return;
        }
        document
            .add_event_listener_with_callback_and_bool(
                "mousedown",
                self.pointer.as_ref().unchecked_ref(),
                true,
            )
            .ok();
        document
            .add_event_listener_with_callback_and_bool(
                "keydown",
                self.key.as_ref().unchecked_ref(),
                true,
            )
            .ok();
        self.attached = true;
    }

    fn detach(&mut self, document: &Document) {
        if !self.attached {
            return;
        }
        document
            .remove_event_listener_with_callback_and_bool(
                "mousedown",
                self.pointer.as_ref().unchecked_ref(),
                true,
            )
            .ok();
        document
            .remove_event_listener_with_callback_and_bool(
                "keydown",
                self.key.as_ref().unchecked_ref(),
                true,
            )
            .ok();
        self.attached = false;
    }
}

pub(crate) struct DomOverlay {
    document: Document,
    root: HtmlDivElement,
    image: HtmlImageElement,
    /// Key currently loaded into `image`
    shown_key: Option<String>,
    #[allow(dead_code)] // Kept to maintain DOM reference
    close_button: Option<HtmlButtonElement>,
    #[allow(dead_code)]
    close_closure: Option<Closure<dyn FnMut(MouseEvent)>>,
    listeners: DismissListeners,
}

impl DomOverlay {
    pub(crate) fn new(
        document: &Document,
        config: &ZoomConfig,
        coordinator: &WeakCoordinator,
    ) -> Result<Self> {
        let root: HtmlDivElement = document
            .create_element("div")
            .map_err(dom_err)?
            .dyn_into()
            .map_err(|_| CellZoomError::Dom("overlay is not a div".to_string()))?;
        root.set_class_name("cellzoom-overlay");
        let style = root.style();
        let _ = style.set_property("position", "fixed");
        let _ = style.set_property("display", "none");
        let _ = style.set_property("box-sizing", "border-box");
        let _ = style.set_property("overflow", "hidden");
        let _ = style.set_property("z-index", &config.z_index.to_string());
        let _ = style.set_property("background", &config.background_color);
        let _ = style.set_property("border", &format!("1px solid {}", config.border_color));
        let _ = style.set_property("box-shadow", "0 4px 16px rgba(0, 0, 0, 0.25)");

        let image = HtmlImageElement::new().map_err(dom_err)?;
        image.set_alt("");
        let image_style = image.style();
        let _ = image_style.set_property("display", "block");
        let _ = image_style.set_property("width", "100%");
        let _ = image_style.set_property("height", "100%");
        let _ = image_style.set_property("object-fit", "contain");
        root.append_child(&image).map_err(dom_err)?;

        let (close_button, close_closure) = if config.show_close_button {
            let button: HtmlButtonElement = document
                .create_element("button")
                .map_err(dom_err)?
                .dyn_into()
                .map_err(|_| CellZoomError::Dom("close control is not a button".to_string()))?;
            button.set_type("button");
            button.set_text_content(Some("\u{00D7}"));
            let _ = button.set_attribute("aria-label", "Close preview");
            let button_style = button.style();
            let _ = button_style.set_property("position", "absolute");
            let _ = button_style.set_property("top", "4px");
            let _ = button_style.set_property("right", "4px");
            let _ = button_style.set_property("cursor", "pointer");

            let coordinator = coordinator.clone();
            let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
                event.stop_propagation();
                if let Some(coordinator) = coordinator.upgrade() {
                    coordinator.dismiss_active();
                }
            }) as Box<dyn FnMut(MouseEvent)>);
            button
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
                .ok();
            root.append_child(&button).map_err(dom_err)?;
            (Some(button), Some(closure))
        } else {
            (None, None)
        };

        let body = document
            .body()
            .ok_or_else(|| CellZoomError::Dom("document has no body".to_string()))?;
        body.append_child(&root).map_err(dom_err)?;

        Ok(Self {
            document: document.clone(),
            root,
            image,
            shown_key: None,
            close_button,
            close_closure,
            listeners: DismissListeners::new(coordinator),
        })
    }

    pub(crate) fn root(&self) -> &HtmlDivElement {
        &self.root
    }
}

impl OverlayTarget for DomOverlay {
    fn mount(&mut self, content: &PreviewContent) {
        if self.shown_key.as_deref() != Some(content.image_key.as_str()) {
            self.image.set_src(&content.image_key);
            self.shown_key = Some(content.image_key.clone());
        }
        let frame = content.frame;
        let style = self.root.style();
        let _ = style.set_property("left", &format!("{}px", frame.left));
        let _ = style.set_property("top", &format!("{}px", frame.top));
        let _ = style.set_property("width", &format!("{}px", frame.width));
        let _ = style.set_property("height", &format!("{}px", frame.height));
        let _ = style.set_property("display", "block");
    }

    fn unmount(&mut self) {
        self.listeners.detach(&self.document);
        let _ = self.root.style().set_property("display", "none");
    }

    fn capture_armed(&mut self) {
        self.listeners.attach(&self.document);
    }
}

impl Drop for DomOverlay {
    fn drop(&mut self) {
        self.listeners.detach(&self.document);
        self.root.remove();
    }
}
