//! Browser tests for the DOM surface.
//!
//! Run with: wasm-pack test --headless --chrome

#![cfg(target_arch = "wasm32")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use cellzoom::CellZoom;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

fn thumbnail() -> HtmlElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let element: HtmlElement = document.create_element("div").unwrap().dyn_into().unwrap();
    let _ = element.style().set_property("width", "50px");
    let _ = element.style().set_property("height", "50px");
    document.body().unwrap().append_child(&element).unwrap();
    element
}

#[wasm_bindgen_test]
fn test_click_toggles_preview() {
    let zoom = CellZoom::new(JsValue::UNDEFINED).unwrap();
    let thumb = thumbnail();
    let cell = zoom.bind("a.png", thumb.clone()).unwrap();

    thumb.click();
    assert!(cell.is_open());
    assert_eq!(thumb.get_attribute("data-zoom-open").as_deref(), Some("true"));

    thumb.click();
    assert!(!cell.is_open());
    assert_eq!(thumb.get_attribute("data-zoom-open"), None);
    assert_eq!(zoom.active_key(), None);
}

#[wasm_bindgen_test]
fn test_second_cell_closes_first() {
    let zoom = CellZoom::new(JsValue::UNDEFINED).unwrap();
    let first_thumb = thumbnail();
    let second_thumb = thumbnail();
    let first = zoom.bind("a.png", first_thumb.clone()).unwrap();
    let second = zoom.bind("b.png", second_thumb.clone()).unwrap();

    first_thumb.click();
    second_thumb.click();

    assert!(!first.is_open());
    assert!(second.is_open());
    assert_eq!(first_thumb.get_attribute("data-zoom-open"), None);
    assert_eq!(zoom.active_key().as_deref(), Some("b.png"));
}

#[wasm_bindgen_test]
fn test_freeing_open_cell_closes_preview() {
    let zoom = CellZoom::new(JsValue::UNDEFINED).unwrap();
    let thumb = thumbnail();
    let cell = zoom.bind("a.png", thumb.clone()).unwrap();

    thumb.click();
    drop(cell);

    assert_eq!(zoom.active_key(), None);
}

#[wasm_bindgen_test]
fn test_close_all() {
    let zoom = CellZoom::new(JsValue::UNDEFINED).unwrap();
    let thumb = thumbnail();
    let cell = zoom.bind("a.png", thumb.clone()).unwrap();

    thumb.click();
    assert!(zoom.close_all());
    assert!(!cell.is_open());
    assert_eq!(thumb.get_attribute("data-zoom-open"), None);
    assert!(!zoom.close_all());
}

#[wasm_bindgen_test]
fn test_set_source_closes_open_preview() {
    let zoom = CellZoom::new(JsValue::UNDEFINED).unwrap();
    let thumb = thumbnail();
    let cell = zoom.bind("a.png", thumb.clone()).unwrap();

    thumb.click();
    cell.set_source("b.png");

    assert!(!cell.is_open());
    assert_eq!(cell.key(), "b.png");
}

#[wasm_bindgen_test]
fn test_invalid_options_rejected() {
    let options = js_sys::Object::new();
    js_sys::Reflect::set(&options, &"margin".into(), &JsValue::from_f64(-1.0)).unwrap();
    assert!(CellZoom::new(options.into()).is_err());
}

#[wasm_bindgen_test]
fn test_shared_key_moves_open_marker() {
    let zoom = CellZoom::new(JsValue::UNDEFINED).unwrap();
    let first_thumb = thumbnail();
    let second_thumb = thumbnail();
    let first = zoom.bind("same.png", first_thumb.clone()).unwrap();
    let second = zoom.bind("same.png", second_thumb.clone()).unwrap();

    first_thumb.click();
    second_thumb.click();

    assert!(!first.is_open());
    assert!(second.is_open());
    assert_eq!(first_thumb.get_attribute("data-zoom-open"), None);
    assert_eq!(second_thumb.get_attribute("data-zoom-open").as_deref(), Some("true"));
}
