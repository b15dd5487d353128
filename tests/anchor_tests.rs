//! Anchor (image cell) tests
//!
//! Toggling, mutual exclusion between cells, unmount behaviour, image load,
//! remeasure/resize and source changes.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use std::cell::Cell;
use std::rc::Rc;

use cellzoom::coordinator::DismissSignal;
use cellzoom::{Rect, Size, Viewport, ZoomAnchor, ZoomConfig, ZoomCoordinator};
use common::{assert_close, RecordingTarget, TargetEvent};

struct Grid {
    coordinator: ZoomCoordinator,
    config: Rc<ZoomConfig>,
    target: RecordingTarget,
}

impl Grid {
    fn new() -> Self {
        let config = Rc::new(ZoomConfig::default());
        let coordinator = ZoomCoordinator::new(&config);
        let target = RecordingTarget::new();
        coordinator.attach_target(target.boxed());
        Self {
            coordinator,
            config,
            target,
        }
    }

    fn anchor(&self, key: &str) -> ZoomAnchor {
        ZoomAnchor::new(self.coordinator.clone(), Rc::clone(&self.config), key)
    }
}

fn viewport() -> Viewport {
    Viewport::new(1000.0, 800.0)
}

fn cell_at(top: f64, left: f64) -> Rect {
    Rect::new(top, left, 50.0, 50.0)
}

#[test]
fn test_click_opens_and_reclick_closes() {
    let grid = Grid::new();
    let mut anchor = grid.anchor("a.png");

    assert!(anchor.interact(cell_at(100.0, 100.0), viewport()));
    assert!(anchor.is_open());
    assert!(grid.coordinator.is_active("a.png"));

    assert!(!anchor.interact(cell_at(100.0, 100.0), viewport()));
    assert!(!anchor.is_open());
    assert_eq!(grid.coordinator.active_key(), None);
    assert_eq!(grid.target.events().last(), Some(&TargetEvent::Unmount));
}

#[test]
fn test_open_mounts_base_box_before_load() {
    let grid = Grid::new();
    let mut anchor = grid.anchor("a.png");
    anchor.interact(cell_at(100.0, 100.0), viewport());

    let mounted = grid.target.last_mount().unwrap();
    assert_eq!(mounted.image_key, "a.png");
    assert_eq!(mounted.frame.top, 100.0);
    assert_eq!(mounted.frame.left, 160.0);
    assert_eq!(mounted.frame.width, 400.0);
    assert_eq!(mounted.frame.height, 400.0);
}

#[test]
fn test_opening_another_cell_closes_first() {
    let grid = Grid::new();
    let mut first = grid.anchor("a.png");
    let mut second = grid.anchor("b.png");
    let first_closed = Rc::new(Cell::new(0));
    {
        let first_closed = Rc::clone(&first_closed);
        first.set_on_close(move || first_closed.set(first_closed.get() + 1));
    }

    first.interact(cell_at(100.0, 100.0), viewport());
    second.interact(cell_at(300.0, 100.0), viewport());

    assert!(!first.is_open());
    assert!(second.is_open());
    assert_eq!(first_closed.get(), 1);

    // Clicking the superseded cell opens it again rather than "closing" it.
    assert!(first.interact(cell_at(100.0, 100.0), viewport()));
    assert!(!second.is_open());
}

#[test]
fn test_shared_key_takeover_reports_first_closed() {
    let grid = Grid::new();
    let mut first = grid.anchor("same.png");
    let mut second = grid.anchor("same.png");
    let first_closed = Rc::new(Cell::new(0));
    {
        let first_closed = Rc::clone(&first_closed);
        first.set_on_close(move || first_closed.set(first_closed.get() + 1));
    }

    first.interact(cell_at(100.0, 100.0), viewport());
    second.interact(cell_at(300.0, 100.0), viewport());

    // No forced close, but the first cell no longer owns the preview.
    assert_eq!(first_closed.get(), 0);
    assert!(!first.is_open());
    assert!(second.is_open());
    assert_eq!(grid.target.last_mount().unwrap().frame.top, 300.0);
}

#[test]
fn test_unmounting_open_cell_hides() {
    let grid = Grid::new();
    {
        let mut anchor = grid.anchor("a.png");
        anchor.interact(cell_at(100.0, 100.0), viewport());
        assert!(grid.coordinator.is_mounted());
    }
    assert_eq!(grid.coordinator.active_key(), None);
    assert!(!grid.coordinator.is_mounted());
}

#[test]
fn test_unmounting_superseded_cell_keeps_newer() {
    let grid = Grid::new();
    let mut second = grid.anchor("b.png");
    {
        let mut first = grid.anchor("a.png");
        first.interact(cell_at(100.0, 100.0), viewport());
        second.interact(cell_at(300.0, 100.0), viewport());
    }
    assert!(second.is_open());
    assert!(grid.coordinator.is_mounted());
}

#[test]
fn test_image_load_resizes_open_preview() {
    let grid = Grid::new();
    let mut anchor = grid.anchor("a.png");
    anchor.interact(cell_at(100.0, 100.0), viewport());

    anchor.image_loaded(Size::new(800.0, 400.0), viewport());

    let mounted = grid.target.last_mount().unwrap();
    assert_close(mounted.frame.width, 400.0);
    assert_close(mounted.frame.height, 200.0);
    assert_eq!(anchor.request().natural_size, Some(Size::new(800.0, 400.0)));
}

#[test]
fn test_image_load_while_closed_does_not_mount() {
    let grid = Grid::new();
    let mut anchor = grid.anchor("a.png");

    anchor.image_loaded(Size::new(800.0, 400.0), viewport());

    assert!(grid.target.events().is_empty());
    // Opening later uses the loaded size straight away.
    anchor.interact(cell_at(100.0, 100.0), viewport());
    assert_close(grid.target.last_mount().unwrap().frame.height, 200.0);
}

#[test]
fn test_measured_size_replaces_estimate() {
    let grid = Grid::new();
    let mut anchor = grid.anchor("a.png");
    anchor.interact(cell_at(100.0, 500.0), viewport());
    assert_eq!(grid.target.last_mount().unwrap().frame.left, 560.0);

    // Laid out wider than estimated: now overflows the right edge and flips.
    anchor.preview_measured(Size::new(460.0, 400.0), viewport());

    let frame = grid.target.last_mount().unwrap().frame;
    assert_eq!(frame.width, 460.0);
    assert_eq!(frame.left, 500.0 - 460.0 - 10.0);
}

#[test]
fn test_remeasure_follows_anchor() {
    let grid = Grid::new();
    let mut anchor = grid.anchor("a.png");
    anchor.interact(cell_at(100.0, 100.0), viewport());

    anchor.remeasure(cell_at(200.0, 120.0), viewport());

    let frame = grid.target.last_mount().unwrap().frame;
    assert_eq!(frame.top, 200.0);
    assert_eq!(frame.left, 180.0);
}

#[test]
fn test_resize_recomputes_against_new_viewport() {
    let grid = Grid::new();
    let mut anchor = grid.anchor("a.png");
    anchor.interact(cell_at(100.0, 100.0), viewport());
    anchor.image_loaded(Size::new(400.0, 400.0), viewport());
    anchor.preview_measured(Size::new(402.0, 402.0), viewport());

    let small = Viewport::new(300.0, 300.0);
    anchor.viewport_resized(small);

    // Measurement dropped; fitted size capped to 80% of the new viewport.
    let frame = grid.target.last_mount().unwrap().frame;
    assert_close(frame.width, 240.0);
    assert_close(frame.height, 240.0);
}

#[test]
fn test_window_resize_reapplies_viewport_cap() {
    let grid = Grid::new();
    let mut anchor = grid.anchor("a.png");
    anchor.interact(cell_at(100.0, 100.0), viewport());
    anchor.image_loaded(Size::new(400.0, 400.0), viewport());
    anchor.preview_measured(Size::new(400.0, 400.0), viewport());

    // Resize handler: relayout, then read back the overlay's laid-out size.
    let small = Viewport::new(300.0, 300.0);
    anchor.relayout(cell_at(20.0, 20.0), small);
    let laid_out = grid.target.last_mount().unwrap().frame.size();
    anchor.preview_measured(laid_out, small);

    let frame = grid.target.last_mount().unwrap().frame;
    assert_close(frame.width, 240.0);
    assert_close(frame.height, 240.0);
    assert!(frame.left + frame.width <= small.width);
    assert!(frame.top + frame.height <= small.height);
}

#[test]
fn test_source_change_closes_and_forgets_size() {
    let grid = Grid::new();
    let mut anchor = grid.anchor("a.png");
    anchor.image_loaded(Size::new(800.0, 400.0), viewport());
    anchor.interact(cell_at(100.0, 100.0), viewport());

    anchor.set_source("b.png");

    assert!(!anchor.is_open());
    assert_eq!(grid.coordinator.active_key(), None);
    assert_eq!(anchor.key(), "b.png");
    assert_eq!(anchor.request().natural_size, None);
}

#[test]
fn test_same_source_keeps_preview_open() {
    let grid = Grid::new();
    let mut anchor = grid.anchor("a.png");
    anchor.interact(cell_at(100.0, 100.0), viewport());

    anchor.set_source("a.png");

    assert!(anchor.is_open());
}

#[test]
fn test_outside_click_closes_cell_and_runs_hook() {
    let grid = Grid::new();
    let mut anchor = grid.anchor("a.png");
    let closed = Rc::new(Cell::new(false));
    {
        let closed = Rc::clone(&closed);
        anchor.set_on_close(move || closed.set(true));
    }
    anchor.interact(cell_at(100.0, 100.0), viewport());
    assert!(anchor.handle().unwrap().arm_dismiss());

    assert!(grid
        .coordinator
        .handle_signal(DismissSignal::PointerDown { x: 900.0, y: 700.0 }));

    assert!(closed.get());
    assert!(!anchor.is_open());
    assert!(anchor.handle().is_none());
}

#[test]
fn test_explicit_close_uses_same_path() {
    let grid = Grid::new();
    let mut anchor = grid.anchor("a.png");
    let hook_calls = Rc::new(Cell::new(0));
    {
        let hook_calls = Rc::clone(&hook_calls);
        anchor.set_on_close(move || hook_calls.set(hook_calls.get() + 1));
    }
    anchor.interact(cell_at(100.0, 100.0), viewport());

    anchor.close();

    assert!(!anchor.is_open());
    assert_eq!(grid.coordinator.active_key(), None);
    // Closing your own preview is not a forced close.
    assert_eq!(hook_calls.get(), 0);
}
