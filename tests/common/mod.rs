//! Shared helpers for coordinator and anchor tests.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use cellzoom::{OverlayTarget, PreviewContent};

/// What the coordinator asked the overlay target to do
#[derive(Debug, Clone, PartialEq)]
pub enum TargetEvent {
    Mount(PreviewContent),
    Unmount,
    Armed,
}

/// Overlay target that records every call for later inspection
#[derive(Clone, Default)]
pub struct RecordingTarget {
    pub events: Rc<RefCell<Vec<TargetEvent>>>,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boxed(&self) -> Box<dyn OverlayTarget> {
        Box::new(self.clone())
    }

    pub fn events(&self) -> Vec<TargetEvent> {
        self.events.borrow().clone()
    }

    pub fn last_mount(&self) -> Option<PreviewContent> {
        self.events.borrow().iter().rev().find_map(|e| match e {
            TargetEvent::Mount(content) => Some(content.clone()),
            _ => None,
        })
    }

    pub fn count(&self, wanted: &TargetEvent) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| std::mem::discriminant(*e) == std::mem::discriminant(wanted))
            .count()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl OverlayTarget for RecordingTarget {
    fn mount(&mut self, content: &PreviewContent) {
        self.events
            .borrow_mut()
            .push(TargetEvent::Mount(content.clone()));
    }

    fn unmount(&mut self) {
        self.events.borrow_mut().push(TargetEvent::Unmount);
    }

    fn capture_armed(&mut self) {
        self.events.borrow_mut().push(TargetEvent::Armed);
    }
}

/// Close callback that counts its invocations
pub fn counter(calls: &Rc<Cell<u32>>) -> impl FnMut() + 'static {
    let calls = Rc::clone(calls);
    move || calls.set(calls.get() + 1)
}

/// Assert two floats are equal within a small tolerance
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}
