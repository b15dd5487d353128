//! Dismiss capture for the open preview.
//!
//! While a preview is open the coordinator listens for signals that should
//! close it: a pointer press outside the preview and its anchor, or Escape.
//! Capture opens in a pending state and only goes live once the host has
//! called [`DismissCapture::arm`] after the opening interaction finished
//! propagating, so the click that opened the preview cannot close it.

use crate::config::ZoomConfig;
use crate::types::{HandleToken, Rect};

/// A host input event that may dismiss the preview
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DismissSignal {
    /// Pointer pressed at client coordinates
    PointerDown { x: f64, y: f64 },
    /// Escape key pressed
    Escape,
}

/// Capture lifecycle for one open preview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    /// Nothing open
    #[default]
    Idle,
    /// Preview open, waiting for the opening interaction to finish
    Pending(HandleToken),
    /// Live: signals are classified
    Armed(HandleToken),
}

#[derive(Debug, Clone, Default)]
pub struct DismissCapture {
    state: CaptureState,
    /// Regions where a pointer press does not count as "outside"
    regions: Vec<Rect>,
    close_on_outside_click: bool,
    close_on_escape: bool,
}

impl DismissCapture {
    pub fn new(config: &ZoomConfig) -> Self {
        Self {
            state: CaptureState::Idle,
            regions: Vec::new(),
            close_on_outside_click: config.close_on_outside_click,
            close_on_escape: config.close_on_escape,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, CaptureState::Armed(_))
    }

    /// Start a pending capture for a newly opened preview.
    pub fn open(&mut self, token: HandleToken) {
        self.state = CaptureState::Pending(token);
        self.regions.clear();
    }

    /// Go live. Only the pending preview's token arms; a timer scheduled for a
    /// preview that has since closed is ignored.
    pub fn arm(&mut self, token: HandleToken) -> bool {
        match self.state {
            CaptureState::Pending(pending) if pending == token => {
                self.state = CaptureState::Armed(token);
                true
            }
            _ => false,
        }
    }

    /// Hand the capture to a new token for the same preview, keeping its
    /// armed state and regions.
    pub fn transfer(&mut self, token: HandleToken) {
        self.state = match self.state {
            CaptureState::Idle | CaptureState::Pending(_) => CaptureState::Pending(token),
            CaptureState::Armed(_) => CaptureState::Armed(token),
        };
    }

    /// Replace the inside regions (anchor and preview boxes) for `token`.
    pub fn set_regions(&mut self, token: HandleToken, regions: &[Rect]) {
        if self.owner() == Some(token) {
            self.regions.clear();
            self.regions.extend_from_slice(regions);
        }
    }

    /// Stop capturing. Called on every close path.
    pub fn release(&mut self) {
        self.state = CaptureState::Idle;
        self.regions.clear();
    }

    /// Token of the preview this capture belongs to, armed or not.
    pub fn owner(&self) -> Option<HandleToken> {
        match self.state {
            CaptureState::Idle => None,
            CaptureState::Pending(token) | CaptureState::Armed(token) => Some(token),
        }
    }

    /// Decide whether `signal` dismisses the open preview.
    ///
    /// Returns the token of the preview to close, or `None` to ignore.
    pub fn classify(&self, signal: DismissSignal) -> Option<HandleToken> {
        let CaptureState::Armed(token) = self.state else {
            return None;
        };
        let dismiss = match signal {
            DismissSignal::PointerDown { x, y } => {
                self.close_on_outside_click && !self.regions.iter().any(|r| r.contains(x, y))
            }
            DismissSignal::Escape => self.close_on_escape,
        };
        dismiss.then_some(token)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn armed(token: u64) -> DismissCapture {
        let mut capture = DismissCapture::new(&ZoomConfig::default());
        capture.open(HandleToken(token));
        assert!(capture.arm(HandleToken(token)));
        capture
    }

    #[test]
    fn test_pending_ignores_everything() {
        let mut capture = DismissCapture::new(&ZoomConfig::default());
        capture.open(HandleToken(1));
        assert_eq!(
            capture.classify(DismissSignal::PointerDown { x: 5.0, y: 5.0 }),
            None
        );
        assert_eq!(capture.classify(DismissSignal::Escape), None);
    }

    #[test]
    fn test_stale_arm_rejected() {
        let mut capture = DismissCapture::new(&ZoomConfig::default());
        capture.open(HandleToken(1));
        capture.open(HandleToken(2));
        assert!(!capture.arm(HandleToken(1)));
        assert_eq!(capture.state(), CaptureState::Pending(HandleToken(2)));
    }

    #[test]
    fn test_press_inside_region_is_ignored() {
        let mut capture = armed(3);
        capture.set_regions(HandleToken(3), &[Rect::new(0.0, 0.0, 50.0, 50.0)]);
        assert_eq!(
            capture.classify(DismissSignal::PointerDown { x: 25.0, y: 25.0 }),
            None
        );
        assert_eq!(
            capture.classify(DismissSignal::PointerDown { x: 80.0, y: 25.0 }),
            Some(HandleToken(3))
        );
    }

    #[test]
    fn test_regions_for_other_token_ignored() {
        let mut capture = armed(3);
        capture.set_regions(HandleToken(9), &[Rect::new(0.0, 0.0, 50.0, 50.0)]);
        assert_eq!(
            capture.classify(DismissSignal::PointerDown { x: 25.0, y: 25.0 }),
            Some(HandleToken(3))
        );
    }

    #[test]
    fn test_escape_respects_config() {
        let config = ZoomConfig {
            close_on_escape: false,
            ..ZoomConfig::default()
        };
        let mut capture = DismissCapture::new(&config);
        capture.open(HandleToken(1));
        capture.arm(HandleToken(1));
        assert_eq!(capture.classify(DismissSignal::Escape), None);
    }

    #[test]
    fn test_release_goes_idle() {
        let mut capture = armed(4);
        capture.release();
        assert_eq!(capture.state(), CaptureState::Idle);
        assert_eq!(capture.owner(), None);
        assert_eq!(capture.classify(DismissSignal::Escape), None);
    }
}
