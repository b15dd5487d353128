//! Single source of truth for which preview is open.
//!
//! A `ZoomCoordinator` is created once per application root and cloned into
//! every anchor; clones share state. It guarantees:
//! - at most one preview is active at any time
//! - opening a preview for another key force-closes the previous one
//! - a stale hide (from a superseded or unmounted anchor) never clears the
//!   state of a newer preview
//!
//! Staleness is decided by comparing the token issued with each
//! [`ZoomHandle`], never by trusting the caller.

mod capture;

pub use capture::{CaptureState, DismissCapture, DismissSignal};

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::config::ZoomConfig;
use crate::types::{HandleToken, PreviewContent, PreviewFrame, Rect};

const LOG_TARGET: &str = "cellzoom::coordinator";

/// The single render target previews are drawn into.
///
/// Implementations must not call back into the coordinator: they run while
/// its state is borrowed.
pub trait OverlayTarget {
    /// Draw or redraw the preview
    fn mount(&mut self, content: &PreviewContent);

    /// Hide the preview. Called on every close path.
    fn unmount(&mut self);

    /// Dismiss capture went live for the open preview
    fn capture_armed(&mut self) {}
}

type CloseCallback = Box<dyn FnMut()>;

struct ActivePreview {
    key: String,
    token: HandleToken,
    on_close: CloseCallback,
}

struct CoordinatorState {
    active: Option<ActivePreview>,
    next_token: u64,
    target: Option<Box<dyn OverlayTarget>>,
    mounted: bool,
    capture: DismissCapture,
}

impl CoordinatorState {
    fn issue_token(&mut self) -> HandleToken {
        self.next_token += 1;
        HandleToken(self.next_token)
    }

    fn active_token(&self) -> Option<HandleToken> {
        self.active.as_ref().map(|a| a.token)
    }

    fn unmount_target(&mut self) {
        if self.mounted {
            if let Some(target) = self.target.as_mut() {
                target.unmount();
            }
            self.mounted = false;
        }
    }

    /// Remove the active preview and tear down everything tied to it.
    fn take_active(&mut self) -> Option<ActivePreview> {
        let active = self.active.take()?;
        self.unmount_target();
        self.capture.release();
        Some(active)
    }
}

/// Arbitrates show/hide requests from every anchor on the page
#[derive(Clone)]
pub struct ZoomCoordinator {
    state: Rc<RefCell<CoordinatorState>>,
}

impl Default for ZoomCoordinator {
    fn default() -> Self {
        Self::new(&ZoomConfig::default())
    }
}

impl std::fmt::Debug for ZoomCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoomCoordinator")
            .field("active_key", &self.active_key())
            .field("capture", &self.capture_state())
            .finish()
    }
}

impl ZoomCoordinator {
    pub fn new(config: &ZoomConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(CoordinatorState {
                active: None,
                next_token: 0,
                target: None,
                mounted: false,
                capture: DismissCapture::new(config),
            })),
        }
    }

    /// Install the overlay target, replacing (and unmounting) any previous one.
    pub fn attach_target(&self, target: Box<dyn OverlayTarget>) {
        let mut s = self.state.borrow_mut();
        s.unmount_target();
        s.target = Some(target);
    }

    /// Open the preview for `key`, closing whichever other preview is open.
    ///
    /// `on_close` is invoked if the coordinator later closes this preview on
    /// its own (another key opened, outside click, Escape, [`Self::dismiss_active`]).
    /// It is not invoked when the returned handle hides its own preview.
    ///
    /// Showing a key that is already active is a no-op transition: nothing is
    /// closed and the previous callback is not invoked; the new handle takes
    /// over ownership.
    #[must_use = "dropping the handle hides the preview"]
    pub fn request_show(&self, key: &str, on_close: impl FnMut() + 'static) -> ZoomHandle {
        let (token, evicted, replaced) = {
            let mut s = self.state.borrow_mut();
            let token = s.issue_token();
            let entry = ActivePreview {
                key: key.to_string(),
                token,
                on_close: Box::new(on_close),
            };
            let (evicted, replaced) = match s.active.take() {
                Some(current) if current.key == key => {
                    log::trace!(target: LOG_TARGET, "show {key}: already active, token {} -> {}", current.token.0, token.0);
                    s.capture.transfer(token);
                    (None, Some(current))
                }
                Some(current) => {
                    log::debug!(target: LOG_TARGET, "show {key}: evicting {}", current.key);
                    s.unmount_target();
                    s.capture.open(token);
                    (Some(current), None)
                }
                None => {
                    log::debug!(target: LOG_TARGET, "show {key}");
                    s.capture.open(token);
                    (None, None)
                }
            };
            s.active = Some(entry);
            (token, evicted, replaced)
        };

        // Callbacks run with no borrow held so they may re-enter.
        drop(replaced);
        if let Some(mut evicted) = evicted {
            (evicted.on_close)();
        }

        ZoomHandle {
            key: key.to_string(),
            token,
            state: Rc::downgrade(&self.state),
        }
    }

    /// Hide the preview for `key` if it is the active one.
    ///
    /// A hide for any other key is stale and ignored. The close callback is
    /// not invoked: the caller is the owner asking to close.
    pub fn request_hide(&self, key: &str) {
        let removed = {
            let mut s = self.state.borrow_mut();
            let current = s.active.as_ref().map(|a| a.key.clone());
            match current {
                Some(current) if current == key => s.take_active(),
                Some(current) => {
                    log::trace!(target: LOG_TARGET, "stale hide for {key} ignored, {current} is active");
                    None
                }
                None => None,
            }
        };
        if removed.is_some() {
            log::debug!(target: LOG_TARGET, "hide {key}");
        }
    }

    /// Whether `key` owns the open preview
    pub fn is_active(&self, key: &str) -> bool {
        self.state
            .borrow()
            .active
            .as_ref()
            .is_some_and(|a| a.key == key)
    }

    /// Key of the open preview, if any
    pub fn active_key(&self) -> Option<String> {
        self.state.borrow().active.as_ref().map(|a| a.key.clone())
    }

    /// Token of the open preview, if any
    pub fn active_token(&self) -> Option<HandleToken> {
        self.state.borrow().active_token()
    }

    pub fn capture_state(&self) -> CaptureState {
        self.state.borrow().capture.state()
    }

    /// Whether the overlay target currently shows a preview
    pub fn is_mounted(&self) -> bool {
        self.state.borrow().mounted
    }

    /// Arm the dismiss capture for `token` once the opening interaction has
    /// finished. Returns `false` for a token that is no longer open.
    pub fn arm_dismiss(&self, token: HandleToken) -> bool {
        let mut s = self.state.borrow_mut();
        if !s.capture.arm(token) {
            return false;
        }
        log::trace!(target: LOG_TARGET, "dismiss capture armed for token {}", token.0);
        if let Some(target) = s.target.as_mut() {
            target.capture_armed();
        }
        true
    }

    /// Feed a host input signal to the dismiss capture. Returns `true` if it
    /// closed the open preview.
    pub fn handle_signal(&self, signal: DismissSignal) -> bool {
        let removed = {
            let mut s = self.state.borrow_mut();
            match s.capture.classify(signal) {
                Some(token) if s.active_token() == Some(token) => s.take_active(),
                _ => None,
            }
        };
        match removed {
            Some(mut active) => {
                log::debug!(target: LOG_TARGET, "dismissed {} by {signal:?}", active.key);
                (active.on_close)();
                true
            }
            None => false,
        }
    }

    /// Close the open preview, whoever owns it, notifying its owner.
    pub fn dismiss_active(&self) -> bool {
        let removed = self.state.borrow_mut().take_active();
        match removed {
            Some(mut active) => {
                log::debug!(target: LOG_TARGET, "dismissed {}", active.key);
                (active.on_close)();
                true
            }
            None => false,
        }
    }

    /// Weak reference for closures held by the overlay target, so the
    /// coordinator and its DOM listeners do not keep each other alive.
    pub fn downgrade(&self) -> WeakCoordinator {
        WeakCoordinator {
            state: Rc::downgrade(&self.state),
        }
    }
}

/// Non-owning reference to a [`ZoomCoordinator`]
#[derive(Clone)]
pub struct WeakCoordinator {
    state: Weak<RefCell<CoordinatorState>>,
}

impl WeakCoordinator {
    pub fn upgrade(&self) -> Option<ZoomCoordinator> {
        self.state.upgrade().map(|state| ZoomCoordinator { state })
    }
}

/// Ownership of one open preview, returned by [`ZoomCoordinator::request_show`].
///
/// Dropping the handle hides the preview if it is still the active one.
#[derive(Debug)]
pub struct ZoomHandle {
    key: String,
    token: HandleToken,
    state: Weak<RefCell<CoordinatorState>>,
}

impl ZoomHandle {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn token(&self) -> HandleToken {
        self.token
    }

    /// Whether this handle still owns the open preview
    pub fn is_current(&self) -> bool {
        self.state
            .upgrade()
            .is_some_and(|state| state.borrow().active_token() == Some(self.token))
    }

    /// Hide this handle's preview. No-op once superseded.
    pub fn hide(&self) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        let removed = match state.try_borrow_mut() {
            Ok(mut s) if s.active_token() == Some(self.token) => s.take_active(),
            Ok(_) => None,
            Err(_) => {
                log::warn!(target: LOG_TARGET, "hide for {} skipped: coordinator busy", self.key);
                None
            }
        };
        if removed.is_some() {
            log::debug!(target: LOG_TARGET, "hide {} (token {})", self.key, self.token.0);
        }
    }

    /// Draw `frame` into the overlay and record the regions where pointer
    /// presses do not dismiss. Returns `false` once superseded.
    pub fn present(&self, frame: PreviewFrame, anchor: Rect) -> bool {
        let Some(state) = self.state.upgrade() else {
            return false;
        };
        let mut s = state.borrow_mut();
        if s.active_token() != Some(self.token) {
            return false;
        }
        s.capture.set_regions(self.token, &[anchor, frame.as_rect()]);
        let content = PreviewContent {
            image_key: self.key.clone(),
            frame,
        };
        let mounted = match s.target.as_mut() {
            Some(target) => {
                target.mount(&content);
                true
            }
            None => false,
        };
        s.mounted |= mounted;
        true
    }

    /// See [`ZoomCoordinator::arm_dismiss`]
    pub fn arm_dismiss(&self) -> bool {
        self.state
            .upgrade()
            .map(|state| ZoomCoordinator { state })
            .is_some_and(|c| c.arm_dismiss(self.token))
    }
}

impl Drop for ZoomHandle {
    fn drop(&mut self) {
        self.hide();
    }
}
