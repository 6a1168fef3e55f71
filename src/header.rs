//! Header scroll visibility
//!
//! Converts the stream of scroll positions into the header's collapsed and
//! hidden flags. While a drawer overlay is open the flags are frozen so the
//! header does not flicker behind the drawer.

use crate::config::HeaderConfig;
use crate::host::{Host, Registration};
use crate::types::{HeaderVisualState, OverlayState, ScrollSample, VisibilityState};

/// Scroll-driven show/shrink/hide state for the persistent site header
#[derive(Debug)]
pub struct ScrollVisibilityController {
    config: HeaderConfig,
    /// Last sample accepted while unfrozen. Frozen samples do not move it.
    last_position: Option<u64>,
    overlay: OverlayState,
    state: VisibilityState,
    listener: Option<Registration>,
}

impl ScrollVisibilityController {
    /// Create the controller and register its scroll listener on `host`
    pub fn mount(host: &Host, config: HeaderConfig) -> Self {
        Self {
            config,
            last_position: None,
            overlay: OverlayState::Closed,
            state: VisibilityState::default(),
            listener: Some(host.listen_scroll()),
        }
    }

    /// Release the scroll listener. Later samples are ignored.
    pub fn unmount(&mut self) {
        self.listener = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.listener.is_some()
    }

    pub fn state(&self) -> VisibilityState {
        self.state
    }

    pub fn overlay(&self) -> OverlayState {
        self.overlay
    }

    pub fn last_position(&self) -> Option<u64> {
        self.last_position
    }

    /// Apply one scroll sample under the given overlay snapshot
    pub fn on_scroll(&mut self, raw_position: i64, overlay: OverlayState) -> VisibilityState {
        if !self.is_mounted() {
            tracing::trace!(raw_position, "scroll sample after unmount ignored");
            return self.state;
        }

        self.overlay = overlay;
        if !overlay.is_closed() {
            tracing::trace!(raw_position, overlay = overlay.as_str(), "header frozen");
            self.state.hidden = self.derive_hidden(self.state.collapsed, self.state.scrolling_up);
            return self.state;
        }

        let position = ScrollSample::clamped(raw_position).position;
        let scrolling_up = match self.last_position {
            // No movement keeps the last direction so repeated samples are
            // idempotent; `position < prev` here would flip a header that is
            // scrolling up back to hidden
            Some(prev) if prev == position => self.state.scrolling_up,
            Some(prev) => position < prev,
            None => false,
        };
        let collapsed = position > self.config.collapse_threshold_px;

        if collapsed != self.state.collapsed {
            tracing::debug!(position, collapsed, "header collapse changed");
        }

        self.last_position = Some(position);
        self.state = VisibilityState {
            collapsed,
            scrolling_up,
            hidden: self.derive_hidden(collapsed, scrolling_up),
        };
        self.state
    }

    /// Take a new overlay snapshot without a scroll sample.
    ///
    /// Only `hidden` can change: an open overlay always keeps the header in view.
    pub fn on_overlay_change(&mut self, overlay: OverlayState) -> VisibilityState {
        if !self.is_mounted() {
            tracing::trace!(overlay = overlay.as_str(), "overlay change after unmount ignored");
            return self.state;
        }

        self.overlay = overlay;
        self.state.hidden = self.derive_hidden(self.state.collapsed, self.state.scrolling_up);
        self.state
    }

    /// Layout values for the view binding
    pub fn visual_state(&self) -> HeaderVisualState {
        let collapsed = self.state.collapsed;
        HeaderVisualState {
            expanded_height_px: if collapsed {
                self.config.collapsed_height_px
            } else {
                self.config.expanded_height_px
            },
            announcement_height_px: if collapsed {
                0
            } else {
                self.config.announcement_height_px
            },
            translated_out: self.state.hidden,
        }
    }

    fn derive_hidden(&self, collapsed: bool, scrolling_up: bool) -> bool {
        collapsed && !scrolling_up && self.overlay.is_closed()
    }
}
