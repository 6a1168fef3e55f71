//! Core types for storefront chrome
//!
//! This module defines the data that flows between the host environment, the
//! two controllers, and the view binding: scroll samples and overlay snapshots
//! in, derived header and hero visual state out.

use serde::{Deserialize, Serialize};

/// A single scroll position sample (pixels from the top of the viewport).
///
/// Raw host positions may be negative (rubber-band overscroll); they are
/// clamped to zero on construction and never rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollSample {
    pub position: u64,
}

impl ScrollSample {
    /// Build a sample from a raw host value, clamping negatives to 0
    pub fn clamped(raw: i64) -> Self {
        Self {
            position: raw.max(0) as u64,
        }
    }
}

/// Which modal drawer (if any) is currently open.
///
/// Owned by the aside/drawer manager; controllers only ask whether it is closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayState {
    #[default]
    Closed,
    #[serde(rename = "mobile", alias = "mobile_menu", alias = "mobile-menu")]
    MobileMenu,
    Search,
    Cart,
}

impl OverlayState {
    pub fn is_closed(&self) -> bool {
        matches!(self, OverlayState::Closed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OverlayState::Closed => "closed",
            OverlayState::MobileMenu => "mobile",
            OverlayState::Search => "search",
            OverlayState::Cart => "cart",
        }
    }
}

/// Derived header visibility flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityState {
    /// Header has shrunk to its compact form
    pub collapsed: bool,
    /// Last movement was towards the top of the page
    pub scrolling_up: bool,
    /// Header is translated fully out of view
    pub hidden: bool,
}

/// Header layout values consumed by the view binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderVisualState {
    /// Main header block height (expanded or collapsed)
    pub expanded_height_px: u32,
    /// Announcement bar height (0 when collapsed)
    pub announcement_height_px: u32,
    /// Whether the header block is translated out of view
    pub translated_out: bool,
}

/// Which medium the hero section shows. Moves from `Image` to `Video` once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeroPhase {
    #[default]
    Image,
    Video,
}

impl HeroPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeroPhase::Image => "image",
            HeroPhase::Video => "video",
        }
    }
}

/// Parallax translation derived from the current scroll position
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ParallaxOffset {
    /// Offset applied to the video at full ratio
    pub primary_offset_px: f64,
    /// Half-strength offset applied to the static image
    pub secondary_offset_px: f64,
}

impl ParallaxOffset {
    /// The offset the visible medium should be translated by
    pub fn for_phase(&self, phase: HeroPhase) -> f64 {
        match phase {
            HeroPhase::Image => self.secondary_offset_px,
            HeroPhase::Video => self.primary_offset_px,
        }
    }
}

/// Hero values consumed by the view binding
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeroVisualState {
    pub phase: HeroPhase,
    pub offset_px: f64,
}

/// One step of derived output, emitted after every delivered host event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Position of the event in delivery order
    pub seq: u64,
    /// Host clock at delivery (ms since mount)
    pub at_ms: u64,
    pub overlay: OverlayState,
    pub visibility: VisibilityState,
    pub header: HeaderVisualState,
    pub hero: HeroVisualState,
    pub parallax: ParallaxOffset,
    /// True on the single frame where the play command was issued
    pub play_issued: bool,
}

/// Producer metadata attached to replay reports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Producer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_sample_clamps_negative() {
        assert_eq!(ScrollSample::clamped(-35).position, 0);
        assert_eq!(ScrollSample::clamped(0).position, 0);
        assert_eq!(ScrollSample::clamped(120).position, 120);
    }

    #[test]
    fn test_overlay_serde_names() {
        let state: OverlayState = serde_json::from_str("\"mobile-menu\"").unwrap();
        assert_eq!(state, OverlayState::MobileMenu);
        let state: OverlayState = serde_json::from_str("\"mobile\"").unwrap();
        assert_eq!(state, OverlayState::MobileMenu);
        assert_eq!(serde_json::to_string(&OverlayState::Cart).unwrap(), "\"cart\"");
        assert!(OverlayState::default().is_closed());
        assert!(!OverlayState::Search.is_closed());
    }

    #[test]
    fn test_parallax_for_phase() {
        let offset = ParallaxOffset {
            primary_offset_px: 30.0,
            secondary_offset_px: 15.0,
        };
        assert_eq!(offset.for_phase(HeroPhase::Video), 30.0);
        assert_eq!(offset.for_phase(HeroPhase::Image), 15.0);
    }
}
