//! Hero media transition and parallax
//!
//! The hero starts on a static image and swaps to an autoplaying, looped,
//! muted video once a one-shot timer expires. Every scroll sample recomputes
//! the parallax offset applied to whichever medium is showing.

use crate::config::HeroConfig;
use crate::error::PlaybackError;
use crate::host::{Host, Registration};
use crate::timer::OneShotTimer;
use crate::types::{HeroPhase, HeroVisualState, ParallaxOffset, ScrollSample};

/// Playback collaborator for the hero video element
pub trait MediaElement {
    /// Begin playback. Platforms may refuse (e.g. autoplay policy).
    fn play(&mut self) -> Result<(), PlaybackError>;
}

/// Parallax offsets for a scroll position
pub fn parallax_offset(position: u64, config: &HeroConfig) -> ParallaxOffset {
    let primary = position as f64 * config.parallax_ratio;
    ParallaxOffset {
        primary_offset_px: primary,
        secondary_offset_px: primary / config.secondary_divisor,
    }
}

/// One-way image to video handoff plus scroll parallax for the hero section
#[derive(Debug)]
pub struct HeroTransitionController {
    config: HeroConfig,
    phase: HeroPhase,
    timer: OneShotTimer,
    listener: Option<Registration>,
    parallax: ParallaxOffset,
    play_commands: u32,
    last_playback_error: Option<PlaybackError>,
}

impl HeroTransitionController {
    /// Create the controller at `now_ms`, scheduling the video handoff and
    /// registering the parallax scroll listener
    pub fn mount(host: &Host, now_ms: u64, config: HeroConfig) -> Self {
        let timer = OneShotTimer::start(host, now_ms, config.video_delay_ms);
        tracing::debug!(deadline_ms = timer.deadline_ms(), "hero video handoff scheduled");

        Self {
            config,
            phase: HeroPhase::Image,
            timer,
            listener: Some(host.listen_scroll()),
            parallax: ParallaxOffset::default(),
            play_commands: 0,
            last_playback_error: None,
        }
    }

    /// Cancel the pending handoff and release the scroll listener
    pub fn unmount(&mut self) {
        if self.timer.is_pending() {
            tracing::debug!("hero unmounted before video handoff");
        }
        self.timer.cancel();
        self.listener = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.listener.is_some()
    }

    pub fn phase(&self) -> HeroPhase {
        self.phase
    }

    pub fn parallax(&self) -> ParallaxOffset {
        self.parallax
    }

    /// Number of play commands issued (0 or 1)
    pub fn play_commands(&self) -> u32 {
        self.play_commands
    }

    pub fn last_playback_error(&self) -> Option<&PlaybackError> {
        self.last_playback_error.as_ref()
    }

    pub fn visual_state(&self) -> HeroVisualState {
        HeroVisualState {
            phase: self.phase,
            offset_px: self.parallax.for_phase(self.phase),
        }
    }

    /// Recompute the parallax offset for a scroll sample
    pub fn on_scroll(&mut self, raw_position: i64) -> ParallaxOffset {
        if !self.is_mounted() {
            tracing::trace!(raw_position, "hero scroll sample after unmount ignored");
            return self.parallax;
        }
        let position = ScrollSample::clamped(raw_position).position;
        self.parallax = parallax_offset(position, &self.config);
        self.parallax
    }

    /// Let host time reach `now_ms`.
    ///
    /// Returns true when the handoff happened during this call, in which case
    /// `media` has been asked to play. A refused play is logged and kept in
    /// [`last_playback_error`](Self::last_playback_error); the phase stays `Video`.
    pub fn advance(&mut self, now_ms: u64, media: &mut dyn MediaElement) -> bool {
        if !self.timer.poll(now_ms) {
            return false;
        }

        self.phase = HeroPhase::Video;
        self.play_commands += 1;
        tracing::debug!(now_ms, "hero switched to video");

        if let Err(error) = media.play() {
            tracing::warn!(%error, "video playback failed");
            self.last_playback_error = Some(error);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingMedia {
        plays: u32,
        reject: bool,
    }

    impl MediaElement for RecordingMedia {
        fn play(&mut self) -> Result<(), PlaybackError> {
            self.plays += 1;
            if self.reject {
                Err(PlaybackError::AutoplayRejected("NotAllowedError".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn mount(host: &Host) -> HeroTransitionController {
        HeroTransitionController::mount(host, 0, HeroConfig::default())
    }

    #[test]
    fn test_switches_to_video_after_delay() {
        let host = Host::new();
        let mut hero = mount(&host);
        let mut media = RecordingMedia::default();

        assert!(!hero.advance(999, &mut media));
        assert_eq!(hero.phase(), HeroPhase::Image);
        assert_eq!(media.plays, 0);

        assert!(hero.advance(1000, &mut media));
        assert_eq!(hero.phase(), HeroPhase::Video);
        assert_eq!(media.plays, 1);
        assert_eq!(host.pending_timer_count(), 0);
    }

    #[test]
    fn test_transition_happens_once() {
        let host = Host::new();
        let mut hero = mount(&host);
        let mut media = RecordingMedia::default();

        assert!(hero.advance(1500, &mut media));
        assert!(!hero.advance(2000, &mut media));
        assert!(!hero.advance(10_000, &mut media));
        assert_eq!(hero.phase(), HeroPhase::Video);
        assert_eq!(hero.play_commands(), 1);
        assert_eq!(media.plays, 1);
    }

    #[test]
    fn test_unmount_before_delay_prevents_transition() {
        let host = Host::new();
        let mut hero = mount(&host);
        let mut media = RecordingMedia::default();

        assert!(!hero.advance(500, &mut media));
        hero.unmount();
        assert_eq!(host.pending_timer_count(), 0);
        assert_eq!(host.scroll_listener_count(), 0);

        assert!(!hero.advance(1000, &mut media));
        assert!(!hero.advance(5000, &mut media));
        assert_eq!(hero.phase(), HeroPhase::Image);
        assert_eq!(media.plays, 0);
        assert_eq!(hero.play_commands(), 0);
    }

    #[test]
    fn test_drop_releases_timer_and_listener() {
        let host = Host::new();
        drop(mount(&host));
        assert_eq!(host.pending_timer_count(), 0);
        assert_eq!(host.scroll_listener_count(), 0);
    }

    #[test]
    fn test_playback_failure_is_kept_not_reverted() {
        let host = Host::new();
        let mut hero = mount(&host);
        let mut media = RecordingMedia {
            reject: true,
            ..Default::default()
        };

        assert!(hero.advance(1000, &mut media));
        assert_eq!(hero.phase(), HeroPhase::Video);
        assert!(matches!(
            hero.last_playback_error(),
            Some(PlaybackError::AutoplayRejected(_))
        ));

        // no automatic retry
        assert!(!hero.advance(3000, &mut media));
        assert_eq!(media.plays, 1);
    }

    #[test]
    fn test_parallax_offsets() {
        let host = Host::new();
        let mut hero = mount(&host);

        let offset = hero.on_scroll(100);
        assert!((offset.primary_offset_px - 30.0).abs() < 1e-9);
        assert!((offset.secondary_offset_px - 15.0).abs() < 1e-9);

        let again = hero.on_scroll(100);
        assert_eq!(offset, again);

        let clamped = hero.on_scroll(-20);
        assert_eq!(clamped, ParallaxOffset::default());
    }

    #[test]
    fn test_parallax_is_pure_function_of_position() {
        let config = HeroConfig::default();
        for position in [0u64, 1, 7, 50, 333, 10_000] {
            let offset = parallax_offset(position, &config);
            assert!((offset.primary_offset_px - 0.3 * position as f64).abs() < 1e-9);
            assert!((offset.secondary_offset_px - offset.primary_offset_px / 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_visual_state_follows_phase() {
        let host = Host::new();
        let mut hero = mount(&host);
        let mut media = RecordingMedia::default();

        hero.on_scroll(200);
        let image = hero.visual_state();
        assert_eq!(image.phase, HeroPhase::Image);
        assert!((image.offset_px - 30.0).abs() < 1e-9);

        hero.advance(1000, &mut media);
        let video = hero.visual_state();
        assert_eq!(video.phase, HeroPhase::Video);
        assert!((video.offset_px - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_mount_time_offsets_deadline() {
        let host = Host::new();
        let mut hero = HeroTransitionController::mount(&host, 250, HeroConfig::default());
        let mut media = RecordingMedia::default();
        assert!(!hero.advance(1000, &mut media));
        assert!(hero.advance(1250, &mut media));
    }
}
