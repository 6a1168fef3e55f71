//! Session orchestration
//!
//! A [`ChromeSession`] plays the role of the host page: it mounts both
//! controllers, delivers host events to them in arrival order, fires the hero
//! timer as the clock advances, and emits one [`Frame`] per event for the view
//! binding. Traces of events can be replayed from JSON or NDJSON.

use crate::config::ChromeConfig;
use crate::error::{ChromeError, PlaybackError};
use crate::header::ScrollVisibilityController;
use crate::hero::{HeroTransitionController, MediaElement};
use crate::host::Host;
use crate::types::{Frame, OverlayState, Producer};
use crate::{CHROME_VERSION, PRODUCER_NAME};
use serde::{Deserialize, Serialize};

/// A host event, stamped with the host clock (ms since mount)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayEvent {
    /// Window scroll position changed (may be negative during overscroll)
    Scroll { at_ms: u64, position: i64 },
    /// The drawer manager opened or closed an overlay
    Overlay { at_ms: u64, state: OverlayState },
    /// Time passed with no input
    Tick { at_ms: u64 },
    /// The page tore the chrome down
    Unmount { at_ms: u64 },
}

impl ReplayEvent {
    pub fn at_ms(&self) -> u64 {
        match self {
            ReplayEvent::Scroll { at_ms, .. }
            | ReplayEvent::Overlay { at_ms, .. }
            | ReplayEvent::Tick { at_ms }
            | ReplayEvent::Unmount { at_ms } => *at_ms,
        }
    }
}

/// How the scripted video element answers a play command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoplayPolicy {
    #[default]
    Allowed,
    /// Platform refuses autoplay
    Rejected,
    /// No video element is attached
    Missing,
}

/// Media element whose playback outcome is fixed up front
#[derive(Debug, Clone, Default)]
pub struct ScriptedMedia {
    policy: AutoplayPolicy,
    attempts: u32,
}

impl ScriptedMedia {
    pub fn new(policy: AutoplayPolicy) -> Self {
        Self {
            policy,
            attempts: 0,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

impl MediaElement for ScriptedMedia {
    fn play(&mut self) -> Result<(), PlaybackError> {
        self.attempts += 1;
        match self.policy {
            AutoplayPolicy::Allowed => Ok(()),
            AutoplayPolicy::Rejected => Err(PlaybackError::AutoplayRejected(
                "play() request was denied by the user agent".to_string(),
            )),
            AutoplayPolicy::Missing => Err(PlaybackError::NotMounted),
        }
    }
}

/// A replayable trace document
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Trace {
    #[serde(default)]
    pub config: ChromeConfig,
    #[serde(default)]
    pub autoplay: AutoplayPolicy,
    pub events: Vec<ReplayEvent>,
}

/// Outcome of the hero's play command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSummary {
    pub commands_issued: u32,
    pub failure: Option<String>,
}

/// Replay output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayReport {
    pub producer: Producer,
    pub generated_at_utc: String,
    pub frames: Vec<Frame>,
    pub playback: PlaybackSummary,
}

/// Both chrome controllers mounted on one host, driven by host events
pub struct ChromeSession {
    host: Host,
    header: ScrollVisibilityController,
    hero: HeroTransitionController,
    media: Box<dyn MediaElement>,
    overlay: OverlayState,
    clock_ms: u64,
    seq: u64,
}

impl Default for ChromeSession {
    fn default() -> Self {
        Self::new(ChromeConfig::default())
    }
}

impl ChromeSession {
    /// Mount a session whose video always accepts playback
    pub fn new(config: ChromeConfig) -> Self {
        Self::with_media(config, Box::new(ScriptedMedia::new(AutoplayPolicy::Allowed)))
    }

    /// Mount a session at t = 0 with a caller-supplied video element
    pub fn with_media(config: ChromeConfig, media: Box<dyn MediaElement>) -> Self {
        let host = Host::new();
        let header = ScrollVisibilityController::mount(&host, config.header);
        let hero = HeroTransitionController::mount(&host, 0, config.hero);
        tracing::info!("chrome session mounted");

        Self {
            host,
            header,
            hero,
            media,
            overlay: OverlayState::Closed,
            clock_ms: 0,
            seq: 0,
        }
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn header(&self) -> &ScrollVisibilityController {
        &self.header
    }

    pub fn hero(&self) -> &HeroTransitionController {
        &self.hero
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    /// Deliver one host event and return the resulting frame
    pub fn process(&mut self, event: &ReplayEvent) -> Result<Frame, ChromeError> {
        let at_ms = event.at_ms();
        if at_ms < self.clock_ms {
            return Err(ChromeError::InvalidTrace(format!(
                "event {} at {}ms is earlier than session clock {}ms",
                self.seq, at_ms, self.clock_ms
            )));
        }
        self.clock_ms = at_ms;

        // Timer callbacks due by now run before the event itself
        let play_issued = self.hero.advance(at_ms, self.media.as_mut());

        match event {
            ReplayEvent::Scroll { position, .. } => {
                self.header.on_scroll(*position, self.overlay);
                self.hero.on_scroll(*position);
            }
            ReplayEvent::Overlay { state, .. } => {
                self.overlay = *state;
                self.header.on_overlay_change(*state);
            }
            ReplayEvent::Tick { .. } => {}
            ReplayEvent::Unmount { .. } => self.unmount(),
        }

        let frame = Frame {
            seq: self.seq,
            at_ms,
            overlay: self.overlay,
            visibility: self.header.state(),
            header: self.header.visual_state(),
            hero: self.hero.visual_state(),
            parallax: self.hero.parallax(),
            play_issued,
        };
        self.seq += 1;
        Ok(frame)
    }

    /// Deliver events in order, stopping at the first invalid one
    pub fn process_all(&mut self, events: &[ReplayEvent]) -> Result<Vec<Frame>, ChromeError> {
        events.iter().map(|event| self.process(event)).collect()
    }

    /// Release every listener and pending timer
    pub fn unmount(&mut self) {
        self.header.unmount();
        self.hero.unmount();
        tracing::info!(clock_ms = self.clock_ms, "chrome session unmounted");
    }

    pub fn playback_summary(&self) -> PlaybackSummary {
        PlaybackSummary {
            commands_issued: self.hero.play_commands(),
            failure: self.hero.last_playback_error().map(|e| e.to_string()),
        }
    }
}

/// Parse a trace document and validate its configuration
pub fn parse_trace(json: &str) -> Result<Trace, ChromeError> {
    let trace: Trace = serde_json::from_str(json)?;
    trace.config.validate()?;
    Ok(trace)
}

/// Parse NDJSON (one event per line)
pub fn parse_ndjson(ndjson: &str) -> Result<Vec<ReplayEvent>, ChromeError> {
    let mut events = Vec::new();
    for (line_num, line) in ndjson.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<ReplayEvent>(trimmed) {
            Ok(event) => events.push(event),
            Err(e) => {
                return Err(ChromeError::ParseError(format!(
                    "Failed to parse line {}: {}",
                    line_num + 1,
                    e
                )));
            }
        }
    }
    Ok(events)
}

/// Run a parsed trace through a fresh session
pub fn replay(trace: &Trace) -> Result<ReplayReport, ChromeError> {
    let media = ScriptedMedia::new(trace.autoplay);
    let mut session = ChromeSession::with_media(trace.config.clone(), Box::new(media));
    let frames = session.process_all(&trace.events)?;

    Ok(ReplayReport {
        producer: Producer {
            name: PRODUCER_NAME.to_string(),
            version: CHROME_VERSION.to_string(),
            instance_id: uuid::Uuid::new_v4().to_string(),
        },
        generated_at_utc: chrono::Utc::now().to_rfc3339(),
        frames,
        playback: session.playback_summary(),
    })
}

/// Replay a JSON trace document and return the report as JSON (stateless, one-shot).
///
/// # Example
/// ```ignore
/// let report = replay_trace(r#"{"events": [{"type": "scroll", "at_ms": 0, "position": 80}]}"#)?;
/// ```
pub fn replay_trace(json: &str) -> Result<String, ChromeError> {
    let trace = parse_trace(json)?;
    let report = replay(&trace)?;
    Ok(serde_json::to_string(&report)?)
}
