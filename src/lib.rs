//! Storefront Chrome - scroll-driven state for a storefront's header and hero
//!
//! Two independent controllers observe the window scroll position and emit
//! derived visual state for whatever view layer renders the markup:
//!
//! - **Header**: collapses past a threshold, hides while scrolling down, and
//!   freezes while a drawer overlay is open.
//! - **Hero**: swaps a static image for an autoplaying video after a fixed
//!   delay and computes a parallax offset from the scroll position.
//!
//! Callback sources (scroll listeners, one-shot timers) are scoped host
//! registrations that are released when their owner unmounts or drops.

pub mod config;
pub mod error;
pub mod header;
pub mod hero;
pub mod host;
pub mod menu;
pub mod session;
pub mod timer;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use config::ChromeConfig;
pub use error::{ChromeError, PlaybackError};
pub use header::ScrollVisibilityController;
pub use hero::{HeroTransitionController, MediaElement};
pub use host::Host;
pub use menu::{nav_links, resolve_menu, Menu};
pub use session::{replay_trace, ChromeSession, ReplayEvent};

/// Crate version embedded in replay reports
pub const CHROME_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for replay reports
pub const PRODUCER_NAME: &str = "storefront-chrome";
