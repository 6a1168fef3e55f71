//! Controller configuration
//!
//! Every field has a default matching the storefront's shipped behavior, so a
//! partial JSON document only overrides what it names.

use crate::error::ChromeError;
use serde::{Deserialize, Serialize};

/// Default scroll distance (px) past which the header collapses
pub const DEFAULT_COLLAPSE_THRESHOLD_PX: u64 = 50;

/// Default delay before the hero swaps its image for the video
pub const DEFAULT_VIDEO_DELAY_MS: u64 = 1000;

/// Default parallax speed relative to scroll distance
pub const DEFAULT_PARALLAX_RATIO: f64 = 0.3;

/// Top-level configuration for both controllers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromeConfig {
    pub header: HeaderConfig,
    pub hero: HeroConfig,
}

/// Header collapse threshold and layout sizes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    /// Positions strictly greater than this collapse the header
    pub collapse_threshold_px: u64,
    pub expanded_height_px: u32,
    pub collapsed_height_px: u32,
    /// Announcement bar height while expanded (0 when collapsed)
    pub announcement_height_px: u32,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            collapse_threshold_px: DEFAULT_COLLAPSE_THRESHOLD_PX,
            expanded_height_px: 80,
            collapsed_height_px: 64,
            announcement_height_px: 40,
        }
    }
}

/// Hero transition delay and parallax factors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    pub video_delay_ms: u64,
    pub parallax_ratio: f64,
    /// Divides the primary offset to get the image offset
    pub secondary_divisor: f64,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            video_delay_ms: DEFAULT_VIDEO_DELAY_MS,
            parallax_ratio: DEFAULT_PARALLAX_RATIO,
            secondary_divisor: 2.0,
        }
    }
}

impl ChromeConfig {
    /// Parse and validate a configuration document
    pub fn from_json(json: &str) -> Result<Self, ChromeError> {
        let config: ChromeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ChromeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ChromeError> {
        let header = &self.header;
        if header.collapsed_height_px > header.expanded_height_px {
            return Err(ChromeError::InvalidConfig(format!(
                "collapsed_height_px ({}) exceeds expanded_height_px ({})",
                header.collapsed_height_px, header.expanded_height_px
            )));
        }

        let hero = &self.hero;
        if !hero.parallax_ratio.is_finite() || hero.parallax_ratio < 0.0 {
            return Err(ChromeError::InvalidConfig(format!(
                "parallax_ratio must be a finite non-negative number, got {}",
                hero.parallax_ratio
            )));
        }
        if !hero.secondary_divisor.is_finite() || hero.secondary_divisor <= 0.0 {
            return Err(ChromeError::InvalidConfig(format!(
                "secondary_divisor must be positive, got {}",
                hero.secondary_divisor
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = ChromeConfig::default();
        assert_eq!(config.header.collapse_threshold_px, 50);
        assert_eq!(config.header.expanded_height_px, 80);
        assert_eq!(config.header.collapsed_height_px, 64);
        assert_eq!(config.header.announcement_height_px, 40);
        assert_eq!(config.hero.video_delay_ms, 1000);
        assert_eq!(config.hero.parallax_ratio, 0.3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_override() {
        let config = ChromeConfig::from_json(r#"{"hero": {"video_delay_ms": 250}}"#).unwrap();
        assert_eq!(config.hero.video_delay_ms, 250);
        assert_eq!(config.hero.parallax_ratio, 0.3);
        assert_eq!(config.header, HeaderConfig::default());
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = ChromeConfig::from_json("{}").unwrap();
        assert_eq!(config, ChromeConfig::default());
    }

    #[test]
    fn test_rejects_inverted_heights() {
        let result = ChromeConfig::from_json(
            r#"{"header": {"expanded_height_px": 60, "collapsed_height_px": 64}}"#,
        );
        assert!(matches!(result, Err(ChromeError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_bad_parallax() {
        let mut config = ChromeConfig::default();
        config.hero.parallax_ratio = -0.1;
        assert!(config.validate().is_err());

        let mut config = ChromeConfig::default();
        config.hero.secondary_divisor = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_round_trip_json() {
        let config = ChromeConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(ChromeConfig::from_json(&json).unwrap(), config);
    }
}
