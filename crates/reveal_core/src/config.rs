//! Motion configuration
//!
//! Defaults for every orchestration primitive, loadable from TOML:
//!
//! ```toml
//! [visibility]
//! threshold = 0.2
//! trigger_once = true
//!
//! [stagger]
//! base_delay_ms = 300
//! increment_ms = 100
//!
//! [typewriter]
//! interval_ms = 80
//!
//! [nav]
//! scroll_threshold = 10.0
//!
//! [filter]
//! presence = "wait"
//! ```
//!
//! Every table and field is optional; missing values fall back to
//! [`MotionConfig::standard()`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Defaults for visibility tracking
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityDefaults {
    /// Fraction of the element that must be visible to count as intersecting
    pub threshold: f32,
    /// Latch the visible state after the first reveal
    pub trigger_once: bool,
}

impl Default for VisibilityDefaults {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            trigger_once: false,
        }
    }
}

/// Defaults for sibling stagger
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaggerDefaults {
    /// Delay before the first element of the hero entry (ms)
    pub base_delay_ms: u32,
    /// Additional delay per index (ms)
    pub increment_ms: u32,
}

impl Default for StaggerDefaults {
    fn default() -> Self {
        Self {
            base_delay_ms: 300,
            increment_ms: 100,
        }
    }
}

/// Defaults for the character reveal effect
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypewriterDefaults {
    /// Time between revealed characters (ms)
    pub interval_ms: u32,
}

impl Default for TypewriterDefaults {
    fn default() -> Self {
        Self { interval_ms: 100 }
    }
}

/// Defaults for the navigation chrome
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavDefaults {
    /// Scroll offset above which the page counts as scrolled
    pub scroll_threshold: f32,
    /// Per-link delay for the mobile menu entries (ms)
    pub link_stagger_ms: u32,
}

impl Default for NavDefaults {
    fn default() -> Self {
        Self {
            scroll_threshold: 10.0,
            link_stagger_ms: 100,
        }
    }
}

/// How enter and exit transitions of a filtered list overlap
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenceMode {
    /// Entering and exiting items animate at the same time
    Sync,
    /// Entering items wait until every exiting item has finished
    #[default]
    Wait,
}

/// Defaults for filterable collections
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterDefaults {
    pub presence: PresenceMode,
    /// Per-index delay for entering items (ms)
    pub enter_stagger_ms: u32,
}

impl Default for FilterDefaults {
    fn default() -> Self {
        Self {
            presence: PresenceMode::Wait,
            enter_stagger_ms: 100,
        }
    }
}

/// Motion defaults for a page
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub visibility: VisibilityDefaults,
    pub stagger: StaggerDefaults,
    pub typewriter: TypewriterDefaults,
    pub nav: NavDefaults,
    pub filter: FilterDefaults,
}

impl MotionConfig {
    /// Standard configuration matching the stock page timings.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Faster timings for demos and tests.
    pub fn snappy() -> Self {
        Self {
            stagger: StaggerDefaults {
                base_delay_ms: 150,
                increment_ms: 50,
            },
            typewriter: TypewriterDefaults { interval_ms: 30 },
            filter: FilterDefaults {
                presence: PresenceMode::Sync,
                enter_stagger_ms: 50,
            },
            ..Self::default()
        }
    }

    /// Set the default visibility threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.visibility.threshold = threshold;
        self
    }

    /// Enable or disable the visibility latch.
    pub fn with_trigger_once(mut self, trigger_once: bool) -> Self {
        self.visibility.trigger_once = trigger_once;
        self
    }

    /// Set the typewriter interval.
    pub fn with_typewriter_interval(mut self, interval_ms: u32) -> Self {
        self.typewriter.interval_ms = interval_ms;
        self
    }

    /// Set the filter presence mode.
    pub fn with_presence(mut self, presence: PresenceMode) -> Self {
        self.filter.presence = presence;
        self
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: MotionConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!("Loaded motion config from {}", path.display());
        Ok(config)
    }

    /// Reject values that cannot be clamped into something usable.
    ///
    /// Out-of-range thresholds are accepted here; trackers clamp them at
    /// observe time.
    pub fn validate(&self) -> Result<()> {
        if !self.visibility.threshold.is_finite() {
            return Err(Error::InvalidConfig(
                "visibility.threshold must be a finite number".to_string(),
            ));
        }
        if self.typewriter.interval_ms == 0 {
            return Err(Error::InvalidConfig(
                "typewriter.interval_ms must be greater than zero".to_string(),
            ));
        }
        if !self.nav.scroll_threshold.is_finite() {
            return Err(Error::InvalidConfig(
                "nav.scroll_threshold must be a finite number".to_string(),
            ));
        }
        Ok(())
    }

    /// Serialize back to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::InvalidConfig(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = MotionConfig::from_toml_str("").unwrap();
        assert_eq!(config, MotionConfig::standard());
        assert_eq!(config.nav.scroll_threshold, 10.0);
        assert_eq!(config.typewriter.interval_ms, 100);
        assert_eq!(config.stagger.base_delay_ms, 300);
    }

    #[test]
    fn test_partial_tables() {
        let config = MotionConfig::from_toml_str(
            r#"
            [visibility]
            threshold = 0.2

            [filter]
            presence = "sync"
            "#,
        )
        .unwrap();

        assert_eq!(config.visibility.threshold, 0.2);
        assert!(!config.visibility.trigger_once);
        assert_eq!(config.filter.presence, PresenceMode::Sync);
        assert_eq!(config.filter.enter_stagger_ms, 100);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = MotionConfig::from_toml_str("[typewriter]\ninterval_ms = 0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_bad_toml_rejected() {
        let err = MotionConfig::from_toml_str("[visibility\nthreshold = ").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = MotionConfig::load("/definitely/not/here/reveal.toml").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_toml_roundtrip_of_preset() {
        let snappy = MotionConfig::snappy();
        let text = snappy.to_toml().unwrap();
        assert_eq!(MotionConfig::from_toml_str(&text).unwrap(), snappy);
    }
}
