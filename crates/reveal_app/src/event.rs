//! Host events and event scripts
//!
//! A script is a TOML file with an optional viewport and a list of events:
//!
//! ```toml
//! [viewport]
//! width = 1280.0
//! height = 800.0
//!
//! [[events]]
//! type = "layout"
//! element = "about"
//! x = 0.0
//! y = 900.0
//! width = 1280.0
//! height = 1200.0
//!
//! [[events]]
//! type = "scroll"
//! offset = 400.0
//!
//! [[events]]
//! type = "filter"
//! key = "mobile"
//! ```

use std::fs;
use std::path::Path;

use reveal_core::{Bounds, ElementId};
use reveal_motion::FilterKey;
use serde::{Deserialize, Serialize};

use crate::error::{PageError, Result};

/// A signal delivered by the host
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageEvent {
    /// Absolute vertical scroll offset
    Scroll { offset: f32 },
    /// Viewport size changed
    Resize { width: f32, height: f32 },
    /// Element laid out at document coordinates
    Layout {
        element: ElementId,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    /// Raw intersection ratio for an element
    Intersection { element: ElementId, ratio: f32 },
    /// Monotonic clock advance
    Advance { ms: u64 },
    /// Project filter button clicked
    Filter { key: FilterKey },
    /// Menu button clicked
    ToggleMenu,
    /// Navigation link clicked
    Navigate { href: String },
}

impl PageEvent {
    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            PageEvent::Scroll { .. } => "scroll",
            PageEvent::Resize { .. } => "resize",
            PageEvent::Layout { .. } => "layout",
            PageEvent::Intersection { .. } => "intersection",
            PageEvent::Advance { .. } => "advance",
            PageEvent::Filter { .. } => "filter",
            PageEvent::ToggleMenu => "toggle_menu",
            PageEvent::Navigate { .. } => "navigate",
        }
    }

    pub fn layout(element: impl Into<ElementId>, bounds: Bounds) -> Self {
        PageEvent::Layout {
            element: element.into(),
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
        }
    }
}

/// Initial viewport size of a script
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

/// A recorded sequence of host events
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventScript {
    #[serde(default)]
    pub viewport: ViewportSize,
    #[serde(default)]
    pub events: Vec<PageEvent>,
}

impl EventScript {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| PageError::ScriptIo {
            path: path.to_path_buf(),
            source,
        })?;
        let script = Self::from_toml_str(&source)?;
        tracing::debug!(
            "Loaded script {} ({} events)",
            path.display(),
            script.events.len()
        );
        Ok(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let script = EventScript::from_toml_str(
            r#"
            [viewport]
            height = 600.0

            [[events]]
            type = "scroll"
            offset = 120.0

            [[events]]
            type = "toggle_menu"

            [[events]]
            type = "filter"
            key = "all"

            [[events]]
            type = "advance"
            ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(script.viewport.width, 1280.0);
        assert_eq!(script.viewport.height, 600.0);
        assert_eq!(
            script.events,
            vec![
                PageEvent::Scroll { offset: 120.0 },
                PageEvent::ToggleMenu,
                PageEvent::Filter { key: FilterKey::All },
                PageEvent::Advance { ms: 250 },
            ]
        );
    }

    #[test]
    fn test_unknown_event_rejected() {
        let result = EventScript::from_toml_str(
            r#"
            [[events]]
            type = "teleport"
            "#,
        );
        assert!(matches!(result, Err(PageError::ScriptParse(_))));
    }

    #[test]
    fn test_event_json_shape() {
        let event = PageEvent::Intersection {
            element: ElementId::from("contact-heading"),
            ratio: 0.5,
        };
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"type":"intersection","element":"contact-heading","ratio":0.5}"#
        );
        assert_eq!(event.kind(), "intersection");
    }
}
