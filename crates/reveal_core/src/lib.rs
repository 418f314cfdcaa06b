//! Reveal Core
//!
//! Foundational types shared by the Reveal orchestration crates:
//!
//! - **Geometry**: element bounds, the scrolled viewport, and intersection ratios
//! - **Element ids**: string handles the host uses to address elements
//! - **Configuration**: TOML-backed motion defaults with named presets
//! - **Errors**: configuration misuse surfaced as typed errors
//!
//! # Example
//!
//! ```rust
//! use reveal_core::{Bounds, Viewport};
//!
//! let viewport = Viewport::new(0.0, 0.0, 1280.0, 800.0);
//! let card = Bounds::new(0.0, 700.0, 400.0, 200.0);
//!
//! // Half of the card is inside the viewport
//! assert_eq!(card.intersection_ratio(&viewport.bounds()), 0.5);
//! ```

pub mod config;
pub mod error;
pub mod geometry;

pub use config::{
    FilterDefaults, MotionConfig, NavDefaults, PresenceMode, StaggerDefaults,
    TypewriterDefaults, VisibilityDefaults,
};
pub use error::{Error, Result};
pub use geometry::{Bounds, ElementId, Viewport};
