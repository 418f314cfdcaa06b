//! Reveal Portfolio Page
//!
//! A single-page portfolio wired from the Reveal motion primitives: a typed
//! hero line, a scroll-linked about section with a staggered timeline, a
//! filterable project grid, skill bars that fill as they scroll in, and a
//! header that reacts to scrolling.
//!
//! # Example
//!
//! ```ignore
//! use reveal_app::{PageEvent, PortfolioPage};
//! use reveal_core::{MotionConfig, Viewport};
//!
//! let mut page = PortfolioPage::mount(
//!     MotionConfig::standard(),
//!     Viewport::new(0.0, 0.0, 1280.0, 800.0),
//! )?;
//!
//! page.handle(&PageEvent::Scroll { offset: 120.0 })?;
//! page.handle(&PageEvent::Advance { ms: 100 })?;
//! println!("{}", page.snapshot().to_json()?);
//! ```

pub mod content;
mod error;
mod event;
mod page;
pub mod sections;

pub use error::{PageError, Result};
pub use event::{EventScript, PageEvent, ViewportSize};
pub use page::{PageSnapshot, PortfolioPage};
