//! Reveal Motion
//!
//! Viewport-driven animation orchestration. The host delivers signals
//! (intersection ratios, scroll offsets, clock advances, clicks); these
//! primitives decide when an element's logical state changes and which
//! interpolated values result. Nothing here measures or paints.
//!
//! # Primitives
//!
//! - **Visibility**: [`IntersectionObserver`] and [`VisibilityTracker`] with optional one-shot latch
//! - **Stagger**: [`StaggerGroup`] per-index entry delays
//! - **Scroll progress**: [`ScrollProgressMapper`] maps offsets into clamped progress and output channels
//! - **Typewriter**: [`Typewriter`] reveals text one character per tick of a [`TimerScheduler`]
//! - **Filtering**: [`FilterableCollection`] stable filtered subsets with enter/exit phases
//! - **Nav chrome**: [`NavigationChrome`] scrolled/menu flags with a process-wide mount
//!
//! Every registration (observation, timer, scroll listener) is owned by a
//! handle that releases it on drop.

pub mod easing;
pub mod filter;
pub mod nav;
pub mod scroll;
pub mod scroll_signal;
pub mod stagger;
pub mod timer;
pub mod transition;
pub mod typewriter;
pub mod visibility;

pub use easing::Easing;
pub use filter::{FilterItem, FilterKey, FilterTransition, FilterableCollection, ItemPhase};
pub use nav::{
    activate_link, close_menu, is_nav_mounted, nav_state, toggle_menu, with_nav, NavChromeGuard,
    NavLink, NavState, NavigationChrome,
};
pub use reveal_core::PresenceMode;
pub use scroll::{
    Channel, ChannelMapping, Edge, ScrollAnchor, ScrollProgressMapper, ScrollRange, ScrollSample,
};
pub use scroll_signal::{ListenerId, ScrollDispatcher, ScrollHandle, ScrollSubscription};
pub use stagger::{StaggerDirection, StaggerGroup};
pub use timer::{TimerControl, TimerHandle, TimerId, TimerScheduler};
pub use transition::Transition;
pub use typewriter::Typewriter;
pub use visibility::{
    clamp_threshold, AnimatableElement, IntersectionObserver, ObservationId, ObserveOptions,
    ObserverHandle, VisibilityChange, VisibilityState, VisibilityTracker,
};
