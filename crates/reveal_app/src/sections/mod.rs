//! Page sections
//!
//! Each section owns the trackers and effects it declares and releases them
//! when dropped.

mod about;
mod contact;
mod hero;
mod projects;
mod skills;

pub use about::{AboutSection, AboutSnapshot, ABOUT_SECTION};
pub use contact::{ContactSection, ContactSnapshot};
pub use hero::{HeroEntry, HeroSection, HeroSnapshot};
pub use projects::{ProjectCard, ProjectsSection, ProjectsSnapshot};
pub use skills::{SkillBar, SkillCard, SkillsSection, SkillsSnapshot};

use reveal_core::ElementId;
use reveal_motion::{Transition, VisibilityState, VisibilityTracker};
use serde::Serialize;

/// Reveal state of one element and when its entry transition starts
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ElementReveal {
    pub element: ElementId,
    pub state: VisibilityState,
    pub transition: Transition,
}

impl ElementReveal {
    fn tracked(tracker: &VisibilityTracker, transition: Transition) -> Self {
        Self {
            element: tracker.element().clone(),
            state: tracker.state(),
            transition,
        }
    }
}
