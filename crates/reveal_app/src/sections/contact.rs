//! Contact section: one tracker drives the heading and both content blocks

use reveal_core::{ElementId, MotionConfig};
use reveal_motion::{
    IntersectionObserver, ObserveOptions, Transition, VisibilityState, VisibilityTracker,
};
use serde::Serialize;

use super::ElementReveal;

/// `(element, entry delay)` of the blocks revealed with the heading
const BLOCKS: [(&str, u32); 2] = [("contact-info", 200), ("contact-form", 400)];

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContactSnapshot {
    pub heading: VisibilityState,
    pub blocks: Vec<ElementReveal>,
}

pub struct ContactSection {
    heading: VisibilityTracker,
}

impl ContactSection {
    pub fn mount(observer: &IntersectionObserver, config: &MotionConfig) -> Self {
        Self {
            heading: observer.observe("contact-heading", ObserveOptions::from(&config.visibility)),
        }
    }

    pub fn snapshot(&self) -> ContactSnapshot {
        let state = self.heading.state();
        ContactSnapshot {
            heading: state,
            blocks: BLOCKS
                .iter()
                .map(|(element, delay_ms)| ElementReveal {
                    element: ElementId::from(*element),
                    state,
                    transition: Transition::new(600).with_delay(*delay_ms),
                })
                .collect(),
        }
    }
}
