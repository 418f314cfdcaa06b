//! About section: scroll-linked fade/scale plus the career timeline

use reveal_core::{Bounds, MotionConfig};
use reveal_motion::{
    Channel, ChannelMapping, IntersectionObserver, ObserveOptions, ScrollAnchor,
    ScrollProgressMapper, ScrollRange, StaggerGroup, Transition, VisibilityState,
    VisibilityTracker,
};
use serde::Serialize;

use super::ElementReveal;
use crate::content::TIMELINE;

/// Element id of the section container driving the scroll binding
pub const ABOUT_SECTION: &str = "about";

const THRESHOLD: f32 = 0.2;
const TIMELINE_STAGGER_MS: u32 = 200;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AboutSnapshot {
    pub heading: VisibilityState,
    pub progress: f32,
    pub opacity: f32,
    pub scale: f32,
    pub timeline: Vec<ElementReveal>,
}

pub struct AboutSection {
    heading: VisibilityTracker,
    timeline: Vec<VisibilityTracker>,
    stagger: StaggerGroup,
    binding: ScrollProgressMapper,
    /// The binding has a real range once the section was laid out
    bound: bool,
}

impl AboutSection {
    pub fn mount(observer: &IntersectionObserver, config: &MotionConfig) -> Self {
        let options = ObserveOptions {
            threshold: THRESHOLD,
            trigger_once: config.visibility.trigger_once,
        };

        let timeline: Vec<VisibilityTracker> = (0..TIMELINE.len())
            .map(|index| observer.observe(format!("about-timeline-{}", index), options))
            .collect();
        let stagger = StaggerGroup::new(0, TIMELINE_STAGGER_MS)
            .with_elements(timeline.iter().map(|tracker| tracker.element().clone()));

        Self {
            heading: observer.observe("about-heading", options),
            timeline,
            stagger,
            binding: ScrollProgressMapper::new(ABOUT_SECTION, ScrollRange::at(0.0))
                .channel(Channel::OPACITY, ChannelMapping::new(0.4, 1.0).over(0.0, 0.5))
                .channel(Channel::SCALE, ChannelMapping::new(0.8, 1.0).over(0.0, 0.5)),
            bound: false,
        }
    }

    /// Rebind the scroll range to fresh section geometry
    ///
    /// Progress runs from the section top meeting the viewport bottom to the
    /// section bottom meeting the viewport bottom.
    pub fn layout(&mut self, bounds: &Bounds, viewport_height: f32) -> reveal_core::Result<()> {
        self.binding.rebind(
            bounds,
            viewport_height,
            ScrollAnchor::START_END,
            ScrollAnchor::END_END,
        )?;
        self.bound = true;
        Ok(())
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    pub fn binding(&self) -> &ScrollProgressMapper {
        &self.binding
    }

    pub fn snapshot(&self, scroll_offset: f32) -> AboutSnapshot {
        // Until the section has been laid out it sits at zero progress
        let offset = if self.bound {
            scroll_offset
        } else {
            f32::NEG_INFINITY
        };
        let sample = self.binding.sample(offset);

        AboutSnapshot {
            heading: self.heading.state(),
            progress: sample.progress,
            opacity: sample.get(&Channel::OPACITY).unwrap_or(1.0),
            scale: sample.get(&Channel::SCALE).unwrap_or(1.0),
            timeline: self
                .timeline
                .iter()
                .enumerate()
                .map(|(index, tracker)| {
                    ElementReveal::tracked(
                        tracker,
                        Transition::reveal().with_delay(self.stagger.delay_for(index)),
                    )
                })
                .collect(),
        }
    }
}
