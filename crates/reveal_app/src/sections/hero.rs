//! Hero section: staggered entry on mount plus the typed role line

use reveal_core::{ElementId, MotionConfig};
use reveal_motion::{Easing, StaggerGroup, TimerHandle, Transition, Typewriter};
use serde::Serialize;

use crate::content::{HERO_ITEMS, HERO_ROLE};

/// Delay before the scroll hint appears (ms)
const SCROLL_INDICATOR_DELAY_MS: u32 = 1500;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HeroEntry {
    pub element: ElementId,
    pub delay_ms: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HeroSnapshot {
    pub typed_text: String,
    pub typing_complete: bool,
    pub entries: Vec<HeroEntry>,
    pub entry_transition: Transition,
    pub scroll_indicator_delay_ms: u32,
}

pub struct HeroSection {
    typewriter: Typewriter,
    entries: StaggerGroup,
    entry: Transition,
    interval_ms: u32,
}

impl HeroSection {
    /// Mount the hero; typing starts immediately
    pub fn mount(timers: TimerHandle, config: &MotionConfig) -> Self {
        let typewriter = Typewriter::new(timers)
            .with_on_complete(|text| tracing::debug!("hero: typed \"{}\"", text));
        let interval_ms = config.typewriter.interval_ms;
        typewriter.start(HERO_ROLE, interval_ms);

        Self {
            typewriter,
            entries: StaggerGroup::from(&config.stagger).with_elements(HERO_ITEMS),
            entry: Transition::reveal().with_easing(Easing::OUT_QUART),
            interval_ms,
        }
    }

    /// Type the role line again from the start
    pub fn restart_typing(&self) {
        self.typewriter.start(HERO_ROLE, self.interval_ms);
    }

    pub fn typewriter(&self) -> &Typewriter {
        &self.typewriter
    }

    pub fn entries(&self) -> &StaggerGroup {
        &self.entries
    }

    pub fn snapshot(&self) -> HeroSnapshot {
        HeroSnapshot {
            typed_text: self.typewriter.revealed_text(),
            typing_complete: self.typewriter.is_complete(),
            entries: self
                .entries
                .schedule()
                .into_iter()
                .map(|(element, delay_ms)| HeroEntry { element, delay_ms })
                .collect(),
            entry_transition: self.entry,
            scroll_indicator_delay_ms: SCROLL_INDICATOR_DELAY_MS,
        }
    }
}
