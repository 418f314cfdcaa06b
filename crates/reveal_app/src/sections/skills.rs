//! Skills section: category cards and per-skill progress bars
//!
//! Every card and every bar is tracked on its own, so a bar fills as soon as
//! it scrolls in, not when its whole card does.

use reveal_core::{ElementId, MotionConfig};
use reveal_motion::{
    Easing, IntersectionObserver, ObserveOptions, StaggerGroup, Transition, VisibilityState,
    VisibilityTracker,
};
use serde::Serialize;

use crate::content::{slug, Skill, SkillCategory, SKILL_CATEGORIES};

/// Bars start filling this long after they start sliding in (ms)
const FILL_OFFSET_MS: u32 = 200;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SkillBar {
    pub element: ElementId,
    pub name: String,
    pub state: VisibilityState,
    pub transition: Transition,
    pub fill: Transition,
    /// Target bar width: the skill level while visible, zero otherwise
    pub width_percent: u8,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SkillCard {
    pub element: ElementId,
    pub name: String,
    pub state: VisibilityState,
    pub transition: Transition,
    pub bars: Vec<SkillBar>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SkillsSnapshot {
    pub heading: VisibilityState,
    pub categories: Vec<SkillCard>,
}

struct BarBlock {
    tracker: VisibilityTracker,
    skill: Skill,
}

struct CardBlock {
    tracker: VisibilityTracker,
    category: SkillCategory,
    bars: Vec<BarBlock>,
    bar_stagger: StaggerGroup,
}

pub struct SkillsSection {
    heading: VisibilityTracker,
    cards: Vec<CardBlock>,
    card_stagger: StaggerGroup,
}

impl SkillsSection {
    pub fn mount(observer: &IntersectionObserver, config: &MotionConfig) -> Self {
        let options = ObserveOptions::from(&config.visibility);
        let increment = config.stagger.increment_ms;

        let cards: Vec<CardBlock> = SKILL_CATEGORIES
            .iter()
            .map(|category| {
                let category_slug = slug(category.name);
                let bars: Vec<BarBlock> = category
                    .skills
                    .iter()
                    .map(|skill| BarBlock {
                        tracker: observer.observe(
                            format!("skill-{}-{}", category_slug, slug(skill.name)),
                            options,
                        ),
                        skill: *skill,
                    })
                    .collect();
                let bar_stagger = StaggerGroup::new(0, increment)
                    .with_elements(bars.iter().map(|bar| bar.tracker.element().clone()));

                CardBlock {
                    tracker: observer.observe(format!("skills-{}", category_slug), options),
                    category: *category,
                    bars,
                    bar_stagger,
                }
            })
            .collect();
        let card_stagger = StaggerGroup::new(0, increment)
            .with_elements(cards.iter().map(|card| card.tracker.element().clone()));

        Self {
            heading: observer.observe("skills-heading", options),
            cards,
            card_stagger,
        }
    }

    /// Number of tracked skill bars
    pub fn bar_count(&self) -> usize {
        self.cards.iter().map(|card| card.bars.len()).sum()
    }

    pub fn snapshot(&self) -> SkillsSnapshot {
        let card_transition = Transition::card();
        let fill = Transition::new(1000).with_easing(Easing::OUT_QUINT);

        SkillsSnapshot {
            heading: self.heading.state(),
            categories: self
                .cards
                .iter()
                .enumerate()
                .map(|(index, card)| SkillCard {
                    element: card.tracker.element().clone(),
                    name: card.category.name.to_owned(),
                    state: card.tracker.state(),
                    transition: card_transition.with_delay(self.card_stagger.delay_for(index)),
                    bars: card
                        .bars
                        .iter()
                        .enumerate()
                        .map(|(bar_index, bar)| {
                            let delay = card.bar_stagger.delay_for(bar_index);
                            let state = bar.tracker.state();
                            SkillBar {
                                element: bar.tracker.element().clone(),
                                name: bar.skill.name.to_owned(),
                                state,
                                transition: card_transition.with_delay(delay),
                                fill: fill.with_delay(delay.saturating_add(FILL_OFFSET_MS)),
                                width_percent: if state.is_visible() {
                                    bar.skill.level
                                } else {
                                    0
                                },
                            }
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
