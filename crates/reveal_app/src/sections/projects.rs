//! Projects section: heading reveal plus the category-filtered card grid
//!
//! Filter changes are settled on the page clock: exits finish once the exit
//! transition has run, entries once the slowest staggered entry has.

use reveal_core::{ElementId, MotionConfig};
use reveal_motion::{
    FilterItem, FilterKey, FilterTransition, FilterableCollection, IntersectionObserver,
    ItemPhase, ObserveOptions, PresenceMode, VisibilityState, VisibilityTracker,
};
use serde::Serialize;

use crate::content::{Project, PROJECTS, PROJECT_CATEGORIES};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProjectCard {
    pub element: ElementId,
    pub title: String,
    pub category: String,
    pub phase: ItemPhase,
    pub enter_delay_ms: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProjectsSnapshot {
    pub heading: VisibilityState,
    pub active_filter: FilterKey,
    pub filters: Vec<FilterKey>,
    pub visible: Vec<ElementId>,
    /// Cards the host should render, including ones still exiting
    pub cards: Vec<ProjectCard>,
}

pub struct ProjectsSection {
    heading: VisibilityTracker,
    collection: FilterableCollection<Project>,
    /// Clock value at the last filter change still settling
    changed_at_ms: Option<u64>,
}

impl ProjectsSection {
    pub fn mount(observer: &IntersectionObserver, config: &MotionConfig) -> Self {
        let collection = FilterableCollection::new(PROJECT_CATEGORIES)
            .with_defaults(&config.filter)
            .with_items(
                PROJECTS
                    .iter()
                    .map(|project| FilterItem::new(project.element_id(), project.category, *project)),
            );

        Self {
            heading: observer.observe("projects-heading", ObserveOptions::from(&config.visibility)),
            collection,
            changed_at_ms: None,
        }
    }

    pub fn set_filter(&mut self, key: FilterKey, now_ms: u64) -> FilterTransition {
        let transition = self.collection.set_filter(key);
        if !transition.is_empty() {
            self.changed_at_ms = Some(now_ms);
        }
        transition
    }

    /// Settle item phases whose transitions have elapsed by `now_ms`
    pub fn tick(&mut self, now_ms: u64) {
        let Some(changed_at) = self.changed_at_ms else {
            return;
        };
        let elapsed = now_ms.saturating_sub(changed_at);

        let exit_ms = u64::from(self.collection.exit_transition().total_ms());
        if elapsed >= exit_ms {
            self.collection.finish_exits();
        }

        let enter_start = match self.collection.presence() {
            PresenceMode::Wait => exit_ms,
            PresenceMode::Sync => 0,
        };
        let slowest_entry = self
            .collection
            .visible()
            .filter_map(|item| self.collection.enter_transition(&item.id))
            .map(|transition| u64::from(transition.total_ms()))
            .max()
            .unwrap_or(0);

        if elapsed >= exit_ms.max(enter_start + slowest_entry) {
            self.collection.finish_transition();
            self.changed_at_ms = None;
            tracing::debug!("projects: filter transition settled");
        }
    }

    pub fn collection(&self) -> &FilterableCollection<Project> {
        &self.collection
    }

    pub fn snapshot(&self) -> ProjectsSnapshot {
        ProjectsSnapshot {
            heading: self.heading.state(),
            active_filter: self.collection.active_key().clone(),
            filters: self.collection.keys(),
            visible: self.collection.visible_ids(),
            cards: self
                .collection
                .rendered()
                .filter_map(|item| {
                    let phase = self.collection.phase(&item.id)?;
                    Some(ProjectCard {
                        element: item.id.clone(),
                        title: item.value.title.to_owned(),
                        category: item.category.clone(),
                        phase,
                        enter_delay_ms: self.collection.enter_delay(&item.id),
                    })
                })
                .collect(),
        }
    }
}
