//! Filterable collections
//!
//! An active filter key over tagged items. The visible subset is recomputed
//! from the full item list on every change and always keeps insertion order.
//! Each change yields a [`FilterTransition`] so the host can animate only the
//! items that actually enter or leave.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;
use reveal_core::{ElementId, FilterDefaults, PresenceMode};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::stagger::StaggerGroup;
use crate::transition::Transition;

/// Active filter selection
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterKey {
    /// Every item, including ones with an unrecognized category
    #[default]
    All,
    Category(String),
}

impl FilterKey {
    pub const ALL: &'static str = "all";

    pub fn category(name: impl Into<String>) -> Self {
        Self::from(name.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            FilterKey::All => Self::ALL,
            FilterKey::Category(name) => name,
        }
    }
}

impl From<String> for FilterKey {
    fn from(value: String) -> Self {
        if value == Self::ALL {
            FilterKey::All
        } else {
            FilterKey::Category(value)
        }
    }
}

impl From<&str> for FilterKey {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<FilterKey> for String {
    fn from(key: FilterKey) -> Self {
        match key {
            FilterKey::All => FilterKey::ALL.to_owned(),
            FilterKey::Category(name) => name,
        }
    }
}

impl FromStr for FilterKey {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tagged item of a collection
#[derive(Clone, Debug, PartialEq)]
pub struct FilterItem<T> {
    pub id: ElementId,
    pub category: String,
    pub value: T,
}

impl<T> FilterItem<T> {
    pub fn new(id: impl Into<ElementId>, category: impl Into<String>, value: T) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            value,
        }
    }
}

/// Animation phase of a single item
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemPhase {
    /// Entering, but held back until exiting items have finished
    Pending,
    Entering,
    Present,
    Exiting,
}

/// Outcome of a filter change
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FilterTransition {
    /// Newly visible, in visible order
    pub entering: Vec<ElementId>,
    /// No longer visible, in insertion order
    pub exiting: Vec<ElementId>,
    /// Visible before and after; not re-animated
    pub retained: Vec<ElementId>,
}

impl FilterTransition {
    /// Whether nothing enters or leaves
    pub fn is_empty(&self) -> bool {
        self.entering.is_empty() && self.exiting.is_empty()
    }
}

/// Tagged items with an active filter key
pub struct FilterableCollection<T> {
    items: Vec<FilterItem<T>>,
    categories: IndexSet<String>,
    active: FilterKey,
    /// Indices into `items`, ascending
    visible: Vec<usize>,
    /// Items that are not simply present
    phases: FxHashMap<ElementId, ItemPhase>,
    presence: PresenceMode,
    enter_stagger: StaggerGroup,
    enter: Transition,
    exit: Transition,
}

impl<T> FilterableCollection<T> {
    /// Create an empty collection recognizing `categories`
    pub fn new<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: Vec::new(),
            categories: categories.into_iter().map(Into::into).collect(),
            active: FilterKey::All,
            visible: Vec::new(),
            phases: FxHashMap::default(),
            presence: PresenceMode::default(),
            enter_stagger: StaggerGroup::new(0, 100),
            enter: Transition::card(),
            exit: Transition::card(),
        }
    }

    pub fn with_items(mut self, items: impl IntoIterator<Item = FilterItem<T>>) -> Self {
        self.items.extend(items);
        self.visible = self.compute_visible(&self.active);
        self
    }

    pub fn with_presence(mut self, presence: PresenceMode) -> Self {
        self.presence = presence;
        self
    }

    pub fn with_enter_stagger(mut self, stagger: StaggerGroup) -> Self {
        self.enter_stagger = stagger;
        self
    }

    pub fn with_transitions(mut self, enter: Transition, exit: Transition) -> Self {
        self.enter = enter;
        self.exit = exit;
        self
    }

    /// Apply presence mode and enter stagger from configuration
    pub fn with_defaults(self, defaults: &FilterDefaults) -> Self {
        self.with_presence(defaults.presence)
            .with_enter_stagger(StaggerGroup::new(0, defaults.enter_stagger_ms))
    }

    /// Append an item; it shows up without an entry animation if the
    /// active key selects it
    pub fn push(&mut self, item: FilterItem<T>) {
        self.items.push(item);
        self.visible = self.compute_visible(&self.active);
    }

    fn selects(&self, key: &FilterKey, item: &FilterItem<T>) -> bool {
        match key {
            FilterKey::All => true,
            FilterKey::Category(name) => {
                item.category == *name && self.categories.contains(&item.category)
            }
        }
    }

    fn compute_visible(&self, key: &FilterKey) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| self.selects(key, item))
            .map(|(index, _)| index)
            .collect()
    }

    /// Change the active key and recompute the visible subset
    ///
    /// Re-selecting the active key changes nothing; every visible item is
    /// reported as retained.
    pub fn set_filter(&mut self, key: impl Into<FilterKey>) -> FilterTransition {
        let key = key.into();
        if key == self.active {
            return FilterTransition {
                retained: self.visible_ids(),
                ..FilterTransition::default()
            };
        }

        let next = self.compute_visible(&key);
        let mut transition = FilterTransition::default();

        for &index in &self.visible {
            if next.binary_search(&index).is_err() {
                transition.exiting.push(self.items[index].id.clone());
            }
        }
        for &index in &next {
            let id = self.items[index].id.clone();
            if self.visible.binary_search(&index).is_ok() {
                transition.retained.push(id);
            } else {
                transition.entering.push(id);
            }
        }

        for id in &transition.exiting {
            self.phases.insert(id.clone(), ItemPhase::Exiting);
        }
        let waiting = self.presence == PresenceMode::Wait
            && self.phases.values().any(|phase| *phase == ItemPhase::Exiting);
        let entering_phase = if waiting {
            ItemPhase::Pending
        } else {
            ItemPhase::Entering
        };
        for id in &transition.entering {
            self.phases.insert(id.clone(), entering_phase);
        }

        tracing::debug!(
            "FilterableCollection: {} -> {} (+{} -{} ={})",
            self.active,
            key,
            transition.entering.len(),
            transition.exiting.len(),
            transition.retained.len()
        );

        self.active = key;
        self.visible = next;
        transition
    }

    /// Phase of an item; `None` if it is neither visible nor exiting
    pub fn phase(&self, id: &ElementId) -> Option<ItemPhase> {
        if let Some(phase) = self.phases.get(id) {
            return Some(*phase);
        }
        self.visible
            .iter()
            .any(|&index| self.items[index].id == *id)
            .then_some(ItemPhase::Present)
    }

    /// Exiting items are gone; pending items start entering
    pub fn finish_exits(&mut self) {
        self.phases.retain(|_, phase| *phase != ItemPhase::Exiting);
        for phase in self.phases.values_mut() {
            if *phase == ItemPhase::Pending {
                *phase = ItemPhase::Entering;
            }
        }
    }

    /// Settle every item: exits removed, entries present
    pub fn finish_transition(&mut self) {
        self.phases.clear();
    }

    pub fn is_transitioning(&self) -> bool {
        !self.phases.is_empty()
    }

    /// Entry delay of an entering item, by its index in the visible subset
    pub fn enter_delay(&self, id: &ElementId) -> Option<u32> {
        match self.phases.get(id) {
            Some(ItemPhase::Entering | ItemPhase::Pending) => {}
            _ => return None,
        }
        let position = self
            .visible
            .iter()
            .position(|&index| self.items[index].id == *id)?;
        Some(
            self.enter_stagger
                .delay_for_in(position, self.visible.len()),
        )
    }

    /// Entry transition of an entering item, including its stagger delay
    pub fn enter_transition(&self, id: &ElementId) -> Option<Transition> {
        self.enter_delay(id)
            .map(|delay| self.enter.with_delay(self.enter.delay_ms.saturating_add(delay)))
    }

    pub fn exit_transition(&self) -> Transition {
        self.exit
    }

    /// Visible items in insertion order
    pub fn visible(&self) -> impl Iterator<Item = &FilterItem<T>> + '_ {
        self.visible.iter().map(move |&index| &self.items[index])
    }

    pub fn visible_ids(&self) -> Vec<ElementId> {
        self.visible().map(|item| item.id.clone()).collect()
    }

    /// Items the host should still render: visible plus exiting
    pub fn rendered(&self) -> impl Iterator<Item = &FilterItem<T>> + '_ {
        self.items.iter().filter(move |item| {
            matches!(self.phase(&item.id), Some(phase) if phase != ItemPhase::Pending)
        })
    }

    pub fn items(&self) -> &[FilterItem<T>] {
        &self.items
    }

    pub fn active_key(&self) -> &FilterKey {
        &self.active
    }

    /// Every selectable key: `all` followed by the recognized categories
    pub fn keys(&self) -> Vec<FilterKey> {
        std::iter::once(FilterKey::All)
            .chain(
                self.categories
                    .iter()
                    .map(|name| FilterKey::Category(name.clone())),
            )
            .collect()
    }

    pub fn presence(&self) -> PresenceMode {
        self.presence
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projects() -> FilterableCollection<&'static str> {
        FilterableCollection::new(["frontend", "fullstack", "mobile"]).with_items([
            FilterItem::new("project-1", "fullstack", "E-Commerce Platform"),
            FilterItem::new("project-2", "frontend", "Real-Time Dashboard"),
            FilterItem::new("project-3", "mobile", "Task Management App"),
            FilterItem::new("project-4", "fullstack", "Social Media Platform"),
            FilterItem::new("project-5", "frontend", "AI Content Generator"),
            FilterItem::new("project-6", "mobile", "Fitness Tracking Mobile App"),
        ])
    }

    fn ids(list: &[&str]) -> Vec<ElementId> {
        list.iter().map(|id| ElementId::from(*id)).collect()
    }

    #[test]
    fn test_filter_keeps_insertion_order() {
        let mut collection = projects();

        let transition = collection.set_filter("mobile");
        assert_eq!(collection.visible_ids(), ids(&["project-3", "project-6"]));
        assert!(transition.entering.is_empty());
        assert_eq!(transition.retained, ids(&["project-3", "project-6"]));
        assert_eq!(
            transition.exiting,
            ids(&["project-1", "project-2", "project-4", "project-5"])
        );

        collection.set_filter(FilterKey::All);
        assert_eq!(
            collection.visible_ids(),
            ids(&[
                "project-1",
                "project-2",
                "project-3",
                "project-4",
                "project-5",
                "project-6"
            ])
        );
    }

    #[test]
    fn test_same_key_does_not_reanimate() {
        let mut collection = projects();
        collection.set_filter("frontend");
        collection.finish_transition();

        let transition = collection.set_filter("frontend");
        assert!(transition.is_empty());
        assert_eq!(transition.retained, ids(&["project-2", "project-5"]));
        assert!(!collection.is_transitioning());
    }

    #[test]
    fn test_wait_mode_holds_entering_items() {
        let mut collection = projects();
        collection.set_filter("mobile");
        collection.finish_transition();

        let transition = collection.set_filter("frontend");
        assert_eq!(transition.entering, ids(&["project-2", "project-5"]));

        let entering = ElementId::from("project-2");
        let exiting = ElementId::from("project-3");
        assert_eq!(collection.phase(&entering), Some(ItemPhase::Pending));
        assert_eq!(collection.phase(&exiting), Some(ItemPhase::Exiting));

        collection.finish_exits();
        assert_eq!(collection.phase(&entering), Some(ItemPhase::Entering));
        assert_eq!(collection.phase(&exiting), None);

        collection.finish_transition();
        assert_eq!(collection.phase(&entering), Some(ItemPhase::Present));
    }

    #[test]
    fn test_sync_mode_enters_immediately() {
        let mut collection = projects().with_presence(PresenceMode::Sync);
        collection.set_filter("mobile");
        collection.finish_transition();
        collection.set_filter("frontend");

        assert_eq!(
            collection.phase(&ElementId::from("project-5")),
            Some(ItemPhase::Entering)
        );
        assert_eq!(
            collection.phase(&ElementId::from("project-6")),
            Some(ItemPhase::Exiting)
        );
    }

    #[test]
    fn test_unrecognized_category_only_under_all() {
        let mut collection = projects();
        collection.push(FilterItem::new("project-7", "desktop", "Legacy Tool"));
        assert_eq!(collection.visible_ids().len(), 7);

        collection.set_filter("desktop");
        assert!(collection.visible_ids().is_empty());

        collection.set_filter("all");
        assert_eq!(collection.visible_ids().len(), 7);
    }

    #[test]
    fn test_enter_delay_by_visible_index() {
        let mut collection = projects();
        collection.set_filter("mobile");
        collection.finish_transition();
        collection.set_filter("all");

        // project-3 and project-6 were retained and do not re-animate
        assert_eq!(collection.enter_delay(&ElementId::from("project-3")), None);
        assert_eq!(collection.enter_delay(&ElementId::from("project-1")), Some(0));
        assert_eq!(collection.enter_delay(&ElementId::from("project-5")), Some(400));

        let transition = collection
            .enter_transition(&ElementId::from("project-2"))
            .unwrap();
        assert_eq!(transition.delay_ms, 100);
        assert_eq!(transition.duration_ms, 500);
    }

    #[test]
    fn test_rendered_includes_exiting() {
        let mut collection = projects().with_presence(PresenceMode::Sync);
        collection.set_filter("mobile");
        assert_eq!(collection.rendered().count(), 6);

        collection.finish_exits();
        assert_eq!(collection.rendered().count(), 2);
    }

    #[test]
    fn test_keys_and_parsing() {
        let collection = projects();
        let keys: Vec<String> = collection.keys().iter().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["all", "frontend", "fullstack", "mobile"]);

        assert_eq!("all".parse::<FilterKey>().unwrap(), FilterKey::All);
        assert_eq!(
            serde_json::to_string(&FilterKey::category("mobile")).unwrap(),
            "\"mobile\""
        );
    }
}
