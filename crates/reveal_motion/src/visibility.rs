//! Viewport visibility tracking
//!
//! The host owns the real intersection machinery (or just the layout) and
//! forwards per-element intersection ratios. Each observation turns those
//! ratios into a `Hidden`/`Visible` state with an optional one-shot latch.
//!
//! ```ignore
//! let observer = IntersectionObserver::new();
//! let heading = observer.observe("projects-heading", ObserveOptions::new(0.1));
//!
//! observer.deliver(&"projects-heading".into(), 0.4);
//! assert!(heading.is_visible());
//! ```

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use reveal_core::{Bounds, ElementId, VisibilityDefaults, Viewport};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Handle to a registered observation
    pub struct ObservationId;
}

/// Logical reveal state of an element
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityState {
    #[default]
    Hidden,
    Visible,
}

impl VisibilityState {
    pub fn is_visible(self) -> bool {
        self == VisibilityState::Visible
    }
}

/// Clamp a threshold into `(0, 1]`
///
/// Values at or below zero become the smallest positive `f32`, values above
/// one become one, and NaN becomes one.
pub fn clamp_threshold(threshold: f32) -> f32 {
    if threshold.is_nan() {
        tracing::warn!("visibility threshold is NaN, using 1.0");
        return 1.0;
    }
    if threshold <= 0.0 {
        tracing::warn!("visibility threshold {} clamped to (0, 1]", threshold);
        return f32::MIN_POSITIVE;
    }
    if threshold > 1.0 {
        tracing::warn!("visibility threshold {} clamped to 1.0", threshold);
        return 1.0;
    }
    threshold
}

/// Observation options
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObserveOptions {
    /// Intersection ratio at or above which the element counts as visible
    pub threshold: f32,
    /// Stay visible forever after the first reveal
    pub trigger_once: bool,
}

impl ObserveOptions {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            trigger_once: false,
        }
    }

    /// Latch the visible state after the first reveal
    pub fn once(mut self) -> Self {
        self.trigger_once = true;
        self
    }
}

impl Default for ObserveOptions {
    fn default() -> Self {
        Self::from(&VisibilityDefaults::default())
    }
}

impl From<&VisibilityDefaults> for ObserveOptions {
    fn from(defaults: &VisibilityDefaults) -> Self {
        Self {
            threshold: defaults.threshold,
            trigger_once: defaults.trigger_once,
        }
    }
}

/// State machine for one observed element
#[derive(Clone, Debug, PartialEq)]
pub struct AnimatableElement {
    id: ElementId,
    threshold: f32,
    trigger_once: bool,
    state: VisibilityState,
    has_fired_once: bool,
}

impl AnimatableElement {
    pub fn new(id: impl Into<ElementId>, options: ObserveOptions) -> Self {
        Self {
            id: id.into(),
            threshold: clamp_threshold(options.threshold),
            trigger_once: options.trigger_once,
            state: VisibilityState::Hidden,
            has_fired_once: false,
        }
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn trigger_once(&self) -> bool {
        self.trigger_once
    }

    pub fn state(&self) -> VisibilityState {
        self.state
    }

    pub fn has_fired_once(&self) -> bool {
        self.has_fired_once
    }

    /// Apply an intersection ratio; returns `true` if the state changed
    pub fn apply(&mut self, intersection_ratio: f32) -> bool {
        if self.trigger_once && self.has_fired_once {
            return false;
        }

        // NaN compares false, so it reads as not intersecting
        let next = if intersection_ratio >= self.threshold {
            VisibilityState::Visible
        } else {
            VisibilityState::Hidden
        };
        if next.is_visible() {
            self.has_fired_once = true;
        }

        let changed = next != self.state;
        self.state = next;
        changed
    }
}

/// A state change produced by a delivery
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibilityChange {
    pub observation: ObservationId,
    pub element: ElementId,
    pub state: VisibilityState,
}

struct ObserverInner {
    observations: SlotMap<ObservationId, AnimatableElement>,
    by_element: FxHashMap<ElementId, SmallVec<[ObservationId; 2]>>,
}

impl ObserverInner {
    fn remove(&mut self, id: ObservationId) -> bool {
        let Some(observation) = self.observations.remove(id) else {
            return false;
        };
        if let Some(ids) = self.by_element.get_mut(observation.id()) {
            ids.retain(|other| *other != id);
            if ids.is_empty() {
                self.by_element.remove(observation.id());
            }
        }
        true
    }
}

/// Registry of element observations
pub struct IntersectionObserver {
    inner: Arc<Mutex<ObserverInner>>,
}

impl IntersectionObserver {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ObserverInner {
                observations: SlotMap::with_key(),
                by_element: FxHashMap::default(),
            })),
        }
    }

    /// Get a weak handle for registering observations
    pub fn handle(&self) -> ObserverHandle {
        ObserverHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Start observing an element
    ///
    /// The observation lives as long as the returned tracker.
    pub fn observe(&self, element: impl Into<ElementId>, options: ObserveOptions) -> VisibilityTracker {
        self.handle().observe(element, options)
    }

    /// Deliver an intersection ratio for an element
    ///
    /// Returns the observations whose state changed, in registration order.
    /// Unknown elements are ignored.
    pub fn deliver(&self, element: &ElementId, intersection_ratio: f32) -> Vec<VisibilityChange> {
        let mut inner = self.inner.lock();
        let Some(ids) = inner.by_element.get(element).cloned() else {
            return Vec::new();
        };

        let mut changes = Vec::new();
        for id in ids {
            if let Some(observation) = inner.observations.get_mut(id) {
                if observation.apply(intersection_ratio) {
                    tracing::debug!(
                        "visibility: {} -> {:?} (ratio {:.3})",
                        element,
                        observation.state(),
                        intersection_ratio
                    );
                    changes.push(VisibilityChange {
                        observation: id,
                        element: element.clone(),
                        state: observation.state(),
                    });
                }
            }
        }
        changes
    }

    /// Deliver element geometry; the ratio is computed against the viewport
    pub fn deliver_geometry(
        &self,
        element: &ElementId,
        bounds: &Bounds,
        viewport: &Viewport,
    ) -> Vec<VisibilityChange> {
        self.deliver(element, bounds.intersection_ratio(&viewport.bounds()))
    }

    /// Current state of an observation
    pub fn state(&self, id: ObservationId) -> Option<VisibilityState> {
        self.inner.lock().observations.get(id).map(|o| o.state())
    }

    /// Number of live observations
    pub fn observation_count(&self) -> usize {
        self.inner.lock().observations.len()
    }

    /// Check whether any observation targets an element
    pub fn is_observing(&self, element: &ElementId) -> bool {
        self.inner.lock().by_element.contains_key(element)
    }
}

impl Default for IntersectionObserver {
    fn default() -> Self {
        Self::new()
    }
}

/// A weak handle to the observer registry
#[derive(Clone)]
pub struct ObserverHandle {
    inner: Weak<Mutex<ObserverInner>>,
}

impl ObserverHandle {
    /// Start observing an element
    ///
    /// If the observer is gone the tracker is detached and stays `Hidden`.
    pub fn observe(&self, element: impl Into<ElementId>, options: ObserveOptions) -> VisibilityTracker {
        let element = AnimatableElement::new(element, options);
        let element_id = element.id().clone();
        let id = self.inner.upgrade().map(|inner| {
            let mut guard = inner.lock();
            let id = guard.observations.insert(element);
            guard.by_element.entry(element_id.clone()).or_default().push(id);
            id
        });

        VisibilityTracker {
            handle: self.clone(),
            id,
            element: element_id,
        }
    }

    fn state(&self, id: ObservationId) -> Option<VisibilityState> {
        self.inner
            .upgrade()
            .and_then(|inner| inner.lock().observations.get(id).map(|o| o.state()))
    }

    fn has_fired_once(&self, id: ObservationId) -> bool {
        self.inner
            .upgrade()
            .and_then(|inner| inner.lock().observations.get(id).map(|o| o.has_fired_once()))
            .unwrap_or(false)
    }

    fn remove(&self, id: ObservationId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.lock().remove(id))
            .unwrap_or(false)
    }

    /// Check if the observer is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

/// An element's registration with the observer
///
/// Read [`state()`](Self::state) on every render. Dropping the tracker
/// (unmount) releases the observation.
pub struct VisibilityTracker {
    handle: ObserverHandle,
    id: Option<ObservationId>,
    element: ElementId,
}

impl VisibilityTracker {
    pub fn element(&self) -> &ElementId {
        &self.element
    }

    pub fn observation(&self) -> Option<ObservationId> {
        self.id
    }

    /// Current state; `Hidden` once unobserved
    pub fn state(&self) -> VisibilityState {
        self.id
            .and_then(|id| self.handle.state(id))
            .unwrap_or(VisibilityState::Hidden)
    }

    pub fn is_visible(&self) -> bool {
        self.state().is_visible()
    }

    pub fn has_fired_once(&self) -> bool {
        self.id
            .map(|id| self.handle.has_fired_once(id))
            .unwrap_or(false)
    }

    /// Stop observing; idempotent
    pub fn unobserve(&mut self) {
        if let Some(id) = self.id.take() {
            self.handle.remove(id);
        }
    }
}

impl Drop for VisibilityTracker {
    fn drop(&mut self) {
        self.unobserve();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> ElementId {
        ElementId::from(name)
    }

    #[test]
    fn test_follows_latest_ratio() {
        let observer = IntersectionObserver::new();
        let tracker = observer.observe("card", ObserveOptions::new(0.2));

        assert_eq!(tracker.state(), VisibilityState::Hidden);

        observer.deliver(&id("card"), 0.2);
        assert!(tracker.is_visible());

        observer.deliver(&id("card"), 0.19);
        assert_eq!(tracker.state(), VisibilityState::Hidden);

        observer.deliver(&id("card"), 0.9);
        assert!(tracker.is_visible());
        assert!(tracker.has_fired_once());
    }

    #[test]
    fn test_trigger_once_latches() {
        let observer = IntersectionObserver::new();
        let tracker = observer.observe("hero", ObserveOptions::new(0.5).once());

        observer.deliver(&id("hero"), 0.1);
        assert!(!tracker.is_visible());

        observer.deliver(&id("hero"), 0.6);
        assert!(tracker.is_visible());

        for ratio in [0.0, 0.3, 0.0, 1.0, 0.0] {
            let changes = observer.deliver(&id("hero"), ratio);
            assert!(changes.is_empty());
            assert!(tracker.is_visible());
        }
    }

    #[test]
    fn test_deliver_reports_only_changes() {
        let observer = IntersectionObserver::new();
        let tracker = observer.observe("skills", ObserveOptions::new(0.1));

        let changes = observer.deliver(&id("skills"), 0.5);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].state, VisibilityState::Visible);
        assert_eq!(Some(changes[0].observation), tracker.observation());

        assert!(observer.deliver(&id("skills"), 0.7).is_empty());
    }

    #[test]
    fn test_multiple_thresholds_on_one_element() {
        let observer = IntersectionObserver::new();
        let loose = observer.observe("about", ObserveOptions::new(0.1));
        let strict = observer.observe("about", ObserveOptions::new(0.8));

        observer.deliver(&id("about"), 0.5);
        assert!(loose.is_visible());
        assert!(!strict.is_visible());
    }

    #[test]
    fn test_drop_releases_observation() {
        let observer = IntersectionObserver::new();
        {
            let _tracker = observer.observe("contact", ObserveOptions::default());
            assert_eq!(observer.observation_count(), 1);
            assert!(observer.is_observing(&id("contact")));
        }
        assert_eq!(observer.observation_count(), 0);
        assert!(!observer.is_observing(&id("contact")));

        // Events for an unmounted element are ignored
        assert!(observer.deliver(&id("contact"), 1.0).is_empty());
    }

    #[test]
    fn test_unobserve_is_idempotent() {
        let observer = IntersectionObserver::new();
        let mut tracker = observer.observe("x", ObserveOptions::default());
        observer.deliver(&id("x"), 1.0);

        tracker.unobserve();
        tracker.unobserve();
        assert_eq!(tracker.state(), VisibilityState::Hidden);
        assert_eq!(observer.observation_count(), 0);
    }

    #[test]
    fn test_threshold_clamped() {
        assert_eq!(clamp_threshold(1.5), 1.0);
        assert_eq!(clamp_threshold(f32::NAN), 1.0);
        assert_eq!(clamp_threshold(-0.3), f32::MIN_POSITIVE);
        assert_eq!(clamp_threshold(0.0), f32::MIN_POSITIVE);
        assert_eq!(clamp_threshold(0.25), 0.25);

        // Threshold above 1 still triggers at full visibility
        let mut element = AnimatableElement::new("big", ObserveOptions::new(3.0));
        assert!(element.apply(1.0));
        assert!(element.state().is_visible());

        // Threshold at or below 0 needs some overlap
        let mut element = AnimatableElement::new("tiny", ObserveOptions::new(0.0));
        assert!(!element.apply(0.0));
        assert!(element.apply(0.001));
    }

    #[test]
    fn test_geometry_delivery() {
        let observer = IntersectionObserver::new();
        let tracker = observer.observe("timeline-0", ObserveOptions::new(0.2));
        let bounds = Bounds::new(0.0, 1000.0, 600.0, 200.0);

        let viewport = Viewport::new(0.0, 0.0, 1280.0, 800.0);
        observer.deliver_geometry(&id("timeline-0"), &bounds, &viewport);
        assert!(!tracker.is_visible());

        // 50 of 200 px visible: ratio 0.25
        observer.deliver_geometry(&id("timeline-0"), &bounds, &viewport.scrolled_to(250.0));
        assert!(tracker.is_visible());
    }

    #[test]
    fn test_tracker_outlives_observer() {
        let tracker = {
            let observer = IntersectionObserver::new();
            let tracker = observer.observe("orphan", ObserveOptions::default());
            observer.deliver(&id("orphan"), 1.0);
            tracker
        };
        assert!(!tracker.handle.is_alive());
        assert_eq!(tracker.state(), VisibilityState::Hidden);
    }
}
