//! Staggered entry delays
//!
//! Siblings sharing one trigger start their transitions at
//! `base_delay_ms + index * increment_ms`.

use reveal_core::{ElementId, StaggerDefaults};

/// Direction for stagger ordering
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StaggerDirection {
    /// Animate first to last
    #[default]
    Forward,
    /// Animate last to first
    Reverse,
    /// Animate from center outward
    FromCenter,
}

/// An ordered group of elements with per-index entry delays
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StaggerGroup {
    elements: Vec<ElementId>,
    base_delay_ms: u32,
    increment_ms: u32,
    direction: StaggerDirection,
    limit: Option<usize>,
}

impl StaggerGroup {
    pub fn new(base_delay_ms: u32, increment_ms: u32) -> Self {
        Self {
            base_delay_ms,
            increment_ms,
            ..Self::default()
        }
    }

    /// Set the member elements, in order
    pub fn with_elements<I, E>(mut self, elements: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<ElementId>,
    {
        self.elements = elements.into_iter().map(Into::into).collect();
        self
    }

    /// Stagger from last to first
    pub fn reverse(mut self) -> Self {
        self.direction = StaggerDirection::Reverse;
        self
    }

    /// Stagger from center outward
    pub fn from_center(mut self) -> Self {
        self.direction = StaggerDirection::FromCenter;
        self
    }

    /// Cap the stagger index; items past `n` share the delay of item `n`
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn push(&mut self, element: impl Into<ElementId>) {
        self.elements.push(element.into());
    }

    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn base_delay_ms(&self) -> u32 {
        self.base_delay_ms
    }

    pub fn increment_ms(&self) -> u32 {
        self.increment_ms
    }

    /// Entry delay for a member index
    ///
    /// With the default forward direction and no limit this is exactly
    /// `base_delay_ms + index * increment_ms`, saturating at `u32::MAX`.
    pub fn delay_for(&self, index: usize) -> u32 {
        self.delay_for_in(index, self.elements.len())
    }

    /// Entry delay for an index within a collection of `total` items
    pub fn delay_for_in(&self, index: usize, total: usize) -> u32 {
        let effective_index = match self.direction {
            StaggerDirection::Forward => index,
            StaggerDirection::Reverse => total.saturating_sub(1).saturating_sub(index),
            StaggerDirection::FromCenter => {
                let center = total / 2;
                if index <= center {
                    center - index
                } else {
                    index - center
                }
            }
        };

        let capped_index = match self.limit {
            Some(limit) => effective_index.min(limit),
            None => effective_index,
        };

        let steps = u32::try_from(capped_index).unwrap_or(u32::MAX);
        self.base_delay_ms
            .saturating_add(self.increment_ms.saturating_mul(steps))
    }

    /// Delay for a member element, if it belongs to the group
    pub fn delay_of(&self, element: &ElementId) -> Option<u32> {
        self.elements
            .iter()
            .position(|e| e == element)
            .map(|index| self.delay_for(index))
    }

    /// Every member with its entry delay, in member order
    pub fn schedule(&self) -> Vec<(ElementId, u32)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(index, element)| (element.clone(), self.delay_for(index)))
            .collect()
    }
}

impl From<&StaggerDefaults> for StaggerGroup {
    fn from(defaults: &StaggerDefaults) -> Self {
        Self::new(defaults.base_delay_ms, defaults.increment_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_delays() {
        let group = StaggerGroup::new(100, 200);
        assert_eq!(group.delay_for(0), 100);
        assert_eq!(group.delay_for(1), 300);
        assert_eq!(group.delay_for(3), 700);
    }

    #[test]
    fn test_strictly_increasing() {
        let group = StaggerGroup::new(100, 200);
        let delays: Vec<u32> = (0..50).map(|i| group.delay_for(i)).collect();
        assert!(delays.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_saturates() {
        let group = StaggerGroup::new(u32::MAX - 5, 10);
        assert_eq!(group.delay_for(0), u32::MAX - 5);
        assert_eq!(group.delay_for(1), u32::MAX);
        assert_eq!(group.delay_for(usize::MAX), u32::MAX);
    }

    #[test]
    fn test_schedule_keeps_member_order() {
        let group = StaggerGroup::new(300, 100).with_elements(["greeting", "name", "role"]);
        let schedule = group.schedule();
        assert_eq!(
            schedule,
            vec![
                (ElementId::from("greeting"), 300),
                (ElementId::from("name"), 400),
                (ElementId::from("role"), 500),
            ]
        );
        assert_eq!(group.delay_of(&ElementId::from("role")), Some(500));
        assert_eq!(group.delay_of(&ElementId::from("missing")), None);
    }

    #[test]
    fn test_reverse_and_center() {
        let reverse = StaggerGroup::new(0, 10).reverse();
        assert_eq!(reverse.delay_for_in(0, 4), 30);
        assert_eq!(reverse.delay_for_in(3, 4), 0);

        let center = StaggerGroup::new(0, 10).from_center();
        assert_eq!(center.delay_for_in(2, 5), 0);
        assert_eq!(center.delay_for_in(0, 5), 20);
        assert_eq!(center.delay_for_in(4, 5), 20);
    }

    #[test]
    fn test_limit_caps_index() {
        let group = StaggerGroup::new(0, 100).limit(2);
        assert_eq!(group.delay_for(1), 100);
        assert_eq!(group.delay_for(2), 200);
        assert_eq!(group.delay_for(9), 200);
    }
}
