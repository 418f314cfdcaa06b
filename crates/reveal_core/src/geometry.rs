//! Element geometry
//!
//! All rectangles are in document coordinates: `y` grows downward from the
//! top of the page, and the viewport is a rectangle positioned at the current
//! scroll offset.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Handle the host uses to address an element
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ElementId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Element bounds after layout
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// X position (absolute, after layout)
    pub x: f32,
    /// Y position (absolute, after layout)
    pub y: f32,
    /// Computed width
    pub width: f32,
    /// Computed height
    pub height: f32,
}

impl Bounds {
    /// Create new bounds
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Check if a point is inside the bounds
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    /// Check if two bounds overlap
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Overlapping rectangle, if any
    pub fn intersection(&self, other: &Bounds) -> Option<Bounds> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return None;
        }
        Some(Bounds::new(x, y, right - x, bottom - y))
    }

    /// Fraction of this element's area that lies inside `root` (0.0 to 1.0)
    ///
    /// Zero-area elements report 1.0 when their origin is inside `root` and
    /// 0.0 otherwise, so collapsed elements can still trigger.
    pub fn intersection_ratio(&self, root: &Bounds) -> f32 {
        let area = self.area();
        if area <= 0.0 {
            return if root.contains(self.x, self.y) { 1.0 } else { 0.0 };
        }
        self.intersection(root)
            .map(|overlap| (overlap.area() / area).clamp(0.0, 1.0))
            .unwrap_or(0.0)
    }
}

/// The visible window onto the document
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Horizontal scroll offset
    pub scroll_x: f32,
    /// Vertical scroll offset
    pub scroll_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(scroll_x: f32, scroll_y: f32, width: f32, height: f32) -> Self {
        Self {
            scroll_x,
            scroll_y,
            width,
            height,
        }
    }

    /// Viewport rectangle in document coordinates
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.scroll_x, self.scroll_y, self.width, self.height)
    }

    /// Same viewport scrolled to a new vertical offset
    pub fn scrolled_to(self, scroll_y: f32) -> Self {
        Self { scroll_y, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersection_ratio_partial() {
        let root = Bounds::new(0.0, 0.0, 100.0, 100.0);
        let element = Bounds::new(0.0, 50.0, 100.0, 100.0);
        assert_eq!(element.intersection_ratio(&root), 0.5);
    }

    #[test]
    fn test_intersection_ratio_outside() {
        let root = Bounds::new(0.0, 0.0, 100.0, 100.0);
        let element = Bounds::new(0.0, 200.0, 100.0, 100.0);
        assert_eq!(element.intersection_ratio(&root), 0.0);
        assert!(!element.intersects(&root));
    }

    #[test]
    fn test_intersection_ratio_fully_inside() {
        let root = Bounds::new(0.0, 0.0, 100.0, 100.0);
        let element = Bounds::new(10.0, 10.0, 20.0, 20.0);
        assert_eq!(element.intersection_ratio(&root), 1.0);
    }

    #[test]
    fn test_zero_area_element() {
        let root = Bounds::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(Bounds::new(10.0, 10.0, 0.0, 0.0).intersection_ratio(&root), 1.0);
        assert_eq!(Bounds::new(10.0, 500.0, 0.0, 0.0).intersection_ratio(&root), 0.0);
    }

    #[test]
    fn test_viewport_scroll() {
        let viewport = Viewport::new(0.0, 0.0, 800.0, 600.0).scrolled_to(300.0);
        let element = Bounds::new(0.0, 800.0, 800.0, 200.0);
        assert_eq!(element.intersection_ratio(&viewport.bounds()), 0.5);
    }

    #[test]
    fn test_element_id_borrow() {
        let id = ElementId::from("hero");
        let map: std::collections::HashMap<ElementId, u32> = [(id.clone(), 1)].into();
        assert_eq!(map.get("hero"), Some(&1));
        assert_eq!(id.to_string(), "hero");
    }
}
