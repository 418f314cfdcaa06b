//! Scroll progress mapping
//!
//! Maps an absolute scroll offset into a clamped progress value over an input
//! range, then interpolates that progress into named output channels.
//! Progress is always derived fresh from the absolute offset, never
//! accumulated, so repeated samples cannot drift.
//!
//! ```ignore
//! let range = ScrollRange::from_element(
//!     &about_bounds,
//!     viewport.height,
//!     ScrollAnchor::START_END,
//!     ScrollAnchor::END_END,
//! )?;
//! let mapper = ScrollProgressMapper::new("about", range)
//!     .channel(Channel::OPACITY, ChannelMapping::new(0.4, 1.0).over(0.0, 0.5))
//!     .channel(Channel::SCALE, ChannelMapping::new(0.8, 1.0).over(0.0, 0.5));
//!
//! let sample = mapper.sample(viewport.scroll_y);
//! let opacity = sample.get(&Channel::OPACITY);
//! ```

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use reveal_core::{Bounds, ElementId, Error, Result};
use serde::{Deserialize, Serialize};

/// Scroll offsets over which progress runs from 0 to 1
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawScrollRange")]
pub struct ScrollRange {
    start: f32,
    end: f32,
}

/// Unchecked wire form of [`ScrollRange`]
#[derive(Deserialize)]
struct RawScrollRange {
    start: f32,
    end: f32,
}

impl TryFrom<RawScrollRange> for ScrollRange {
    type Error = Error;

    fn try_from(raw: RawScrollRange) -> Result<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl ScrollRange {
    /// Create a range; both bounds must be finite and `start` must not be
    /// after `end`
    pub fn new(start: f32, end: f32) -> Result<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(Error::NonFiniteScrollRange { start, end });
        }
        if start > end {
            return Err(Error::InvertedScrollRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Degenerate range that flips to 1 once `offset` reaches `at`
    ///
    /// A non-finite `at` collapses to 0.
    pub fn at(at: f32) -> Self {
        let at = if at.is_finite() { at } else { 0.0 };
        Self { start: at, end: at }
    }

    /// Range in which an element travels between two anchor alignments
    ///
    /// `bounds` are in document coordinates; the returned offsets are the
    /// scroll positions at which each anchor lines up.
    pub fn from_element(
        bounds: &Bounds,
        viewport_height: f32,
        start: ScrollAnchor,
        end: ScrollAnchor,
    ) -> Result<Self> {
        Self::new(
            start.scroll_offset(bounds, viewport_height),
            end.scroll_offset(bounds, viewport_height),
        )
    }

    pub fn start(&self) -> f32 {
        self.start
    }

    pub fn end(&self) -> f32 {
        self.end
    }

    /// Clamped progress for an absolute scroll offset
    ///
    /// A degenerate range reads 1 once `offset >= start` and 0 before.
    /// `+inf` reads 1, `-inf` and NaN read 0.
    pub fn progress(&self, offset: f32) -> f32 {
        if offset.is_nan() {
            return 0.0;
        }
        if offset <= self.start {
            return if offset >= self.end { 1.0 } else { 0.0 };
        }
        if offset >= self.end {
            return 1.0;
        }
        let ratio = (offset - self.start) / (self.end - self.start);
        if ratio.is_nan() {
            0.0
        } else {
            ratio.clamp(0.0, 1.0)
        }
    }
}

/// Edge of an element or of the viewport
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Start,
    Center,
    End,
}

impl Edge {
    fn fraction(self) -> f32 {
        match self {
            Edge::Start => 0.0,
            Edge::Center => 0.5,
            Edge::End => 1.0,
        }
    }
}

impl FromStr for Edge {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "start" => Ok(Edge::Start),
            "center" => Ok(Edge::Center),
            "end" => Ok(Edge::End),
            other => Err(Error::InvalidAnchor(other.to_string())),
        }
    }
}

/// Alignment of an element edge with a viewport edge
///
/// `"start end"` means the element's top meets the viewport's bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollAnchor {
    pub element: Edge,
    pub viewport: Edge,
}

impl ScrollAnchor {
    /// Element top meets viewport bottom (element starts entering)
    pub const START_END: ScrollAnchor = ScrollAnchor::new(Edge::Start, Edge::End);
    /// Element bottom meets viewport bottom (element fully entered)
    pub const END_END: ScrollAnchor = ScrollAnchor::new(Edge::End, Edge::End);
    /// Element top meets viewport top
    pub const START_START: ScrollAnchor = ScrollAnchor::new(Edge::Start, Edge::Start);
    /// Element bottom meets viewport top (element fully left)
    pub const END_START: ScrollAnchor = ScrollAnchor::new(Edge::End, Edge::Start);

    pub const fn new(element: Edge, viewport: Edge) -> Self {
        Self { element, viewport }
    }

    /// Scroll offset at which this alignment holds
    pub fn scroll_offset(&self, bounds: &Bounds, viewport_height: f32) -> f32 {
        bounds.y + self.element.fraction() * bounds.height
            - self.viewport.fraction() * viewport_height
    }
}

impl FromStr for ScrollAnchor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(element), Some(viewport), None) => Ok(Self::new(
                element.parse().map_err(|_| Error::InvalidAnchor(s.to_string()))?,
                viewport.parse().map_err(|_| Error::InvalidAnchor(s.to_string()))?,
            )),
            _ => Err(Error::InvalidAnchor(s.to_string())),
        }
    }
}

/// Name of an output channel
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Channel(Cow<'static, str>);

impl Channel {
    pub const OPACITY: Channel = Channel(Cow::Borrowed("opacity"));
    pub const SCALE: Channel = Channel(Cow::Borrowed("scale"));
    pub const TRANSLATE_X: Channel = Channel(Cow::Borrowed("translate_x"));
    pub const TRANSLATE_Y: Channel = Channel(Cow::Borrowed("translate_y"));

    /// Custom channel name
    pub fn named(name: impl Into<String>) -> Self {
        Channel(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Interpolation from progress into one channel's output range
///
/// By default the whole progress range `[0, 1]` maps onto `[from, to]`.
/// [`over`](Self::over) narrows the driving progress window; outside it the
/// value holds at the nearest end.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelMapping {
    pub from: f32,
    pub to: f32,
    pub progress_from: f32,
    pub progress_to: f32,
}

impl ChannelMapping {
    pub fn new(from: f32, to: f32) -> Self {
        Self {
            from,
            to,
            progress_from: 0.0,
            progress_to: 1.0,
        }
    }

    /// Drive this channel from a sub-window of progress
    ///
    /// A NaN bound falls back to the full window's bound.
    pub fn over(mut self, progress_from: f32, progress_to: f32) -> Self {
        self.progress_from = if progress_from.is_nan() {
            0.0
        } else {
            progress_from.clamp(0.0, 1.0)
        };
        self.progress_to = if progress_to.is_nan() {
            1.0
        } else {
            progress_to.clamp(0.0, 1.0)
        };
        self
    }

    /// Output value at a given progress
    pub fn value_at(&self, progress: f32) -> f32 {
        let local = if self.progress_to <= self.progress_from {
            if progress >= self.progress_from {
                1.0
            } else {
                0.0
            }
        } else {
            let ratio = (progress - self.progress_from) / (self.progress_to - self.progress_from);
            if ratio.is_nan() {
                0.0
            } else {
                ratio.clamp(0.0, 1.0)
            }
        };
        self.from + local * (self.to - self.from)
    }
}

/// One evaluation of a mapper
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ScrollSample {
    pub progress: f32,
    pub values: IndexMap<Channel, f32>,
}

impl ScrollSample {
    pub fn get(&self, channel: &Channel) -> Option<f32> {
        self.values.get(channel).copied()
    }
}

/// Binds an element's scroll range to output channels
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollProgressMapper {
    element: ElementId,
    range: ScrollRange,
    channels: IndexMap<Channel, ChannelMapping>,
}

impl ScrollProgressMapper {
    pub fn new(element: impl Into<ElementId>, range: ScrollRange) -> Self {
        Self {
            element: element.into(),
            range,
            channels: IndexMap::new(),
        }
    }

    /// Add or replace an output channel
    pub fn channel(mut self, channel: Channel, mapping: ChannelMapping) -> Self {
        self.channels.insert(channel, mapping);
        self
    }

    pub fn element(&self) -> &ElementId {
        &self.element
    }

    pub fn range(&self) -> ScrollRange {
        self.range
    }

    /// Replace the input range, e.g. after the element was laid out again
    pub fn set_range(&mut self, range: ScrollRange) {
        tracing::debug!(
            "scroll binding {}: range {:.1}..{:.1}",
            self.element,
            range.start(),
            range.end()
        );
        self.range = range;
    }

    /// Recompute the input range from fresh element geometry
    pub fn rebind(
        &mut self,
        bounds: &Bounds,
        viewport_height: f32,
        start: ScrollAnchor,
        end: ScrollAnchor,
    ) -> Result<()> {
        self.set_range(ScrollRange::from_element(bounds, viewport_height, start, end)?);
        Ok(())
    }

    /// Evaluate every channel at an absolute scroll offset
    pub fn sample(&self, offset: f32) -> ScrollSample {
        let progress = self.range.progress(offset);
        let values = self
            .channels
            .iter()
            .map(|(channel, mapping)| (channel.clone(), mapping.value_at(progress)))
            .collect();
        ScrollSample { progress, values }
    }
}
