//! Transition descriptors
//!
//! A transition says how long a state change takes to play out once it has
//! been decided. The host drives the actual interpolation; `progress_at` is
//! provided for hosts that sample on their own clock.

use serde::{Deserialize, Serialize};

use crate::easing::Easing;

/// Duration, delay and curve of one state change
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub duration_ms: u32,
    pub delay_ms: u32,
    pub easing: Easing,
}

impl Transition {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            duration_ms,
            delay_ms: 0,
            easing: Easing::Linear,
        }
    }

    /// Standard section reveal (600ms, out-quint)
    pub fn reveal() -> Self {
        Self::new(600).with_easing(Easing::OUT_QUINT)
    }

    /// Card/list item entry (500ms, out-quint)
    pub fn card() -> Self {
        Self::new(500).with_easing(Easing::OUT_QUINT)
    }

    pub fn with_delay(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Total time until the transition settles
    pub fn total_ms(&self) -> u32 {
        self.delay_ms.saturating_add(self.duration_ms)
    }

    /// Eased progress `elapsed_ms` after the transition was triggered
    pub fn progress_at(&self, elapsed_ms: f32) -> f32 {
        let active = elapsed_ms - self.delay_ms as f32;
        if active.is_nan() || active < 0.0 {
            return 0.0;
        }
        if self.duration_ms == 0 {
            return 1.0;
        }
        self.easing
            .apply((active / self.duration_ms as f32).clamp(0.0, 1.0))
    }

    pub fn is_finished_at(&self, elapsed_ms: f32) -> bool {
        elapsed_ms >= self.total_ms() as f32
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::reveal()
    }
}
