//! Typewriter text reveal
//!
//! Reveals a source string one character per timer tick. Lengths count
//! Unicode scalar values, so a multi-byte character is revealed whole.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::timer::{TimerControl, TimerHandle, TimerId};

type CompletionCallback = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Default)]
struct TypewriterState {
    source: String,
    char_count: usize,
    revealed: usize,
    interval_ms: u32,
    timer: Option<TimerId>,
    completed: bool,
    completions: usize,
    /// Bumped on every start/cancel so stale ticks can tell they were superseded
    generation: u64,
}

impl TypewriterState {
    fn revealed_text(&self) -> &str {
        let end = self
            .source
            .char_indices()
            .nth(self.revealed)
            .map(|(byte, _)| byte)
            .unwrap_or(self.source.len());
        &self.source[..end]
    }
}

/// Character-by-character text reveal driven by a [`TimerHandle`]
///
/// ```ignore
/// let scheduler = TimerScheduler::new();
/// let typewriter = Typewriter::new(scheduler.handle());
/// typewriter.start("Software Developer", 100);
/// scheduler.advance(100);
/// assert_eq!(typewriter.revealed_text(), "S");
/// ```
pub struct Typewriter {
    timers: TimerHandle,
    shared: Arc<Mutex<TypewriterState>>,
    on_complete: Option<CompletionCallback>,
}

impl Typewriter {
    pub fn new(timers: TimerHandle) -> Self {
        Self {
            timers,
            shared: Arc::new(Mutex::new(TypewriterState::default())),
            on_complete: None,
        }
    }

    /// Invoke `callback` with the full text each time a reveal completes
    pub fn with_on_complete<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_complete = Some(Arc::new(callback));
        self
    }

    /// Start revealing `text`, superseding any reveal in progress
    pub fn start(&self, text: impl Into<String>, interval_ms: u32) {
        let text = text.into();
        let char_count = text.chars().count();

        let (previous, generation) = {
            let mut state = self.shared.lock();
            let previous = state.timer.take();
            state.generation = state.generation.wrapping_add(1);
            state.source = text;
            state.char_count = char_count;
            state.revealed = 0;
            state.interval_ms = interval_ms;
            state.completed = false;
            (previous, state.generation)
        };
        if let Some(id) = previous {
            self.timers.cancel(id);
        }

        if char_count == 0 {
            tracing::debug!("Typewriter: empty source, completing immediately");
            self.complete(generation);
            return;
        }

        let shared = Arc::clone(&self.shared);
        let on_complete = self.on_complete.clone();
        let id = self.timers.schedule_repeating(interval_ms, move || {
            let finished = {
                let mut state = shared.lock();
                if state.generation != generation {
                    return TimerControl::Stop;
                }
                state.revealed = (state.revealed + 1).min(state.char_count);
                tracing::trace!(
                    "Typewriter: revealed {}/{}",
                    state.revealed,
                    state.char_count
                );
                if state.revealed < state.char_count {
                    return TimerControl::Continue;
                }
                state.timer = None;
                state.completed = true;
                state.completions += 1;
                state.source.clone()
            };

            tracing::debug!("Typewriter: complete ({} chars)", char_count);
            if let Some(callback) = &on_complete {
                callback(&finished);
            }
            TimerControl::Stop
        });

        match id {
            Some(id) => {
                let mut state = self.shared.lock();
                if state.generation == generation && !state.completed {
                    state.timer = Some(id);
                }
            }
            None => tracing::warn!("Typewriter: timer scheduler is gone, reveal will not run"),
        }
    }

    /// Stop the reveal where it is; idempotent
    pub fn cancel(&self) {
        let previous = {
            let mut state = self.shared.lock();
            state.generation = state.generation.wrapping_add(1);
            state.timer.take()
        };
        if let Some(id) = previous {
            self.timers.cancel(id);
            tracing::debug!("Typewriter: cancelled");
        }
    }

    fn complete(&self, generation: u64) {
        let finished = {
            let mut state = self.shared.lock();
            if state.generation != generation {
                return;
            }
            state.timer = None;
            state.completed = true;
            state.completions += 1;
            state.source.clone()
        };
        if let Some(callback) = &self.on_complete {
            callback(&finished);
        }
    }

    /// The currently revealed prefix
    pub fn revealed_text(&self) -> String {
        self.shared.lock().revealed_text().to_owned()
    }

    /// Number of characters revealed so far
    pub fn revealed_len(&self) -> usize {
        self.shared.lock().revealed
    }

    pub fn source(&self) -> String {
        self.shared.lock().source.clone()
    }

    pub fn interval_ms(&self) -> u32 {
        self.shared.lock().interval_ms
    }

    /// Whether a reveal timer is currently scheduled
    pub fn is_running(&self) -> bool {
        self.shared.lock().timer.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.shared.lock().completed
    }

    /// Number of reveals that ran to completion
    pub fn completion_count(&self) -> usize {
        self.shared.lock().completions
    }
}

impl Drop for Typewriter {
    fn drop(&mut self) {
        self.cancel();
    }
}
