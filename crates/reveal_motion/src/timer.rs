//! Timer scheduler
//!
//! A host-driven monotonic clock with cancellable repeating tasks. The host
//! advances the clock from its event loop (frame callback, interval, test);
//! due tasks run synchronously inside that call.
//!
//! - A due task fires at most once per advance, however many intervals were
//!   skipped. Ticks can be late but are never duplicated.
//! - After firing, a task is re-armed at `now + interval`.
//! - Tasks fire in due-time order. A task cancelled by an earlier callback in
//!   the same advance does not fire.
//!
//! ```ignore
//! let scheduler = TimerScheduler::new();
//! let handle = scheduler.handle();
//!
//! let id = handle.schedule_repeating(100, || TimerControl::Continue);
//! scheduler.advance(100); // fires once
//! handle.cancel(id.unwrap());
//! ```

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a scheduled timer task
    pub struct TimerId;
}

/// What a task wants after it fired
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerControl {
    /// Re-arm for the next interval
    Continue,
    /// Release the task
    Stop,
}

/// Task body, invoked once per due tick
pub type TimerCallback = Box<dyn FnMut() -> TimerControl + Send>;

struct TimerTask {
    interval_ms: u64,
    next_due_ms: u64,
    /// Taken out while the callback runs
    callback: Option<TimerCallback>,
}

struct SchedulerInner {
    tasks: SlotMap<TimerId, TimerTask>,
    now_ms: u64,
}

/// Owner of the timer registry
///
/// Dropping the scheduler drops every task; outstanding [`TimerHandle`]s turn
/// into no-ops.
pub struct TimerScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
}

impl TimerScheduler {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                tasks: SlotMap::with_key(),
                now_ms: 0,
            })),
        }
    }

    /// Get a weak handle for registering tasks
    pub fn handle(&self) -> TimerHandle {
        TimerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Current clock value (ms)
    pub fn now_ms(&self) -> u64 {
        self.inner.lock().now_ms
    }

    /// Number of live tasks
    pub fn active_count(&self) -> usize {
        self.inner.lock().tasks.len()
    }

    /// Advance the clock by `dt_ms` and run due tasks
    ///
    /// Returns the number of task invocations.
    pub fn advance(&self, dt_ms: u64) -> usize {
        let now = self.inner.lock().now_ms.saturating_add(dt_ms);
        self.advance_to(now)
    }

    /// Move the clock to `now_ms` and run due tasks
    ///
    /// The clock never runs backwards; an earlier `now_ms` is ignored.
    pub fn advance_to(&self, now_ms: u64) -> usize {
        let mut due: Vec<(u64, TimerId)> = {
            let mut inner = self.inner.lock();
            if now_ms > inner.now_ms {
                inner.now_ms = now_ms;
            }
            let now = inner.now_ms;
            inner
                .tasks
                .iter()
                .filter(|(_, task)| task.next_due_ms <= now && task.callback.is_some())
                .map(|(id, task)| (task.next_due_ms, id))
                .collect()
        };
        due.sort_by_key(|(due_ms, _)| *due_ms);

        let mut fired = 0;
        for (_, id) in due {
            // The lock is released while the callback runs so it can cancel
            // or schedule tasks through a handle.
            let (mut callback, now) = {
                let mut inner = self.inner.lock();
                let now = inner.now_ms;
                match inner.tasks.get_mut(id).and_then(|task| task.callback.take()) {
                    Some(callback) => (callback, now),
                    None => continue,
                }
            };

            let control = callback();
            fired += 1;

            let mut inner = self.inner.lock();
            match control {
                TimerControl::Continue => {
                    if let Some(task) = inner.tasks.get_mut(id) {
                        task.callback = Some(callback);
                        task.next_due_ms = now.saturating_add(task.interval_ms);
                    }
                }
                TimerControl::Stop => {
                    inner.tasks.remove(id);
                }
            }
        }

        if fired > 0 {
            tracing::trace!("TimerScheduler: fired {} task(s)", fired);
        }
        fired
    }
}

impl Default for TimerScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// A weak handle to the timer scheduler
///
/// Passed to effects that need to schedule work. It won't keep the scheduler
/// alive.
#[derive(Clone)]
pub struct TimerHandle {
    inner: Weak<Mutex<SchedulerInner>>,
}

impl TimerHandle {
    /// Schedule `callback` every `interval_ms`, first firing one interval from now
    ///
    /// Returns `None` if the scheduler is gone.
    pub fn schedule_repeating<F>(&self, interval_ms: u32, callback: F) -> Option<TimerId>
    where
        F: FnMut() -> TimerControl + Send + 'static,
    {
        let interval_ms = u64::from(interval_ms.max(1));
        self.inner.upgrade().map(|inner| {
            let mut guard = inner.lock();
            let next_due_ms = guard.now_ms.saturating_add(interval_ms);
            guard.tasks.insert(TimerTask {
                interval_ms,
                next_due_ms,
                callback: Some(Box::new(callback)),
            })
        })
    }

    /// Cancel a task; returns whether it was still scheduled
    ///
    /// Idempotent. Cancelling a task from inside its own callback is allowed.
    pub fn cancel(&self, id: TimerId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.lock().tasks.remove(id).is_some())
            .unwrap_or(false)
    }

    /// Check whether a task is still registered
    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.lock().tasks.contains_key(id))
            .unwrap_or(false)
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl FnMut() -> TimerControl + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        (count, move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
            TimerControl::Continue
        })
    }

    #[test]
    fn test_fires_on_interval() {
        let scheduler = TimerScheduler::new();
        let (count, callback) = counter();
        scheduler.handle().schedule_repeating(10, callback).unwrap();

        assert_eq!(scheduler.advance(9), 0);
        assert_eq!(count.load(Ordering::SeqCst), 0);

        assert_eq!(scheduler.advance(1), 1);
        assert_eq!(scheduler.advance(10), 1);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_late_tick_not_duplicated() {
        let scheduler = TimerScheduler::new();
        let (count, callback) = counter();
        scheduler.handle().schedule_repeating(10, callback).unwrap();

        // Five intervals elapse in one step, but the task fires once
        assert_eq!(scheduler.advance(50), 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        // Re-armed relative to the late fire time
        assert_eq!(scheduler.advance(9), 0);
        assert_eq!(scheduler.advance(1), 1);
    }

    #[test]
    fn test_stop_releases_task() {
        let scheduler = TimerScheduler::new();
        let handle = scheduler.handle();
        let id = handle
            .schedule_repeating(5, || TimerControl::Stop)
            .unwrap();

        assert_eq!(scheduler.active_count(), 1);
        scheduler.advance(5);
        assert_eq!(scheduler.active_count(), 0);
        assert!(!handle.is_scheduled(id));
        assert_eq!(scheduler.advance(5), 0);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let scheduler = TimerScheduler::new();
        let handle = scheduler.handle();
        let (count, callback) = counter();
        let id = handle.schedule_repeating(10, callback).unwrap();

        assert!(handle.cancel(id));
        assert!(!handle.cancel(id));
        scheduler.advance(100);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_cancel_from_earlier_callback() {
        let scheduler = TimerScheduler::new();
        let handle = scheduler.handle();
        let (late_count, late_callback) = counter();

        let late = Arc::new(Mutex::new(None::<TimerId>));
        let late_clone = late.clone();
        let cancel_handle = handle.clone();
        handle
            .schedule_repeating(5, move || {
                if let Some(id) = *late_clone.lock() {
                    cancel_handle.cancel(id);
                }
                TimerControl::Stop
            })
            .unwrap();
        *late.lock() = handle.schedule_repeating(10, late_callback);

        // Both are due at t=10; the 5ms task is earlier and cancels the other
        assert_eq!(scheduler.advance(10), 1);
        assert_eq!(late_count.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.active_count(), 0);
    }

    #[test]
    fn test_clock_is_monotonic() {
        let scheduler = TimerScheduler::new();
        scheduler.advance_to(100);
        scheduler.advance_to(50);
        assert_eq!(scheduler.now_ms(), 100);
    }

    #[test]
    fn test_handle_weak_reference() {
        let handle = {
            let scheduler = TimerScheduler::new();
            scheduler.handle()
        };

        assert!(!handle.is_alive());
        assert!(handle
            .schedule_repeating(10, || TimerControl::Continue)
            .is_none());
    }
}
