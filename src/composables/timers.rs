use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;
use yew::prelude::*;
use yew_hooks::prelude::*;

/// A scheduled callback. Dropping it cancels the callback if it has not fired.
pub trait PendingTimer {}

impl PendingTimer for Timeout {}

/// Something that can run a callback once after a delay.
pub trait Scheduler {
    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Box<dyn PendingTimer>;
}

/// `setTimeout` through gloo.
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Box<dyn PendingTimer> {
        Box::new(Timeout::new(delay_ms, callback))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Default)]
struct Registry {
    next_id: u64,
    // Dropping the registry drops every pending timer, which cancels it.
    pending: HashMap<TimerHandle, Box<dyn PendingTimer>>,
}

/// Bookkeeping for delayed callbacks so they can be cancelled in bulk when the
/// owning view goes away. Clones share the same registry.
#[derive(Clone)]
pub struct Timers {
    registry: Rc<RefCell<Registry>>,
    scheduler: Rc<dyn Scheduler>,
}

/// Non-owning handle for callbacks that live inside the registry themselves.
#[derive(Clone)]
pub struct WeakTimers {
    registry: Weak<RefCell<Registry>>,
    scheduler: Rc<dyn Scheduler>,
}

impl WeakTimers {
    pub fn upgrade(&self) -> Option<Timers> {
        self.registry.upgrade().map(|registry| Timers {
            registry,
            scheduler: self.scheduler.clone(),
        })
    }
}

impl Timers {
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry::default())),
            scheduler,
        }
    }

    pub fn browser() -> Self {
        Self::new(Rc::new(BrowserScheduler))
    }

    pub fn downgrade(&self) -> WeakTimers {
        WeakTimers {
            registry: Rc::downgrade(&self.registry),
            scheduler: self.scheduler.clone(),
        }
    }

    /// Runs `callback` once after `delay_ms`. The handle leaves the registry
    /// right before the callback runs.
    pub fn set_timer(&self, callback: impl FnOnce() + 'static, delay_ms: u32) -> TimerHandle {
        let handle = {
            let mut registry = self.registry.borrow_mut();
            registry.next_id += 1;
            TimerHandle(registry.next_id)
        };

        let registry = Rc::downgrade(&self.registry);
        let pending = self.scheduler.schedule(
            delay_ms,
            Box::new(move || {
                let Some(registry) = registry.upgrade() else {
                    return;
                };
                let fired = registry.borrow_mut().pending.remove(&handle);
                if fired.is_none() {
                    return;
                }
                drop(fired);
                callback();
            }),
        );

        self.registry.borrow_mut().pending.insert(handle, pending);
        handle
    }

    /// Cancels `handle` if it is still pending. Unknown and fired handles are ignored.
    pub fn clear_timer(&self, handle: TimerHandle) {
        let removed = self.registry.borrow_mut().pending.remove(&handle);
        drop(removed);
    }

    pub fn clear_all_timers(&self) {
        let drained: Vec<_> = self.registry.borrow_mut().pending.drain().collect();
        if !drained.is_empty() {
            log::debug!("Cancelling {} pending timer(s)", drained.len());
        }
        // Dropping a cancelled callback runs its captured destructors, which
        // may reach back into the registry.
        drop(drained);
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.registry.borrow().pending.contains_key(&handle)
    }

    pub fn pending_count(&self) -> usize {
        self.registry.borrow().pending.len()
    }
}

/// Browser timers that are all cancelled when the calling component unmounts.
#[hook]
pub fn use_timers() -> Timers {
    let timers = use_memo(|_| Timers::browser(), ());
    {
        let timers = timers.clone();
        use_unmount(move || timers.clear_all_timers());
    }
    (*timers).clone()
}


#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::testing::ManualClock;
    use super::*;

    fn counter() -> (Rc<Cell<u32>>, impl Fn() -> Box<dyn FnOnce()>) {
        let hits = Rc::new(Cell::new(0));
        let make = {
            let hits = hits.clone();
            move || {
                let hits = hits.clone();
                Box::new(move || hits.set(hits.get() + 1)) as Box<dyn FnOnce()>
            }
        };
        (hits, make)
    }

    #[test]
    fn fires_once_after_delay_and_leaves_registry() {
        let clock = ManualClock::new();
        let timers = Timers::new(clock.clone());
        let (hits, make) = counter();

        let handle = timers.set_timer(make(), 500);
        assert!(timers.is_pending(handle));

        clock.advance(499);
        assert_eq!(hits.get(), 0);
        assert!(timers.is_pending(handle));

        clock.advance(1);
        assert_eq!(hits.get(), 1);
        assert!(!timers.is_pending(handle));
        assert_eq!(timers.pending_count(), 0);

        clock.advance(10_000);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn clear_timer_cancels_only_that_timer() {
        let clock = ManualClock::new();
        let timers = Timers::new(clock.clone());
        let (hits, make) = counter();

        let first = timers.set_timer(make(), 100);
        timers.set_timer(make(), 200);
        timers.clear_timer(first);

        clock.advance(300);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn clear_all_timers_stops_every_callback() {
        let clock = ManualClock::new();
        let timers = Timers::new(clock.clone());
        let (hits, make) = counter();

        for delay in [0, 10, 1000] {
            timers.set_timer(make(), delay);
        }
        timers.clear_all_timers();

        assert_eq!(timers.pending_count(), 0);
        assert_eq!(clock.scheduled_count(), 0);
        clock.advance(5000);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn stale_and_unknown_handles_are_ignored() {
        let clock = ManualClock::new();
        let timers = Timers::new(clock.clone());
        let other = Timers::new(clock.clone());
        let (hits, make) = counter();

        let fired = timers.set_timer(make(), 1);
        clock.advance(1);
        timers.clear_timer(fired);
        timers.clear_timer(fired);

        let foreign = other.set_timer(make(), 1);
        let kept = timers.set_timer(make(), 5);
        timers.clear_timer(foreign);
        other.clear_all_timers();

        clock.advance(10);
        assert_eq!(hits.get(), 2);
        assert!(!timers.is_pending(kept));
    }

    #[test]
    fn fires_in_delay_order() {
        let clock = ManualClock::new();
        let timers = Timers::new(clock.clone());
        let order = Rc::new(RefCell::new(Vec::new()));

        for (label, delay) in [("slow", 300), ("fast", 100), ("mid", 200)] {
            let order = order.clone();
            timers.set_timer(move || order.borrow_mut().push(label), delay);
        }
        clock.advance(1000);

        assert_eq!(*order.borrow(), vec!["fast", "mid", "slow"]);
    }

    #[test]
    fn callback_can_schedule_follow_up() {
        let clock = ManualClock::new();
        let timers = Timers::new(clock.clone());
        let fired_at = Rc::new(Cell::new(0));

        let weak = timers.downgrade();
        let clock_in_cb = clock.clone();
        let fired_at_cb = fired_at.clone();
        timers.set_timer(
            move || {
                if let Some(timers) = weak.upgrade() {
                    timers.set_timer(move || fired_at_cb.set(clock_in_cb.now()), 50);
                }
            },
            100,
        );

        clock.advance(1000);
        assert_eq!(fired_at.get(), 150);
        assert_eq!(timers.pending_count(), 0);
    }

    #[test]
    fn dropping_last_handle_cancels_pending() {
        let clock = ManualClock::new();
        let (hits, make) = counter();
        {
            let timers = Timers::new(clock.clone());
            timers.set_timer(make(), 100);
        }
        clock.advance(200);
        assert_eq!(hits.get(), 0);
    }
}
