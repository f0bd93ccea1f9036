//! Clock signal generator.
//!
//! A clock owns its subscribers and hands back typed [`Handle`]s so callers
//! can keep driving inputs between ticks. Each simulation builds its own
//! clock; there is no global instance.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use crate::seq::Sequential;

/// A sequential component the clock can own and hand back by type.
pub trait Component: Sequential + Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Sequential + Any> Component for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Source of per-clock identities, so handles never resolve on another clock.
static NEXT_CLOCK_ID: AtomicU64 = AtomicU64::new(0);

/// Typed reference to a component owned by a [`Clock`].
pub struct Handle<T> {
    clock: u64,
    index: usize,
    marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    /// Position in the subscriber order.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}:{})", self.clock, self.index)
    }
}

/// Two-phase clock.
///
/// One [`tick`](Clock::tick) delivers a rising edge to every subscriber in
/// registration order, then a falling edge in the same order.
pub struct Clock {
    id: u64,
    elapsed_ticks: u64,
    level: bool,
    subscribers: Vec<Box<dyn Component>>,
}

impl Clock {
    /// Create a clock at level 0 with no subscribers.
    pub fn new() -> Self {
        Self {
            id: NEXT_CLOCK_ID.fetch_add(1, Ordering::Relaxed),
            elapsed_ticks: 0,
            level: false,
            subscribers: Vec::new(),
        }
    }

    /// Take ownership of a component and return its handle.
    pub fn subscribe<T: Sequential + 'static>(&mut self, component: T) -> Handle<T> {
        let index = self.subscribers.len();
        self.subscribers.push(Box::new(component));
        Handle { clock: self.id, index, marker: PhantomData }
    }

    /// Subscribe several components, keeping their order.
    pub fn subscribe_all<T, I>(&mut self, components: I) -> Vec<Handle<T>>
    where
        T: Sequential + 'static,
        I: IntoIterator<Item = T>,
    {
        components.into_iter().map(|c| self.subscribe(c)).collect()
    }

    /// Borrow a subscribed component. `None` for a handle issued by
    /// another clock.
    pub fn get<T: Sequential + 'static>(&self, handle: Handle<T>) -> Option<&T> {
        if handle.clock != self.id {
            return None;
        }
        self.subscribers.get(handle.index)?.as_any().downcast_ref()
    }

    /// Mutably borrow a subscribed component, e.g. to set its inputs.
    pub fn get_mut<T: Sequential + 'static>(&mut self, handle: Handle<T>) -> Option<&mut T> {
        if handle.clock != self.id {
            return None;
        }
        self.subscribers.get_mut(handle.index)?.as_any_mut().downcast_mut()
    }

    /// Advance by one full cycle: rising edge, then falling edge.
    pub fn tick(&mut self) {
        self.edge(true);
        self.edge(false);
        self.elapsed_ticks += 1;
    }

    /// Advance by `ticks` full cycles.
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    fn edge(&mut self, level: bool) {
        self.level = level;
        log::trace!(
            "tick {}: {} edge to {} subscribers",
            self.elapsed_ticks,
            if level { "rising" } else { "falling" },
            self.subscribers.len()
        );
        for subscriber in &mut self.subscribers {
            subscriber.on_clock(level);
        }
    }

    /// Completed cycles. Diagnostic only.
    #[inline]
    pub fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks
    }

    /// Current level (always 0 between ticks).
    #[inline]
    pub fn level(&self) -> bool {
        self.level
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clock")
            .field("id", &self.id)
            .field("elapsed_ticks", &self.elapsed_ticks)
            .field("level", &self.level)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
