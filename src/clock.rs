//! Injectable clock, shared by every component of one network.
//!
//! Timestamps are UNIX seconds. The clock is injected at network
//! construction instead of read from a process-wide static, so tests can
//! drive time deterministically with [`ManualClock`].

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Source of the current UNIX timestamp in seconds.
pub trait Clock: fmt::Debug {
    fn now(&self) -> i64;
}

/// Wall-clock time via chrono.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Settable clock for deterministic tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    current: Cell<i64>,
}

impl ManualClock {
    pub fn new(start: i64) -> Self {
        Self {
            current: Cell::new(start),
        }
    }

    pub fn set(&self, timestamp: i64) {
        self.current.set(timestamp);
    }

    pub fn advance(&self, secs: i64) {
        self.current.set(self.current.get() + secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.current.get()
    }
}

/// Cheaply cloneable handle to the clock a network was built with.
///
/// Single-threaded core: components hold `Rc`, never `Arc`.
#[derive(Debug, Clone)]
pub struct SharedClock(Rc<dyn Clock>);

impl SharedClock {
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self(Rc::new(clock))
    }

    /// Wrap an existing handle, e.g. a `Rc<ManualClock>` a test keeps
    /// around to advance time with.
    pub fn from_rc(clock: Rc<dyn Clock>) -> Self {
        Self(clock)
    }

    pub fn system() -> Self {
        Self::new(SystemClock)
    }

    pub fn now(&self) -> i64 {
        self.0.now()
    }
}

impl Default for SharedClock {
    fn default() -> Self {
        Self::system()
    }
}
