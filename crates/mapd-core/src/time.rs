//! Simulation time model and wall-clock deadline abstraction.
//!
//! # Design
//!
//! Two unrelated notions of time coexist in the simulator and must never be
//! conflated:
//!
//! - **Simulated time** is a monotonically non-decreasing [`Tick`] counter.
//!   One tick is one synchronized grid step for every agent.  All schedule
//!   arithmetic is exact integer math.
//! - **Wall-clock time** bounds how long the fleet may *compute* before it
//!   must commit to a plan.  The deadline check reads it through the
//!   [`Clock`] trait so tests can substitute a scripted [`FakeClock`] and
//!   assert truncation behavior deterministically.

use std::fmt;
use std::time::Instant;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
///
/// Stored as `u64`; per-agent path buffers are indexed by tick, so the
/// effective range is bounded by the map's horizon, but the wide type keeps
/// arithmetic overflow out of the picture entirely.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Cast to `usize` for indexing a path buffer.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── Clock ─────────────────────────────────────────────────────────────────────

/// Source of elapsed wall-clock milliseconds since the run started.
///
/// The driver reads the clock once per loop iteration for the deadline check
/// and around each decision call for the computation-time statistics.  A
/// decision call is never interrupted mid-search; overshoot past the deadline
/// is bounded by the cost of one call.
pub trait Clock {
    /// Milliseconds elapsed since the last [`restart`](Clock::restart).
    fn elapsed_ms(&mut self) -> f64;

    /// Reset the zero point to "now".
    fn restart(&mut self);
}

/// Real wall-clock time via [`std::time::Instant`].
#[derive(Debug)]
pub struct WallClock {
    start: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WallClock {
    fn elapsed_ms(&mut self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1_000.0
    }

    fn restart(&mut self) {
        self.start = Instant::now();
    }
}

/// Scripted clock for tests: every read advances by a fixed step.
///
/// With `step_ms = 1.0` the n-th read returns `n` milliseconds, so a test can
/// pick a deadline that falls on an exact loop iteration.
#[derive(Debug, Clone)]
pub struct FakeClock {
    now_ms:  f64,
    step_ms: f64,
}

impl FakeClock {
    pub fn new(step_ms: f64) -> Self {
        Self { now_ms: 0.0, step_ms }
    }
}

impl Clock for FakeClock {
    fn elapsed_ms(&mut self) -> f64 {
        self.now_ms += self.step_ms;
        self.now_ms
    }

    fn restart(&mut self) {
        self.now_ms = 0.0;
    }
}
