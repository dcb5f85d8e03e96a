//! Time abstraction traits for platform-agnostic timing.
//!
//! Also provides [`Millis`], a wrapping 32-bit millisecond clock value that
//! matches the free-running tick counter most microcontroller HALs expose.

/// Trait for abstracting time sources.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    ///
    /// Called from the transition handler, so it must be cheap and must not
    /// block.
    fn now(&self) -> I;
}

/// Trait abstraction for duration types.
pub trait TimeDuration: Copy + PartialEq {
    /// Zero duration constant.
    const ZERO: Self;

    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;

    /// Creates duration from milliseconds.
    fn from_millis(millis: u64) -> Self;
}

/// Trait abstraction for instant types.
pub trait TimeInstant: Copy {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    ///
    /// Implementations backed by a wrapping counter should use wrapping
    /// arithmetic so that an interval spanning the wrap is still measured
    /// correctly.
    fn duration_since(&self, earlier: Self) -> Self::Duration;
}

/// Millisecond duration paired with [`Millis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MillisDuration(pub u32);

impl TimeDuration for MillisDuration {
    const ZERO: Self = MillisDuration(0);

    fn as_millis(&self) -> u64 {
        self.0 as u64
    }

    fn from_millis(millis: u64) -> Self {
        // Saturate rather than truncate so an oversized hold threshold stays huge.
        MillisDuration(u32::try_from(millis).unwrap_or(u32::MAX))
    }
}

/// Millisecond timestamp from a free-running 32-bit counter.
///
/// Wraps after ~49.7 days. Elapsed time is computed with wrapping
/// subtraction, so intervals shorter than the wrap period are always exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Millis(pub u32);

impl Millis {
    /// Returns the raw counter value.
    pub fn as_millis(&self) -> u32 {
        self.0
    }
}

impl TimeInstant for Millis {
    type Duration = MillisDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        MillisDuration(self.0.wrapping_sub(earlier.0))
    }
}
