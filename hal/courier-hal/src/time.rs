//! Time source abstraction
//!
//! Used by drivers that need deadlines without depending on a specific
//! timer implementation.

/// Monotonic clock
///
/// Implementations must never go backwards. Wrapping is not expected
/// within the lifetime of the device (a `u64` of microseconds lasts
/// for over 500,000 years).
pub trait Clock {
    /// Microseconds since an arbitrary fixed point
    fn now_micros(&self) -> u64;

    /// Deadline `timeout_us` from now, saturating at `u64::MAX`
    fn deadline_after(&self, timeout_us: u64) -> u64 {
        self.now_micros().saturating_add(timeout_us)
    }

    /// Check whether `deadline` has been reached
    fn has_passed(&self, deadline: u64) -> bool {
        self.now_micros() >= deadline
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_micros(&self) -> u64 {
        (**self).now_micros()
    }
}
