use crate::{Tick, TimeSpan};

/// A monotonic clock counting the time since it was enabled.
pub trait Uptime<T: Tick> {
    /// Get whether the clock is counting.
    fn is_enabled(&self) -> bool;

    /// Get the current counter value of the underlying hardware timer.
    fn counter(&self) -> u32;

    /// Sample the uptime counter, returning the non-wrapping time since the uptime was enabled.
    fn now(&self) -> TimeSpan<T>;

    /// Get the uptime at which the hardware timer had the value `counter`.
    /// The counter value must have been captured within the last timer period.
    fn at(&self, counter: u32) -> TimeSpan<T>;
}
