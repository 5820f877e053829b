use core::marker::PhantomData;

use embedded_hal::delay::DelayNs;

use crate::{Tick, TimeSpan, Uptime};

/// A busy-waiting delay on top of an uptime clock.
///
/// The clock must be read at least once per timer period
/// or have its overflow interrupt serviced while the delay spins.
pub struct Delay<'a, T: Tick, U: Uptime<T>> {
    uptime: &'a U,
    tick: PhantomData<T>,
}

impl<'a, T: Tick, U: Uptime<T>> Delay<'a, T, U> {
    pub fn new(uptime: &'a U) -> Self {
        Self {
            uptime,
            tick: PhantomData,
        }
    }

    /// Spin until at least `duration` has elapsed.
    ///
    /// Panics if the clock is disabled, as it would never advance.
    pub fn wait(&self, duration: TimeSpan<T>) {
        assert!(self.uptime.is_enabled());

        let start = self.uptime.now();
        while self.uptime.now() - start < duration {}
    }
}

impl<'a, T: Tick, U: Uptime<T>> DelayNs for Delay<'a, T, U> {
    fn delay_ns(&mut self, ns: u32) {
        // Round up to whole ticks.
        let ticks = (ns as u64 * T::FREQ as u64 + 999_999_999) / 1_000_000_000;
        self.wait(TimeSpan::from_ticks(ticks));
    }

    fn delay_us(&mut self, us: u32) {
        self.wait(TimeSpan::from_micros(us as u64));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.wait(TimeSpan::from_millis(ms as u64));
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::drivers::sim::SimHw;

    #[test]
    fn delay_us() {
        let hw = SimHw::new();
        let clock = hw.clock();
        clock.enable();
        hw.set_step(3);

        let start = clock.now();
        Delay::new(&clock).delay_us(1000);
        let elapsed = clock.now() - start;

        // 2000 ticks, give or take the ticks consumed by the surrounding reads.
        assert!(elapsed.0 >= 2000);
        assert!(elapsed.0 < 2000 + 10 * 3);
    }

    #[test]
    #[should_panic]
    fn delay_on_disabled_clock() {
        let hw = SimHw::new();
        let clock = hw.clock();
        hw.set_step(1);

        Delay::new(&clock).delay_us(10);
    }

    #[test]
    fn delay_ns_rounds_up_to_a_tick() {
        let hw = SimHw::new();
        let clock = hw.clock();
        clock.enable();
        hw.set_step(1);

        let start = clock.now();
        Delay::new(&clock).delay_ns(1);
        assert!((clock.now() - start).0 >= 1);
    }

    #[test]
    fn delay_across_many_overflows() {
        let hw = SimHw::new();
        let clock = hw.clock();
        clock.enable();
        // No interrupt is serviced, so every overflow must be picked up by the reads.
        hw.set_step(50);

        Delay::new(&clock).delay_ms(5);

        let now = clock.now();
        assert!(now.0 >= 10_000);
        assert_eq!(hw.elapsed(), now.0 + 50);
    }
}
