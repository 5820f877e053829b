use core::{cell::Cell, marker::PhantomData};

use crate::{
    interrupt::{CriticalSection, Interrupts, Mutex},
    Tick, TimeSpan, Uptime, UptimeCounter, UptimeOverflow,
};

/// The software half of the clock.
struct ClockState {
    /// The number of timer overflows since the clock was enabled.
    overflows: Cell<u32>,
    enabled: Cell<bool>,
}

/// An uptime clock extending a narrow hardware counter with a software overflow count.
///
/// The clock is shared between foreground code and the overflow interrupt handler,
/// which must call [`UptimeDrv::on_overflow`] once per overflow interrupt.
/// All shared state is accessed either from that handler or inside a critical section.
///
/// Every critical section in the system, including the one taken by [`UptimeDrv::read`],
/// must be shorter than one timer period. Otherwise a second overflow may go unnoticed.
pub struct UptimeDrv<T: Tick, Cnt: UptimeCounter<T>, Ovf: UptimeOverflow, I: Interrupts> {
    tick: PhantomData<T>,
    counter: Cnt,
    overflow: Ovf,
    state: Mutex<ClockState>,
    interrupts: PhantomData<I>,
}

// The state is only touched from the overflow interrupt or inside a critical section.
unsafe impl<T, Cnt, Ovf, I> Sync for UptimeDrv<T, Cnt, Ovf, I>
where
    T: Tick,
    Cnt: UptimeCounter<T> + Sync,
    Ovf: UptimeOverflow + Sync,
    I: Interrupts,
{
}

impl<T, Cnt, Ovf, I> UptimeDrv<T, Cnt, Ovf, I>
where
    T: Tick,
    Cnt: UptimeCounter<T>,
    Ovf: UptimeOverflow,
    I: Interrupts,
{
    /// Create a new, disabled uptime clock.
    pub const fn new(counter: Cnt, overflow: Ovf) -> Self {
        Self {
            tick: PhantomData,
            counter,
            overflow,
            state: Mutex::new(ClockState {
                overflows: Cell::new(0),
                enabled: Cell::new(false),
            }),
            interrupts: PhantomData,
        }
    }

    /// Start counting from zero.
    ///
    /// Enabling an already enabled clock restarts it and discards the accumulated time.
    pub fn enable(&self) {
        let cs = CriticalSection::<I>::enter();
        let state = self.state.borrow(&cs);

        self.counter.start();
        self.counter.reset();

        // The counter has been free-running while disabled, so an old overflow may be latched.
        self.overflow.clear_pending_overflow();

        state.overflows.set(0);
        state.enabled.set(true);

        self.overflow.overflow_int_enable();
    }

    /// Stop counting.
    /// The hardware counter keeps running, but its overflows are no longer counted.
    pub fn disable(&self) {
        let cs = CriticalSection::<I>::enter();
        let state = self.state.borrow(&cs);

        self.overflow.overflow_int_disable();

        state.overflows.set(0);
        state.enabled.set(false);
    }

    /// Get the number of microseconds elapsed since the clock was enabled.
    /// A disabled clock reads zero.
    #[inline]
    pub fn read(&self) -> u64 {
        self.now().total_micros()
    }

    /// Count one timer overflow.
    ///
    /// This must be called from the timer overflow interrupt handler, and only from there.
    #[inline]
    pub fn on_overflow(&self) {
        let cs = CriticalSection::<I>::enter();
        let overflows = &self.state.borrow(&cs).overflows;
        overflows.set(overflows.get().wrapping_add(1));
    }

    /// Get the number of overflows counted since the clock was enabled.
    pub fn overflows(&self) -> u32 {
        let cs = CriticalSection::<I>::enter();
        self.state.borrow(&cs).overflows.get()
    }

    /// Take a consistent `(overflows, counter)` snapshot, or `None` if the clock is disabled.
    fn sample(&self) -> Option<(u32, u32)> {
        // Neither the overflow interrupt nor any other thread can run while the snapshot is taken,
        // but the hardware counter keeps running underneath and may wrap at any time.
        let cs = CriticalSection::<I>::enter();
        let state = self.state.borrow(&cs);

        if !state.enabled.get() {
            return None;
        }

        let mut cnt = self.counter.value();

        if self.overflow.is_pending_overflow() {
            // The counter has overflowed but the interrupt has not yet been serviced.
            // `cnt` may have been read either just before or just after the wrap,
            // so read it again to be sure that it belongs to the new period.
            cnt = self.counter.value();

            // Count the overflow here and clear the flag,
            // so that the pending interrupt does not count it again.
            state.overflows.set(state.overflows.get().wrapping_add(1));
            self.overflow.clear_pending_overflow();
        }

        Some((state.overflows.get(), cnt))
    }

    #[inline]
    fn ticks((overflows, counter): (u32, u32)) -> u64 {
        overflows as u64 * Ovf::PERIOD + counter as u64
    }
}

impl<T, Cnt, Ovf, I> Uptime<T> for UptimeDrv<T, Cnt, Ovf, I>
where
    T: Tick,
    Cnt: UptimeCounter<T>,
    Ovf: UptimeOverflow,
    I: Interrupts,
{
    fn is_enabled(&self) -> bool {
        let cs = CriticalSection::<I>::enter();
        self.state.borrow(&cs).enabled.get()
    }

    #[inline]
    fn counter(&self) -> u32 {
        self.counter.value()
    }

    #[inline]
    fn now(&self) -> TimeSpan<T> {
        match self.sample() {
            Some(sample) => TimeSpan::from_ticks(Self::ticks(sample)),
            None => TimeSpan::ZERO,
        }
    }

    fn at(&self, counter: u32) -> TimeSpan<T> {
        let sample = match self.sample() {
            Some(sample) => sample,
            None => return TimeSpan::ZERO,
        };
        let now = Self::ticks(sample);
        let delta = if counter <= sample.1 {
            (sample.1 - counter) as u64
        } else {
            sample.1 as u64 + Ovf::PERIOD - counter as u64
        };
        TimeSpan::from_ticks(now.saturating_sub(delta))
    }
}
