//! A simulated 8-bit timer for running the uptime clock on the host.
//!
//! The timer only advances when told to, which makes it possible to
//! reproduce the exact interleavings between counter wraps, reads and the overflow interrupt.

use std::{cell::Cell, rc::Rc};

use crate::{interrupt::Interrupts, Tick, UptimeCounter, UptimeDrv, UptimeOverflow};

/// A 2 MHz tick, i.e. 16 MHz with a prescaler of 8.
pub struct SimTick;

impl Tick for SimTick {
    const FREQ: u32 = 2_000_000;
}

/// The uptime clock running on the simulated timer.
pub type SimClock = UptimeDrv<SimTick, SimCounter, SimOverflow, SimInterrupts>;

/// The simulated timer peripheral.
#[derive(Default)]
pub struct SimHw {
    /// The 8-bit counter register.
    register: Cell<u8>,
    /// The latched overflow flag.
    flag: Cell<bool>,
    int_enabled: Cell<bool>,
    running: Cell<bool>,
    /// The number of ticks since the counter was last reset.
    elapsed: Cell<u64>,
    /// The number of ticks to advance after each counter read.
    step: Cell<u32>,
    wrap_on_next_read: Cell<bool>,
}

pub struct SimCounter(Rc<SimHw>);
pub struct SimOverflow(Rc<SimHw>);

impl SimHw {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Create a clock backed by this timer.
    pub fn clock(self: &Rc<Self>) -> SimClock {
        UptimeDrv::new(SimCounter(self.clone()), SimOverflow(self.clone()))
    }

    /// Let `ticks` ticks pass.
    pub fn advance(&self, ticks: u32) {
        for _ in 0..ticks {
            let (next, wrapped) = self.register.get().overflowing_add(1);
            self.register.set(next);
            if wrapped {
                self.flag.set(true);
            }
        }
        self.elapsed.set(self.elapsed.get() + ticks as u64);
    }

    /// Let `ticks` ticks pass after every read of the counter register.
    pub fn set_step(&self, ticks: u32) {
        self.step.set(ticks);
    }

    /// Make the counter wrap right after the next read of the counter register.
    /// The counter must be at its maximum value.
    pub fn wrap_on_next_read(&self) {
        assert_eq!(u8::MAX, self.register.get());
        self.wrap_on_next_read.set(true);
    }

    pub fn register(&self) -> u8 {
        self.register.get()
    }

    pub fn elapsed(&self) -> u64 {
        self.elapsed.get()
    }

    pub fn is_flag_set(&self) -> bool {
        self.flag.get()
    }

    pub fn is_int_enabled(&self) -> bool {
        self.int_enabled.get()
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Enter the overflow interrupt vector if the interrupt is pending, unmasked and global interrupts are enabled.
    /// Entering the vector clears the overflow flag, as on the AVR.
    /// The caller is responsible for running the handler if this returns true.
    pub fn enter_overflow_vector(&self) -> bool {
        let entered = self.flag.get() && self.int_enabled.get() && SimInterrupts::is_enabled();
        if entered {
            self.flag.set(false);
        }
        entered
    }
}

impl UptimeCounter<SimTick> for SimCounter {
    fn start(&self) {
        self.0.running.set(true);
    }

    fn reset(&self) {
        self.0.register.set(0);
        self.0.elapsed.set(0);
    }

    fn value(&self) -> u32 {
        let value = self.0.register.get();
        if self.0.wrap_on_next_read.replace(false) {
            self.0.advance(1);
        }
        self.0.advance(self.0.step.get());
        value as u32
    }
}

impl UptimeOverflow for SimOverflow {
    const MAX: u32 = 0xFF;

    fn overflow_int_enable(&self) {
        self.0.int_enabled.set(true);
    }

    fn overflow_int_disable(&self) {
        self.0.int_enabled.set(false);
    }

    fn is_pending_overflow(&self) -> bool {
        self.0.flag.get()
    }

    fn clear_pending_overflow(&self) {
        self.0.flag.set(false);
    }
}

std::thread_local! {
    static INTERRUPTS_ENABLED: Cell<bool> = Cell::new(true);
}

/// Global interrupt control of the simulated core, one per thread.
pub struct SimInterrupts;

impl SimInterrupts {
    pub fn is_enabled() -> bool {
        INTERRUPTS_ENABLED.with(|enabled| enabled.get())
    }

    pub fn set_enabled(enabled: bool) {
        INTERRUPTS_ENABLED.with(|cell| cell.set(enabled));
    }
}

impl Interrupts for SimInterrupts {
    type State = bool;

    fn save_and_disable() -> bool {
        INTERRUPTS_ENABLED.with(|enabled| enabled.replace(false))
    }

    unsafe fn restore(state: bool) {
        Self::set_enabled(state);
    }
}
