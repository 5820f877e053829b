//! Microsecond uptime on top of an 8-bit hardware timer.
//!
//! The hardware counter is extended by a software count of its overflows,
//! which is maintained by the overflow interrupt and by the read path itself
//! when it observes an overflow that the interrupt has not handled yet.
//!
//! On the ATmega2560 (features `atmega2560` and `rt`):
//!
//! ```ignore
//! let dp = avr_device::atmega2560::Peripherals::take().unwrap();
//! let uptime = micros_uptime::drivers::atmega2560::take(dp.TC2);
//!
//! uptime.enable();
//! unsafe { avr_device::interrupt::enable() };
//!
//! let start = uptime.read();
//! // ...
//! let elapsed_us = uptime.read() - start;
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![cfg_attr(
    all(target_arch = "avr", feature = "rt"),
    feature(abi_avr_interrupt)
)]

mod adapters;
mod delay;
pub mod drivers;
pub mod interrupt;
mod sleep;
mod stopwatch;
mod timespan;
mod uptime;
mod uptime_drv;

pub use self::{
    adapters::tick::Tick,
    adapters::uptime::{UptimeCounter, UptimeOverflow},
    delay::Delay,
    sleep::sleep,
    stopwatch::Stopwatch,
    timespan::{TimeSpan, TimeSpanParts},
    uptime::Uptime,
    uptime_drv::UptimeDrv,
};
