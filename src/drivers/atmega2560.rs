//! Timer/Counter2 of the ATmega2560 as uptime source.
//!
//! Timer/Counter2 is run in "Normal" mode, counting up from 0 to 255 and setting `TOV2` on every wrap.
//! See the ATmega640/1280/1281/2560/2561 datasheet, section 20 "8-bit Timer/Counter2 with PWM and Asynchronous Operation".
//!
//! With the `rt` feature the `TIMER2_OVF` vector is installed and bound to the clock returned by [`take`].
//! Without it, the application owns both the clock (see [`steal`]) and the vector.

use core::marker::PhantomData;

use avr_device::atmega2560::{
    tc2::{tccr2b, RegisterBlock},
    TC2,
};

use crate::{interrupt::Interrupts, Tick, UptimeCounter, UptimeDrv, UptimeOverflow};

/// The system clock frequency.
pub const SYSCLK: u32 = 16_000_000;

/// The clock select of Timer/Counter2.
pub trait Prescaler: Send + Sync + 'static {
    /// The number of system clock cycles per timer tick.
    const DIVIDER: u32;

    /// Select the prescaler in `TCCR2B`.
    fn clock_select(w: &mut tccr2b::W) -> &mut tccr2b::W;
}

macro_rules! prescaler {
    ($(#[$doc:meta] $name:ident => $divider:expr, $cs2:ident;)*) => {
        $(
            #[$doc]
            pub struct $name;

            impl Prescaler for $name {
                const DIVIDER: u32 = $divider;

                #[inline]
                fn clock_select(w: &mut tccr2b::W) -> &mut tccr2b::W {
                    w.cs2().$cs2()
                }
            }
        )*
    };
}

prescaler! {
    /// No prescaling, 62.5ns ticks.
    Direct => 1, direct;
    /// 0.5us ticks.
    Div8 => 8, prescale_8;
    /// 2us ticks.
    Div32 => 32, prescale_32;
    /// 4us ticks.
    Div64 => 64, prescale_64;
    /// 8us ticks.
    Div128 => 128, prescale_128;
    /// 16us ticks.
    Div256 => 256, prescale_256;
    /// 64us ticks.
    Div1024 => 1024, prescale_1024;
}

/// The tick rate of Timer/Counter2 with the prescaler `P`.
pub struct Tc2Tick<P: Prescaler>(PhantomData<P>);

impl<P: Prescaler> Tick for Tc2Tick<P> {
    const FREQ: u32 = SYSCLK / P::DIVIDER;
}

/// The Timer/Counter2 counter register.
pub struct Tc2CounterDrv<P: Prescaler>(PhantomData<P>);

/// The Timer/Counter2 overflow interrupt control.
pub struct Tc2OverflowDrv(());

/// The uptime clock driven by Timer/Counter2.
pub type Tc2Uptime<P = Div8> = UptimeDrv<Tc2Tick<P>, Tc2CounterDrv<P>, Tc2OverflowDrv, AvrInterrupts>;

#[inline]
fn regs() -> &'static RegisterBlock {
    // Register accesses are serialized by the uptime critical sections.
    unsafe { &*TC2::ptr() }
}

impl<P: Prescaler> UptimeCounter<Tc2Tick<P>> for Tc2CounterDrv<P> {
    fn start(&self) {
        let tc2 = regs();
        // Normal mode: WGM22:0 = 0, no compare output.
        tc2.tccr2a.reset();
        tc2.tccr2b.write(|w| P::clock_select(w));
    }

    fn reset(&self) {
        regs().tcnt2.reset();
    }

    #[inline]
    fn value(&self) -> u32 {
        regs().tcnt2.read().bits() as u32
    }
}

impl UptimeOverflow for Tc2OverflowDrv {
    const MAX: u32 = 0xFF; // Timer/Counter2 is an 8 bit counter.

    fn overflow_int_enable(&self) {
        regs().timsk2.modify(|_, w| w.toie2().set_bit());
    }

    fn overflow_int_disable(&self) {
        regs().timsk2.modify(|_, w| w.toie2().clear_bit());
    }

    #[inline]
    fn is_pending_overflow(&self) -> bool {
        regs().tifr2.read().tov2().bit_is_set()
    }

    #[inline]
    fn clear_pending_overflow(&self) {
        // The flag is cleared by writing a logic one to it.
        regs().tifr2.write(|w| w.tov2().set_bit());
    }
}

/// The global interrupt flag of the AVR core.
pub struct AvrInterrupts;

impl Interrupts for AvrInterrupts {
    /// The saved `SREG`.
    type State = u8;

    #[inline]
    fn save_and_disable() -> u8 {
        // Interrupts may already be disabled if this is a nested critical section.
        avr_device::interrupt::disable_save()
    }

    #[inline]
    unsafe fn restore(sreg: u8) {
        // Only enables interrupts if they were active when entering.
        avr_device::interrupt::restore(sreg);
    }
}

#[cfg(feature = "rt")]
static UPTIME: Tc2Uptime = Tc2Uptime::new(Tc2CounterDrv(PhantomData), Tc2OverflowDrv(()));

/// Take ownership of Timer/Counter2 and return the uptime clock bound to its overflow interrupt.
///
/// The clock ticks every 0.5us and is disabled until [`UptimeDrv::enable`] is called.
#[cfg(feature = "rt")]
pub fn take(_tc2: TC2) -> &'static Tc2Uptime {
    &UPTIME
}

/// Create an uptime clock on Timer/Counter2 with the prescaler `P`.
///
/// # Safety
///
/// - Timer/Counter2 must not be used by anything else.
/// - The `rt` feature must be disabled, and the caller must install a `TIMER2_OVF` interrupt
///   that calls [`UptimeDrv::on_overflow`] before the clock is enabled.
pub const unsafe fn steal<P: Prescaler>() -> Tc2Uptime<P> {
    Tc2Uptime::new(Tc2CounterDrv(PhantomData), Tc2OverflowDrv(()))
}

#[cfg(feature = "rt")]
#[avr_device::interrupt(atmega2560)]
fn TIMER2_OVF() {
    UPTIME.on_overflow();
}
