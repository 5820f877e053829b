pub trait Tick: Send {
    /// The tick frequency, i.e. the number of ticks per second.
    const FREQ: u32;

    /// The number of whole ticks per microsecond, or zero if a tick is longer than a microsecond
    /// or the frequency is not a whole multiple of 1 MHz.
    const TICKS_PER_MICRO: u32 = if Self::FREQ % 1_000_000 == 0 {
        Self::FREQ / 1_000_000
    } else {
        0
    };
}
