use core::{
    fmt::Debug,
    marker::PhantomData,
    ops::{Add, Sub},
};

use crate::Tick;

/// A number of ticks of the tick rate `T`.
pub struct TimeSpan<T: Tick>(pub u64, pub(crate) PhantomData<T>);

impl<T: Tick> Copy for TimeSpan<T> {}

impl<T: Tick> Clone for TimeSpan<T> {
    fn clone(&self) -> Self {
        *self
    }
}

#[derive(Debug)]
pub struct TimeSpanParts {
    pub days: u32,
    pub hours: u16,
    pub minutes: u8,
    pub seconds: u8,
    pub micros: u32,
}

impl<T: Tick> TimeSpan<T> {
    pub const ZERO: Self = Self(0, PhantomData);
    const MAX_SECONDS: u32 = u32::MAX;
    const MAX_MILLIS: u64 = Self::MAX_SECONDS as u64 * 1000;
    const MAX_MICROS: u64 = Self::MAX_SECONDS as u64 * 1_000_000;
    const MAX_DAYS: u32 = Self::MAX_SECONDS / 60 / 60 / 24;
    const TICKS_PER_SECOND: u64 = T::FREQ as u64;
    const TICKS_PER_MINUTE: u64 = Self::TICKS_PER_SECOND * 60;
    const TICKS_PER_HOUR: u64 = Self::TICKS_PER_MINUTE * 60;
    const TICKS_PER_DAY: u64 = Self::TICKS_PER_HOUR * 24;

    pub fn from_parts(parts: TimeSpanParts) -> Self {
        assert!(parts.days <= Self::MAX_DAYS);
        assert!(parts.hours < 24);
        assert!(parts.minutes < 60);
        assert!(parts.seconds < 60);
        assert!(parts.micros < 1_000_000);

        let ticks = parts.days as u64 * Self::TICKS_PER_DAY
            + parts.hours as u64 * Self::TICKS_PER_HOUR
            + parts.minutes as u64 * Self::TICKS_PER_MINUTE
            + parts.seconds as u64 * Self::TICKS_PER_SECOND
            + (parts.micros as u64 * Self::TICKS_PER_SECOND) / 1_000_000;
        Self::from_ticks(ticks)
    }

    pub fn from_seconds(seconds: u32) -> Self {
        Self::from_ticks(seconds as u64 * Self::TICKS_PER_SECOND)
    }

    pub fn from_millis(millis: u64) -> Self {
        assert!(millis <= Self::MAX_MILLIS);

        let seconds = millis / 1000;
        let sub_seconds = millis - seconds * 1000;
        let ticks =
            seconds * Self::TICKS_PER_SECOND + (sub_seconds * Self::TICKS_PER_SECOND) / 1000;
        Self::from_ticks(ticks)
    }

    /// Create a timespan from a number of microseconds, rounding up to whole ticks.
    pub fn from_micros(micros: u64) -> Self {
        assert!(micros <= Self::MAX_MICROS);

        let seconds = micros / 1_000_000;
        let sub_seconds = micros - seconds * 1_000_000;
        let ticks = seconds * Self::TICKS_PER_SECOND
            + (sub_seconds * Self::TICKS_PER_SECOND + 999_999) / 1_000_000;
        Self::from_ticks(ticks)
    }

    pub const fn from_ticks(ticks: u64) -> Self {
        Self(ticks, PhantomData)
    }

    pub const fn ticks(&self) -> u64 {
        self.0
    }

    pub fn parts(&self) -> TimeSpanParts {
        let mut ticks = self.0;

        let days = ticks / Self::TICKS_PER_DAY;
        ticks -= days * Self::TICKS_PER_DAY;

        let hours = ticks / Self::TICKS_PER_HOUR;
        ticks -= hours * Self::TICKS_PER_HOUR;

        let minutes = ticks / Self::TICKS_PER_MINUTE;
        ticks -= minutes * Self::TICKS_PER_MINUTE;

        let seconds = ticks / Self::TICKS_PER_SECOND;
        ticks -= seconds * Self::TICKS_PER_SECOND;

        TimeSpanParts {
            // Only tick rates below 50 Hz can exceed this.
            days: days.min(u32::MAX as u64) as u32,
            hours: hours as u16,
            minutes: minutes as u8,
            seconds: seconds as u8,
            micros: (ticks * 1_000_000 / Self::TICKS_PER_SECOND) as u32,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        self.0 / Self::TICKS_PER_SECOND
    }

    pub fn total_millis(&self) -> u64 {
        let seconds = self.total_seconds();
        let sub_seconds = self.0 - seconds * Self::TICKS_PER_SECOND;
        seconds * 1000 + (sub_seconds * 1000) / Self::TICKS_PER_SECOND
    }

    /// The number of whole microseconds in the timespan (truncating).
    pub fn total_micros(&self) -> u64 {
        if T::TICKS_PER_MICRO != 0 {
            // Avoid the 64 bit multiplication for the common prescalers.
            return self.0 / T::TICKS_PER_MICRO as u64;
        }

        let seconds = self.total_seconds();
        let sub_seconds = self.0 - seconds * Self::TICKS_PER_SECOND;
        seconds * 1_000_000 + (sub_seconds * 1_000_000) / Self::TICKS_PER_SECOND
    }
}

impl<T: Tick> Default for TimeSpan<T> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<T: Tick> From<TimeSpan<T>> for u64 {
    fn from(timespan: TimeSpan<T>) -> u64 {
        timespan.0
    }
}

impl<T: Tick> PartialEq for TimeSpan<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T: Tick> Eq for TimeSpan<T> {}

impl<T: Tick> PartialOrd for TimeSpan<T> {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Tick> Ord for TimeSpan<T> {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T: Tick> Add for TimeSpan<T> {
    type Output = TimeSpan<T>;

    fn add(self, rhs: Self) -> Self::Output {
        TimeSpan::from_ticks(self.0.wrapping_add(rhs.0))
    }
}

impl<T: Tick> Sub for TimeSpan<T> {
    type Output = TimeSpan<T>;

    fn sub(self, rhs: Self) -> Self::Output {
        TimeSpan::from_ticks(self.0.saturating_sub(rhs.0))
    }
}

impl<T: Tick> Debug for TimeSpan<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let parts = self.parts();
        write!(
            f,
            "{}d{:02}:{:02}:{:02}.{:06}",
            parts.days, parts.hours, parts.minutes, parts.seconds, parts.micros
        )
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    struct TestTick;

    impl Tick for TestTick {
        const FREQ: u32 = 2_000_000;
    }

    struct OddTick;

    impl Tick for OddTick {
        const FREQ: u32 = 15_625;
    }

    fn sample() -> TimeSpan<TestTick> {
        TimeSpan::from_parts(TimeSpanParts {
            days: 1,
            hours: 2,
            minutes: 3,
            seconds: 4,
            micros: 5,
        })
    }

    #[test]
    fn parts() {
        let ts = sample();
        let parts = ts.parts();

        assert_eq!(
            1 * 86400 * 2_000_000 + 2 * 3600 * 2_000_000 + 3 * 60 * 2_000_000 + 4 * 2_000_000 + 10,
            ts.0
        );
        assert_eq!(1, parts.days);
        assert_eq!(2, parts.hours);
        assert_eq!(3, parts.minutes);
        assert_eq!(4, parts.seconds);
        assert_eq!(5, parts.micros);
    }

    #[test]
    fn total_seconds() {
        assert_eq!(1 * 86400 + 2 * 3600 + 3 * 60 + 4, sample().total_seconds());
    }

    #[test]
    fn total_millis() {
        assert_eq!(
            1 * 86400 * 1000 + 2 * 3600 * 1000 + 3 * 60 * 1000 + 4 * 1000,
            sample().total_millis()
        );
    }

    #[test]
    fn total_micros() {
        assert_eq!(500, TimeSpan::<TestTick>::from_ticks(1000).total_micros());
        assert_eq!(500, TimeSpan::<TestTick>::from_ticks(1001).total_micros());
    }

    #[test]
    fn total_micros_with_slow_tick() {
        // One tick is 64us.
        assert_eq!(0, TimeSpan::<OddTick>::from_ticks(0).total_micros());
        assert_eq!(64, TimeSpan::<OddTick>::from_ticks(1).total_micros());
        assert_eq!(1_000_000, TimeSpan::<OddTick>::from_ticks(15_625).total_micros());
    }

    #[test]
    fn from_micros_rounds_up() {
        assert_eq!(2, TimeSpan::<TestTick>::from_micros(1).0);
        assert_eq!(1, TimeSpan::<OddTick>::from_micros(1).0);
        assert_eq!(15_626, TimeSpan::<OddTick>::from_micros(1_000_001).0);
    }

    #[test]
    #[should_panic]
    fn from_millis_out_of_range() {
        TimeSpan::<TestTick>::from_millis(u64::MAX);
    }

    #[test]
    #[should_panic]
    fn from_micros_out_of_range() {
        TimeSpan::<TestTick>::from_micros(u32::MAX as u64 * 1_000_000 + 1);
    }

    #[test]
    fn largest_micros() {
        let ts = TimeSpan::<TestTick>::from_micros(u32::MAX as u64 * 1_000_000);
        assert_eq!(u32::MAX as u64, ts.total_seconds());
    }

    #[test]
    fn parts_of_largest_timespan() {
        let parts = TimeSpan::<TestTick>::from_ticks(u64::MAX).parts();
        assert_eq!(u64::MAX / (86400 * 2_000_000), parts.days as u64);
        assert_eq!(106_751_991, parts.days);
        assert!(parts.hours < 24);
    }

    #[test]
    fn sub_saturates() {
        let a = TimeSpan::<TestTick>::from_ticks(3);
        let b = TimeSpan::<TestTick>::from_ticks(5);
        assert_eq!(TimeSpan::ZERO, a - b);
        assert_eq!(TimeSpan::from_ticks(2), b - a);
    }

    #[test]
    fn debug() {
        assert_eq!("1d02:03:04.000005", format!("{:?}", sample()));
    }
}
