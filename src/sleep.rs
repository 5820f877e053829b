use core::{future::Future, task::Poll};

use futures::future::poll_fn;

use crate::{Tick, TimeSpan, Uptime};

/// Returns a future that resolves when `duration` time has elapsed on `uptime`.
///
/// The future does not arm any timer. It wakes itself every time it is polled before the deadline,
/// so the executor keeps polling it in between its other tasks.
///
/// Panics if the clock is disabled, as the future would never resolve.
pub fn sleep<'a, T, U>(uptime: &'a U, duration: TimeSpan<T>) -> impl Future<Output = ()> + 'a
where
    T: Tick + 'a,
    U: Uptime<T> + 'a,
{
    assert!(uptime.is_enabled());

    let deadline = uptime.now() + duration;
    poll_fn(move |cx| {
        if uptime.now() >= deadline {
            Poll::Ready(())
        } else {
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    })
}

#[cfg(test)]
pub mod tests {
    use futures_await_test::async_test;

    use super::*;
    use crate::drivers::sim::SimHw;

    #[async_test]
    async fn sleep_elapses() {
        let hw = SimHw::new();
        let clock = hw.clock();
        clock.enable();
        hw.set_step(7);

        let start = clock.now();
        sleep(&clock, TimeSpan::from_micros(300)).await;

        assert!(clock.now() - start >= TimeSpan::from_micros(300));
    }

    #[test]
    #[should_panic]
    fn sleep_on_disabled_clock() {
        let hw = SimHw::new();
        let clock = hw.clock();

        let _ = sleep(&clock, TimeSpan::from_micros(1));
    }

    #[async_test]
    async fn sleep_zero_is_ready() {
        let hw = SimHw::new();
        let clock = hw.clock();
        clock.enable();

        sleep(&clock, TimeSpan::ZERO).await;

        assert_eq!(0, clock.now().0);
    }
}
