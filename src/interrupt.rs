use core::{cell::UnsafeCell, marker::PhantomData};

/// Global interrupt control of the platform.
pub trait Interrupts {
    /// The saved interrupt enable state, e.g. the AVR status register.
    type State: Copy;

    /// Save the current interrupt enable state and disable all interrupts.
    fn save_and_disable() -> Self::State;

    /// Restore a state previously returned by `save_and_disable()`.
    ///
    /// # Safety
    ///
    /// - States must be restored in the reverse order of how they were saved.
    unsafe fn restore(state: Self::State);
}

/// Critical section guard.
///
/// Interrupts are disabled while the guard is alive,
/// and the interrupt state from before the guard was created is restored when it is dropped.
pub struct CriticalSection<I: Interrupts> {
    state: I::State,
    /// The guard must be dropped on the same core and in the same context that created it.
    _not_send: PhantomData<*const ()>,
}

impl<I: Interrupts> CriticalSection<I> {
    /// Enter a critical section.
    /// Interrupts may already be disabled if this is a nested critical section.
    #[inline]
    pub fn enter() -> Self {
        Self {
            state: I::save_and_disable(),
            _not_send: PhantomData,
        }
    }
}

impl<I: Interrupts> Drop for CriticalSection<I> {
    #[inline]
    fn drop(&mut self) {
        // Only re-enables interrupts if they were active when entering.
        unsafe { I::restore(self.state) }
    }
}

/// Execute the closure `f` in an interrupt-free context.
#[inline]
pub fn critical<I, F, R>(f: F) -> R
where
    I: Interrupts,
    F: FnOnce(&CriticalSection<I>) -> R,
{
    let cs = CriticalSection::enter();
    f(&cs)
}

/// A value that can only be accessed inside a critical section.
pub struct Mutex<T>(UnsafeCell<T>);

impl<T> Mutex<T> {
    pub const fn new(value: T) -> Self {
        Self(UnsafeCell::new(value))
    }

    /// Borrow the value for the lifetime of the critical section.
    #[inline]
    pub fn borrow<'cs, I: Interrupts>(&'cs self, _cs: &'cs CriticalSection<I>) -> &'cs T {
        unsafe { &*self.0.get() }
    }
}

// Accesses are serialized by the single core having interrupts disabled.
unsafe impl<T: Send> Sync for Mutex<T> {}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::drivers::sim::SimInterrupts;

    #[test]
    fn guard_disables_and_restores() {
        SimInterrupts::set_enabled(true);

        {
            let _cs = CriticalSection::<SimInterrupts>::enter();
            assert!(!SimInterrupts::is_enabled());
        }

        assert!(SimInterrupts::is_enabled());
    }

    #[test]
    fn nested_guard_keeps_interrupts_disabled() {
        SimInterrupts::set_enabled(true);

        critical::<SimInterrupts, _, _>(|_| {
            critical::<SimInterrupts, _, _>(|_| {
                assert!(!SimInterrupts::is_enabled());
            });

            // The inner section must not re-enable interrupts.
            assert!(!SimInterrupts::is_enabled());
        });

        assert!(SimInterrupts::is_enabled());
    }

    #[test]
    fn guard_keeps_interrupts_disabled_if_they_were_disabled() {
        SimInterrupts::set_enabled(false);

        drop(CriticalSection::<SimInterrupts>::enter());

        assert!(!SimInterrupts::is_enabled());
    }
}
